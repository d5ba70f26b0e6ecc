use std::sync::Arc;

use crate::data::model::{Dataset, Metric};
use crate::view::{self, View, ViewOutcome};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// The selection state of one exploring session, independent of any widget
/// layer.
///
/// The dataset snapshot is shared and read-only; the session only tracks
/// which view is active and with which parameters. Switching views
/// re-validates just the parameters the new mode needs, so a selection made
/// in one mode can never leak stale into another.
pub struct Session {
    dataset: Arc<Dataset>,
    view: View,
}

impl Session {
    /// Start a session on a loaded snapshot. The initial view compares all
    /// groups on the first metric column.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let view = View::GroupComparison {
            metric: dataset
                .metrics
                .first()
                .cloned()
                .unwrap_or(Metric::Wellbeing),
            groups: dataset.groups.clone(),
        };
        Session { dataset, view }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Switch to a new view, normalising its parameters against the dataset.
    ///
    /// For [`View::UserEvolution`], the valid user list is re-derived from
    /// the requested group; a user id that does not belong to that group is
    /// replaced by the group's first user rather than kept stale.
    pub fn select_view(&mut self, view: View) {
        self.view = match view {
            View::UserEvolution {
                metric,
                group,
                user_id,
            } => {
                let users = self.dataset.users_in_group(&group);
                let user_id = if users.iter().any(|u| *u == user_id) {
                    user_id
                } else {
                    let fallback = users.first().cloned().unwrap_or(user_id);
                    log::debug!("user selection reset to '{fallback}' for group '{group}'");
                    fallback
                };
                View::UserEvolution {
                    metric,
                    group,
                    user_id,
                }
            }
            other => other,
        };
    }

    /// Evaluate the active view against the snapshot.
    pub fn evaluate(&self) -> ViewOutcome {
        view::evaluate(&self.dataset, &self.view)
    }
}
