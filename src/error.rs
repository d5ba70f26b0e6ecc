use thiserror::Error;

/// Fatal load failure: the primary and the fallback source both failed to
/// load or failed schema validation. The session cannot start.
#[derive(Debug, Error)]
#[error("cannot load dataset: primary source failed ({primary}); fallback source failed ({fallback})")]
pub struct LoadError {
    /// Why the primary source was rejected.
    pub primary: String,
    /// Why the fallback source was rejected.
    pub fallback: String,
}

/// Non-fatal, selection-local failures.
///
/// Each is caught at the view boundary and surfaced as "no chart for the
/// current selection"; the session and the other views remain usable, and the
/// dataset is never touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// No groups selected, or a mean had zero matching rows.
    #[error("no groups selected")]
    EmptySelection,

    /// The requested user has no observation in the requested group.
    #[error("user '{user_id}' not found in group '{group}'")]
    NoSuchUser { group: String, user_id: String },

    /// The requested week is not present in the dataset.
    #[error("week {week} is not present in the dataset")]
    NoSuchWeek { week: i64 },

    /// Too few records to form four non-empty quartile bins.
    #[error("need at least {needed} records to form quartiles, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// The metric is excluded from this view's selectors.
    #[error("metric '{0}' is reserved and cannot be used in this view")]
    ReservedMetric(String),
}
