//! The four view modes and their selection-to-aggregation pipeline.
//!
//! Evaluating a view is a pure function of the immutable dataset and the
//! current parameters: validate, run the required aggregations, and hand the
//! derived data to the chart builders. Selection-local failures never abort
//! the session; they surface as a no-chart outcome and the next selection
//! starts from scratch.

use crate::agg;
use crate::chart::{self, ChartSpec};
use crate::data::model::{Dataset, Metric};
use crate::error::SelectionError;
use crate::quartile;

// ---------------------------------------------------------------------------
// View – one of four mutually exclusive modes
// ---------------------------------------------------------------------------

/// The active view and its parameters. Any mode may follow any other; each
/// mode validates only what it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Per-group mean time series plus first/last-week distributions and the
    /// last-week group boxplot.
    GroupComparison { metric: Metric, groups: Vec<String> },
    /// A single user's metric over time.
    UserEvolution {
        metric: Metric,
        group: String,
        user_id: String,
    },
    /// Two metrics against each other in one week's snapshot.
    ScatterComparison {
        metric_x: Metric,
        metric_y: Metric,
        week: i64,
    },
    /// Last-week boxplot of one metric, grouped by quartiles of another.
    QuartileBoxplot {
        metric_to_plot: Metric,
        metric_for_quartiles: Metric,
    },
}

/// Result of evaluating a view selection.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutcome {
    /// Ordered chart descriptions for the renderer.
    Charts(Vec<ChartSpec>),
    /// The current selection produces no chart; the session stays usable.
    NoChart(SelectionError),
}

/// Evaluate `view` against the dataset, absorbing selection-local errors.
pub fn evaluate(dataset: &Dataset, view: &View) -> ViewOutcome {
    match compute(dataset, view) {
        Ok(specs) => ViewOutcome::Charts(specs),
        Err(err) => {
            log::warn!("no chart for current selection: {err}");
            ViewOutcome::NoChart(err)
        }
    }
}

fn compute(dataset: &Dataset, view: &View) -> Result<Vec<ChartSpec>, SelectionError> {
    match view {
        View::GroupComparison { metric, groups } => {
            let aggregates = agg::mean_by_group_week(dataset, metric, groups)?;
            let (first, last) = agg::extreme_week_subsets(dataset);

            // The companion distribution charts always cover every group;
            // only the time series respects the group subset.
            Ok(vec![
                chart::group_mean_lines(metric, &aggregates, groups),
                chart::week_histogram(metric, &first, &dataset.groups, "first week"),
                chart::week_histogram(metric, &last, &dataset.groups, "last week"),
                chart::group_boxplot(metric, &last, &dataset.groups),
            ])
        }
        View::UserEvolution {
            metric,
            group,
            user_id,
        } => {
            let series = agg::user_series(dataset, group, user_id, metric)?;
            Ok(vec![chart::user_line(metric, user_id, &series)])
        }
        View::ScatterComparison {
            metric_x,
            metric_y,
            week,
        } => {
            let snapshot = agg::week_snapshot(dataset, *week)?;
            Ok(vec![chart::week_scatter(
                metric_x,
                metric_y,
                *week,
                &snapshot,
                &dataset.groups,
            )])
        }
        View::QuartileBoxplot {
            metric_to_plot,
            metric_for_quartiles,
        } => {
            for metric in [metric_to_plot, metric_for_quartiles] {
                if metric.is_reserved() {
                    return Err(SelectionError::ReservedMetric(
                        metric.display_name().to_string(),
                    ));
                }
            }
            let (_, last) = agg::extreme_week_subsets(dataset);
            let labels = quartile::assign_quartiles(&last, metric_for_quartiles)?;
            Ok(vec![chart::quartile_boxplot(
                metric_to_plot,
                metric_for_quartiles,
                &last,
                &labels,
            )])
        }
    }
}
