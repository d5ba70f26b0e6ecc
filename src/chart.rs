//! Renderer-agnostic chart descriptions.
//!
//! A [`ChartSpec`] says what to draw, never how: any renderer that can draw
//! line, histogram, scatter and boxplot charts from named point sequences can
//! consume one. The builders here are pure functions from computed data to
//! spec values; the CLI serializes them as JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::agg::GroupWeekAggregate;
use crate::data::model::{Metric, Record, RecordKey};
use crate::quartile::Quartile;

// ---------------------------------------------------------------------------
// Spec value types
// ---------------------------------------------------------------------------

/// What kind of chart a renderer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Histogram,
    Scatter,
    Boxplot,
}

/// A named point sequence.
///
/// Line and scatter series fill both axes pairwise. Histogram series carry
/// the raw values in `xs` and leave `ys` empty; boxplot series do the
/// opposite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

/// Declarative chart description handed to an external renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    /// Ordered named point sequences.
    pub series: Vec<Series>,
    pub x_label: String,
    pub y_label: String,
    pub title: String,
    pub legend_label: Option<String>,
}

// ---------------------------------------------------------------------------
// Builders, one per chart
// ---------------------------------------------------------------------------

/// Per-group mean time series as a line chart, one series per group in the
/// caller-given order.
pub fn group_mean_lines(
    metric: &Metric,
    aggregates: &[GroupWeekAggregate],
    groups: &[String],
) -> ChartSpec {
    let series = groups
        .iter()
        .map(|group| {
            let (xs, ys): (Vec<f64>, Vec<f64>) = aggregates
                .iter()
                .filter(|a| a.group == *group)
                .map(|a| (a.week as f64, a.mean))
                .unzip();
            Series {
                name: group.clone(),
                xs,
                ys,
            }
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Line,
        series,
        x_label: "Week".to_string(),
        y_label: metric.display_name().to_string(),
        title: format!("{metric} over time by group"),
        legend_label: Some("Group".to_string()),
    }
}

/// Distribution of `metric` in one week's snapshot, one histogram series per
/// group.
pub fn week_histogram(
    metric: &Metric,
    subset: &[&Record],
    groups: &[String],
    week_name: &str,
) -> ChartSpec {
    let series = groups
        .iter()
        .map(|group| Series {
            name: group.clone(),
            xs: metric_values(subset, metric, group),
            ys: Vec::new(),
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Histogram,
        series,
        x_label: metric.display_name().to_string(),
        y_label: "Count".to_string(),
        title: format!("{metric} distribution in the {week_name} by group"),
        legend_label: Some("Group".to_string()),
    }
}

/// Last-week values of `metric` as one boxplot series per group.
pub fn group_boxplot(metric: &Metric, subset: &[&Record], groups: &[String]) -> ChartSpec {
    let series = groups
        .iter()
        .map(|group| Series {
            name: group.clone(),
            xs: Vec::new(),
            ys: metric_values(subset, metric, group),
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Boxplot,
        series,
        x_label: "Group".to_string(),
        y_label: metric.display_name().to_string(),
        title: format!("{metric} in the last week by group"),
        legend_label: None,
    }
}

/// One user's metric over time as a single line series.
pub fn user_line(metric: &Metric, user_id: &str, points: &[(i64, f64)]) -> ChartSpec {
    let (xs, ys): (Vec<f64>, Vec<f64>) =
        points.iter().map(|&(week, v)| (week as f64, v)).unzip();

    ChartSpec {
        kind: ChartKind::Line,
        series: vec![Series {
            name: user_id.to_string(),
            xs,
            ys,
        }],
        x_label: "Week".to_string(),
        y_label: metric.display_name().to_string(),
        title: format!("{metric} over time for user {user_id}"),
        legend_label: None,
    }
}

/// Two metrics against each other in one week's snapshot, one scatter series
/// per group.
pub fn week_scatter(
    metric_x: &Metric,
    metric_y: &Metric,
    week: i64,
    subset: &[&Record],
    groups: &[String],
) -> ChartSpec {
    let series = groups
        .iter()
        .map(|group| {
            let (xs, ys): (Vec<f64>, Vec<f64>) = subset
                .iter()
                .filter(|r| r.group == *group)
                .filter_map(|r| {
                    let x = r.metrics.get(metric_x)?;
                    let y = r.metrics.get(metric_y)?;
                    Some((x, y))
                })
                .unzip();
            Series {
                name: group.clone(),
                xs,
                ys,
            }
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Scatter,
        series,
        x_label: metric_x.display_name().to_string(),
        y_label: metric_y.display_name().to_string(),
        title: format!("{metric_x} vs {metric_y} in week {week}"),
        legend_label: Some("Group".to_string()),
    }
}

/// Last-week values of `metric_to_plot` as one boxplot series per quartile of
/// `metric_for_quartiles`, Q1 through Q4.
pub fn quartile_boxplot(
    metric_to_plot: &Metric,
    metric_for_quartiles: &Metric,
    subset: &[&Record],
    labels: &BTreeMap<RecordKey, Quartile>,
) -> ChartSpec {
    let series = Quartile::ALL
        .into_iter()
        .map(|quartile| Series {
            name: quartile.label().to_string(),
            xs: Vec::new(),
            ys: subset
                .iter()
                .filter(|r| labels.get(&r.key()) == Some(&quartile))
                .filter_map(|r| r.metrics.get(metric_to_plot))
                .collect(),
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Boxplot,
        series,
        x_label: format!("Quartile of {metric_for_quartiles}"),
        y_label: metric_to_plot.display_name().to_string(),
        title: format!("{metric_to_plot} by quartile of {metric_for_quartiles} (last week)"),
        legend_label: None,
    }
}

/// Values of `metric` for records of `group` within `subset`, in subset
/// order.
fn metric_values(subset: &[&Record], metric: &Metric, group: &str) -> Vec<f64> {
    subset
        .iter()
        .filter(|r| r.group == group)
        .filter_map(|r| r.metrics.get(metric))
        .collect()
}
