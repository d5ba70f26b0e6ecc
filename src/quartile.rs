//! Rank-based quartile binning of a week snapshot.
//!
//! Cutting on raw values skews bin sizes as soon as many records share a
//! value: the tied records collapse into one boundary and one bin swallows
//! them all. Binning on stable ranks instead guarantees the four bins differ
//! in size by at most one, whatever the value distribution.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::model::{Metric, Record, RecordKey};
use crate::error::SelectionError;

/// Quartile label, ordered Q1 (lowest values) to Q4 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quartile {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quartile {
    pub const ALL: [Quartile; 4] = [Quartile::Q1, Quartile::Q2, Quartile::Q3, Quartile::Q4];

    pub fn label(self) -> &'static str {
        match self {
            Quartile::Q1 => "Q1",
            Quartile::Q2 => "Q2",
            Quartile::Q3 => "Q3",
            Quartile::Q4 => "Q4",
        }
    }
}

impl fmt::Display for Quartile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Assign each record of `subset` a quartile of `metric`.
///
/// Records are ranked by metric value ascending with ties broken by original
/// subset position (first seen, first ranked), then the rank sequence is cut
/// into four contiguous runs: the first `N mod 4` runs take `⌈N/4⌉` records,
/// the rest `⌊N/4⌋`. The input is left untouched; the result maps each
/// record's identity to its label.
pub fn assign_quartiles(
    subset: &[&Record],
    metric: &Metric,
) -> Result<BTreeMap<RecordKey, Quartile>, SelectionError> {
    let n = subset.len();
    if n < 4 {
        return Err(SelectionError::InsufficientData { needed: 4, got: n });
    }

    // Stable sort on value alone: equal values keep subset order.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        // A custom metric missing from a record sorts last.
        let va = subset[a].metrics.get(metric).unwrap_or(f64::NAN);
        let vb = subset[b].metrics.get(metric).unwrap_or(f64::NAN);
        va.total_cmp(&vb)
    });

    let base = n / 4;
    let extra = n % 4;

    let mut labels = BTreeMap::new();
    let mut next = 0usize;
    for (i, quartile) in Quartile::ALL.into_iter().enumerate() {
        let size = base + usize::from(i < extra);
        for &idx in &order[next..next + size] {
            labels.insert(subset[idx].key(), quartile);
        }
        next += size;
    }
    Ok(labels)
}
