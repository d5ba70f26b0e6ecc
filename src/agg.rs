//! Grouped-statistics computations over the loaded panel.
//!
//! Every function here is pure: it borrows the immutable [`Dataset`] and
//! returns freshly built values. Nothing is cached and nothing mutates the
//! snapshot, so recomputing on every parameter change is always safe.

use crate::data::model::{Dataset, Metric, Record};
use crate::error::SelectionError;

// ---------------------------------------------------------------------------
// GroupWeekAggregate – one (group, week) mean
// ---------------------------------------------------------------------------

/// The mean of one metric across all records sharing a group and a week.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupWeekAggregate {
    pub group: String,
    pub week: i64,
    pub mean: f64,
}

/// Mean of `metric` per (group, week) pair actually present among the
/// requested groups.
///
/// Results are ordered ascending by week, then by group in the caller-given
/// order. A pair with zero matching rows yields no aggregate rather than a
/// silent zero.
pub fn mean_by_group_week(
    dataset: &Dataset,
    metric: &Metric,
    groups: &[String],
) -> Result<Vec<GroupWeekAggregate>, SelectionError> {
    if groups.is_empty() {
        return Err(SelectionError::EmptySelection);
    }

    let mut out = Vec::new();
    for &week in &dataset.weeks {
        for group in groups {
            let mut sum = 0.0;
            let mut count = 0usize;
            for rec in &dataset.records {
                if rec.week == week && rec.group == *group {
                    if let Some(value) = rec.metrics.get(metric) {
                        sum += value;
                        count += 1;
                    }
                }
            }
            if count > 0 {
                out.push(GroupWeekAggregate {
                    group: group.clone(),
                    week,
                    mean: sum / count as f64,
                });
            }
        }
    }
    Ok(out)
}

/// All records at the earliest and the latest week of the dataset.
///
/// With a single distinct week both subsets are equal; that is a valid
/// outcome, not an error.
pub fn extreme_week_subsets(dataset: &Dataset) -> (Vec<&Record>, Vec<&Record>) {
    let (Some(first), Some(last)) = (dataset.first_week(), dataset.last_week()) else {
        return (Vec::new(), Vec::new());
    };
    let at = |week: i64| -> Vec<&Record> {
        dataset.records.iter().filter(|r| r.week == week).collect()
    };
    (at(first), at(last))
}

/// Time series of `metric` for one user, sorted ascending by week.
///
/// The valid user list is derived from `group`, so a stale cross-group
/// selection fails with [`SelectionError::NoSuchUser`] instead of silently
/// returning another group's data.
pub fn user_series(
    dataset: &Dataset,
    group: &str,
    user_id: &str,
    metric: &Metric,
) -> Result<Vec<(i64, f64)>, SelectionError> {
    if !dataset.users_in_group(group).iter().any(|u| u == user_id) {
        return Err(SelectionError::NoSuchUser {
            group: group.to_string(),
            user_id: user_id.to_string(),
        });
    }

    let mut series: Vec<(i64, f64)> = dataset
        .records
        .iter()
        .filter(|r| r.user_id == user_id)
        .filter_map(|r| r.metrics.get(metric).map(|v| (r.week, v)))
        .collect();
    series.sort_by_key(|&(week, _)| week);
    Ok(series)
}

/// All records observed at `week`.
pub fn week_snapshot(dataset: &Dataset, week: i64) -> Result<Vec<&Record>, SelectionError> {
    let snapshot: Vec<&Record> = dataset.records.iter().filter(|r| r.week == week).collect();
    if snapshot.is_empty() {
        return Err(SelectionError::NoSuchWeek { week });
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::MetricValues;

    fn record(user: &str, group: &str, week: i64, hydration: f64) -> Record {
        let mut metrics = MetricValues::default();
        metrics.hydration = hydration;
        Record {
            user_id: user.to_string(),
            group: group.to_string(),
            week,
            metrics,
        }
    }

    /// Two groups, two weeks, three users, hydration values chosen so every
    /// mean is exact.
    fn sample() -> Dataset {
        Dataset::from_records(
            vec![
                record("u1", "A", 1, 2.0),
                record("u1", "A", 2, 4.0),
                record("u2", "A", 1, 6.0),
                record("u2", "A", 2, 8.0),
                record("u3", "B", 1, 10.0),
                record("u3", "B", 2, 12.0),
            ],
            vec![Metric::Hydration],
        )
    }

    #[test]
    fn test_mean_by_group_week_concrete() {
        let ds = sample();
        let groups = vec!["A".to_string(), "B".to_string()];
        let aggs = mean_by_group_week(&ds, &Metric::Hydration, &groups).unwrap();

        let flat: Vec<(i64, &str, f64)> = aggs
            .iter()
            .map(|a| (a.week, a.group.as_str(), a.mean))
            .collect();
        assert_eq!(
            flat,
            vec![
                (1, "A", 4.0),
                (1, "B", 10.0),
                (2, "A", 6.0),
                (2, "B", 12.0),
            ]
        );
    }

    #[test]
    fn test_mean_by_group_week_caller_group_order() {
        let ds = sample();
        let groups = vec!["B".to_string(), "A".to_string()];
        let aggs = mean_by_group_week(&ds, &Metric::Hydration, &groups).unwrap();
        // Week ascending first, then caller order within a week.
        assert_eq!(aggs[0].group, "B");
        assert_eq!(aggs[1].group, "A");
    }

    #[test]
    fn test_mean_by_group_week_empty_selection() {
        let ds = sample();
        assert_eq!(
            mean_by_group_week(&ds, &Metric::Hydration, &[]),
            Err(SelectionError::EmptySelection)
        );
    }

    #[test]
    fn test_mean_by_group_week_skips_absent_pairs() {
        // Group C never observed: no aggregate, no silent zero.
        let ds = sample();
        let groups = vec!["A".to_string(), "C".to_string()];
        let aggs = mean_by_group_week(&ds, &Metric::Hydration, &groups).unwrap();
        assert!(aggs.iter().all(|a| a.group == "A"));
        assert_eq!(aggs.len(), 2);
    }

    #[test]
    fn test_mean_ignores_missing_custom_metric() {
        let ds = sample();
        let groups = vec!["A".to_string()];
        let metric = Metric::Custom("mood".to_string());
        let aggs = mean_by_group_week(&ds, &metric, &groups).unwrap();
        assert!(aggs.is_empty());
    }

    #[test]
    fn test_extreme_week_subsets() {
        let ds = sample();
        let (first, last) = extreme_week_subsets(&ds);
        assert!(first.iter().all(|r| r.week == 1));
        assert!(last.iter().all(|r| r.week == 2));
        assert_eq!(first.len(), 3);
        assert_eq!(last.len(), 3);
    }

    #[test]
    fn test_extreme_week_subsets_single_week() {
        let ds = Dataset::from_records(
            vec![record("u1", "A", 7, 1.0), record("u2", "A", 7, 2.0)],
            vec![Metric::Hydration],
        );
        let (first, last) = extreme_week_subsets(&ds);
        assert_eq!(first, last);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_user_series_sorted_and_idempotent() {
        let ds = Dataset::from_records(
            vec![
                record("u1", "A", 9, 3.0),
                record("u1", "A", 2, 1.0),
                record("u1", "A", 5, 2.0),
            ],
            vec![Metric::Hydration],
        );
        let first = user_series(&ds, "A", "u1", &Metric::Hydration).unwrap();
        assert_eq!(first, vec![(2, 1.0), (5, 2.0), (9, 3.0)]);
        assert!(first.windows(2).all(|w| w[0].0 < w[1].0));

        let second = user_series(&ds, "A", "u1", &Metric::Hydration).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_user_series_rejects_cross_group_user() {
        let ds = sample();
        assert_eq!(
            user_series(&ds, "B", "u1", &Metric::Hydration),
            Err(SelectionError::NoSuchUser {
                group: "B".to_string(),
                user_id: "u1".to_string(),
            })
        );
    }

    #[test]
    fn test_week_snapshot() {
        let ds = sample();
        let snap = week_snapshot(&ds, 2).unwrap();
        assert_eq!(snap.len(), 3);
        assert!(snap.iter().all(|r| r.week == 2));

        assert_eq!(
            week_snapshot(&ds, 99).unwrap_err(),
            SelectionError::NoSuchWeek { week: 99 }
        );
    }
}
