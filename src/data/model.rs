use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Metric – one named numeric measurement column
// ---------------------------------------------------------------------------

/// A metric column of the panel table.
///
/// The wellbeing study ships a fixed set of seven metrics, each a plain
/// variant with a compile-time-checked field behind it (see
/// [`MetricValues`]). Any additional numeric column in the source is carried
/// as [`Metric::Custom`] and handled generically: raw column name, no
/// display-name mapping.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Assiduity,
    SleepDuration,
    SleepQuality,
    Hydration,
    Activity,
    Stress,
    Wellbeing,
    Custom(String),
}

impl Metric {
    /// The seven study metrics, in source-column order.
    pub const KNOWN: [Metric; 7] = [
        Metric::Assiduity,
        Metric::SleepDuration,
        Metric::SleepQuality,
        Metric::Hydration,
        Metric::Activity,
        Metric::Stress,
        Metric::Wellbeing,
    ];

    /// Map a source header name to a metric. Unknown names become
    /// [`Metric::Custom`].
    pub fn from_column(name: &str) -> Metric {
        match name {
            "assiduity" => Metric::Assiduity,
            "sleep_duration" => Metric::SleepDuration,
            "sleep_quality" => Metric::SleepQuality,
            "hydration" => Metric::Hydration,
            "activity" => Metric::Activity,
            "stress" => Metric::Stress,
            "wellbeing" => Metric::Wellbeing,
            other => Metric::Custom(other.to_string()),
        }
    }

    /// Column name as it appears in the source header.
    pub fn column_name(&self) -> &str {
        match self {
            Metric::Assiduity => "assiduity",
            Metric::SleepDuration => "sleep_duration",
            Metric::SleepQuality => "sleep_quality",
            Metric::Hydration => "hydration",
            Metric::Activity => "activity",
            Metric::Stress => "stress",
            Metric::Wellbeing => "wellbeing",
            Metric::Custom(name) => name,
        }
    }

    /// Human-readable name used in chart titles and axis labels.
    pub fn display_name(&self) -> &str {
        match self {
            Metric::Assiduity => "Assiduity",
            Metric::SleepDuration => "Sleep Duration",
            Metric::SleepQuality => "Sleep Quality",
            Metric::Hydration => "Hydration",
            Metric::Activity => "Activity",
            Metric::Stress => "Stress",
            Metric::Wellbeing => "Wellbeing",
            Metric::Custom(name) => name,
        }
    }

    /// Assiduity is an attendance score, not a wellbeing measurement, and is
    /// excluded from both selectors of the quartile-boxplot view.
    pub fn is_reserved(&self) -> bool {
        matches!(self, Metric::Assiduity)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ---------------------------------------------------------------------------
// MetricValues – the measurements of one observation
// ---------------------------------------------------------------------------

/// The numeric measurements of one observation. The seven study metrics are
/// plain fields; extra source columns live in `custom`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricValues {
    pub assiduity: f64,
    pub sleep_duration: f64,
    pub sleep_quality: f64,
    pub hydration: f64,
    pub activity: f64,
    pub stress: f64,
    pub wellbeing: f64,
    /// Columns beyond the fixed set, keyed by raw column name.
    pub custom: BTreeMap<String, f64>,
}

impl MetricValues {
    /// Look up a metric by selector. `None` only for a custom name this
    /// observation does not carry.
    pub fn get(&self, metric: &Metric) -> Option<f64> {
        Some(match metric {
            Metric::Assiduity => self.assiduity,
            Metric::SleepDuration => self.sleep_duration,
            Metric::SleepQuality => self.sleep_quality,
            Metric::Hydration => self.hydration,
            Metric::Activity => self.activity,
            Metric::Stress => self.stress,
            Metric::Wellbeing => self.wellbeing,
            Metric::Custom(name) => return self.custom.get(name).copied(),
        })
    }

    /// Write a metric value. Used by the loaders while assembling a row.
    pub fn set(&mut self, metric: &Metric, value: f64) {
        match metric {
            Metric::Assiduity => self.assiduity = value,
            Metric::SleepDuration => self.sleep_duration = value,
            Metric::SleepQuality => self.sleep_quality = value,
            Metric::Hydration => self.hydration = value,
            Metric::Activity => self.activity = value,
            Metric::Stress => self.stress = value,
            Metric::Wellbeing => self.wellbeing = value,
            Metric::Custom(name) => {
                self.custom.insert(name.clone(), value);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the panel
// ---------------------------------------------------------------------------

/// One observation: a user in a group at a given week.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Opaque user identifier.
    pub user_id: String,
    /// Cohort label, constant across one user's weeks.
    pub group: String,
    /// Ordinal time index; any integer origin.
    pub week: i64,
    pub metrics: MetricValues,
}

/// Record identity: `(user_id, week)` is unique within a dataset.
pub type RecordKey = (String, i64);

impl Record {
    pub fn key(&self) -> RecordKey {
        (self.user_id.clone(), self.week)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded panel
// ---------------------------------------------------------------------------

/// The full parsed panel with pre-computed indices.
///
/// Read-only after construction; every view recomputes fresh derived values
/// from this snapshot.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All observations (rows), in source order.
    pub records: Vec<Record>,
    /// Distinct group labels, in first-appearance order.
    pub groups: Vec<String>,
    /// Distinct weeks, sorted ascending.
    pub weeks: Vec<i64>,
    /// Metric columns of the source, in header order.
    pub metrics: Vec<Metric>,
    /// group → user ids, in first-appearance order.
    users_by_group: BTreeMap<String, Vec<String>>,
}

impl Dataset {
    /// Build the group/week/user indices from the loaded rows.
    pub fn from_records(records: Vec<Record>, metrics: Vec<Metric>) -> Self {
        let mut groups: Vec<String> = Vec::new();
        let mut weeks: Vec<i64> = Vec::new();
        let mut users_by_group: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for rec in &records {
            if !groups.contains(&rec.group) {
                groups.push(rec.group.clone());
            }
            if !weeks.contains(&rec.week) {
                weeks.push(rec.week);
            }
            let users = users_by_group.entry(rec.group.clone()).or_default();
            if !users.contains(&rec.user_id) {
                users.push(rec.user_id.clone());
            }
        }
        weeks.sort_unstable();

        Dataset {
            records,
            groups,
            weeks,
            metrics,
            users_by_group,
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no observations.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest week present, if any row exists.
    pub fn first_week(&self) -> Option<i64> {
        self.weeks.first().copied()
    }

    /// Latest week present, if any row exists.
    pub fn last_week(&self) -> Option<i64> {
        self.weeks.last().copied()
    }

    /// User ids belonging to `group`, in first-appearance order. Empty for an
    /// unknown group.
    pub fn users_in_group(&self, group: &str) -> &[String] {
        self.users_by_group
            .get(group)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_metric_column_round_trip() {
        for metric in Metric::KNOWN {
            assert_eq!(Metric::from_column(metric.column_name()), metric);
        }
        assert_eq!(
            Metric::from_column("mood"),
            Metric::Custom("mood".to_string())
        );
    }

    #[test]
    fn test_metric_display_names() {
        assert_eq!(Metric::SleepDuration.display_name(), "Sleep Duration");
        assert_eq!(Metric::Custom("mood".into()).display_name(), "mood");
    }

    #[test]
    fn test_metric_values_get_set() {
        let mut values = MetricValues::default();
        values.set(&Metric::Stress, 3.5);
        values.set(&Metric::Custom("mood".into()), 7.0);

        assert_eq!(values.get(&Metric::Stress), Some(3.5));
        assert_eq!(values.stress, 3.5);
        assert_eq!(values.get(&Metric::Custom("mood".into())), Some(7.0));
        assert_eq!(values.get(&Metric::Custom("absent".into())), None);
        // Fixed fields always resolve, even when never written.
        assert_eq!(values.get(&Metric::Wellbeing), Some(0.0));
    }

    #[test]
    fn test_dataset_indices() {
        let ds = Dataset::from_records(
            vec![
                record("u2", "B", 5, 1.0),
                record("u1", "A", 3, 2.0),
                record("u1", "A", 5, 3.0),
                record("u3", "A", 3, 4.0),
            ],
            vec![Metric::Hydration],
        );

        // Groups keep first-appearance order, weeks get sorted.
        assert_eq!(ds.groups, vec!["B", "A"]);
        assert_eq!(ds.weeks, vec![3, 5]);
        assert_eq!(ds.first_week(), Some(3));
        assert_eq!(ds.last_week(), Some(5));
        assert_eq!(ds.users_in_group("A"), ["u1", "u3"]);
        assert!(ds.users_in_group("missing").is_empty());
    }
}
