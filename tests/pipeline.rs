//! End-to-end: CSV on disk → loader → session → chart specs.

use std::sync::Arc;

use panel_lens::data::loader;
use panel_lens::{ChartKind, Metric, SelectionError, Session, View, ViewOutcome};

fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

const PANEL_CSV: &str = "\
user_id,group,week,assiduity,sleep_duration,sleep_quality,hydration,activity,stress,wellbeing
u1,A,1,0.9,7.0,6.0,2.0,3.0,1.0,5.0
u2,A,1,0.8,6.5,5.0,6.0,2.0,1.0,6.0
u3,B,1,0.7,8.0,7.0,10.0,4.0,2.0,7.0
u4,B,1,0.6,7.5,6.5,12.0,3.0,3.0,6.5
u1,A,2,0.9,7.2,6.5,4.0,3.5,4.0,5.5
u2,A,2,0.8,6.7,5.5,8.0,2.5,5.0,6.2
u3,B,2,0.7,8.1,7.2,12.0,4.2,6.0,7.3
u4,B,2,0.6,7.6,6.7,12.0,3.1,7.0,6.8
";

#[test]
fn group_comparison_means_through_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_csv(&dir, "panel.csv", PANEL_CSV);
    let dataset = loader::load_session(&source).unwrap();

    let mut session = Session::new(Arc::clone(&dataset));
    session.select_view(View::GroupComparison {
        metric: Metric::Hydration,
        groups: vec!["A".to_string(), "B".to_string()],
    });

    let ViewOutcome::Charts(specs) = session.evaluate() else {
        panic!("expected charts");
    };
    assert_eq!(specs.len(), 4);

    // Line chart: week-1 means A=(2+6)/2=4, B=(10+12)/2=11; week-2 A=6, B=12.
    let line = &specs[0];
    assert_eq!(line.kind, ChartKind::Line);
    assert_eq!(line.series[0].name, "A");
    assert_eq!(line.series[0].xs, vec![1.0, 2.0]);
    assert_eq!(line.series[0].ys, vec![4.0, 6.0]);
    assert_eq!(line.series[1].ys, vec![11.0, 12.0]);

    // First-week histogram carries the raw week-1 values per group.
    assert_eq!(specs[1].series[0].xs, vec![2.0, 6.0]);
    assert_eq!(specs[2].kind, ChartKind::Histogram);
    assert_eq!(specs[3].kind, ChartKind::Boxplot);
}

#[test]
fn user_evolution_is_sorted_and_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_csv(&dir, "panel.csv", PANEL_CSV);
    let dataset = loader::load_session(&source).unwrap();

    let view = View::UserEvolution {
        metric: Metric::Wellbeing,
        group: "A".to_string(),
        user_id: "u2".to_string(),
    };
    let mut session = Session::new(Arc::clone(&dataset));
    session.select_view(view);

    let first = session.evaluate();
    let second = session.evaluate();
    assert_eq!(first, second);

    let ViewOutcome::Charts(specs) = first else {
        panic!("expected charts");
    };
    assert_eq!(specs[0].series[0].xs, vec![1.0, 2.0]);
    assert_eq!(specs[0].series[0].ys, vec![6.0, 6.2]);
}

#[test]
fn quartile_boxplot_partitions_last_week() {
    // Week-1 rows are irrelevant here: the binner only sees the last week,
    // whose stress values are [4,5,6,7].
    let dir = tempfile::tempdir().unwrap();
    let source = write_csv(&dir, "panel.csv", PANEL_CSV);
    let dataset = loader::load_session(&source).unwrap();

    let mut session = Session::new(Arc::clone(&dataset));
    session.select_view(View::QuartileBoxplot {
        metric_to_plot: Metric::Wellbeing,
        metric_for_quartiles: Metric::Stress,
    });

    let ViewOutcome::Charts(specs) = session.evaluate() else {
        panic!("expected charts");
    };
    let spec = &specs[0];
    assert_eq!(spec.series.len(), 4);
    assert!(spec.series.iter().all(|s| s.ys.len() == 1));
    // Q1 holds the lowest-stress record (u1, wellbeing 5.5), Q4 the highest
    // (u4, wellbeing 6.8).
    assert_eq!(spec.series[0].ys, vec![5.5]);
    assert_eq!(spec.series[3].ys, vec![6.8]);
}

#[test]
fn failed_selection_leaves_session_usable() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_csv(&dir, "panel.csv", PANEL_CSV);
    let dataset = loader::load_session(&source).unwrap();
    let mut session = Session::new(Arc::clone(&dataset));

    session.select_view(View::ScatterComparison {
        metric_x: Metric::Stress,
        metric_y: Metric::Wellbeing,
        week: 99,
    });
    assert_eq!(
        session.evaluate(),
        ViewOutcome::NoChart(SelectionError::NoSuchWeek { week: 99 })
    );

    // The snapshot is untouched; the next selection works.
    session.select_view(View::ScatterComparison {
        metric_x: Metric::Stress,
        metric_y: Metric::Wellbeing,
        week: 2,
    });
    let ViewOutcome::Charts(specs) = session.evaluate() else {
        panic!("expected charts");
    };
    assert_eq!(specs[0].kind, ChartKind::Scatter);
    assert_eq!(specs[0].series.len(), 2);
    assert_eq!(specs[0].series[0].xs, vec![4.0, 5.0]);
    assert_eq!(specs[0].series[0].ys, vec![5.5, 6.2]);
}

#[test]
fn single_week_dataset_still_renders_group_comparison() {
    let csv = "\
user_id,group,week,hydration
u1,A,7,2.0
u2,A,7,4.0
u3,B,7,6.0
";
    let dir = tempfile::tempdir().unwrap();
    let source = write_csv(&dir, "single_week.csv", csv);
    let dataset = loader::load_session(&source).unwrap();

    let mut session = Session::new(Arc::clone(&dataset));
    session.select_view(View::GroupComparison {
        metric: Metric::Hydration,
        groups: dataset.groups.clone(),
    });

    let ViewOutcome::Charts(specs) = session.evaluate() else {
        panic!("expected charts");
    };
    // First- and last-week histograms are equal when only one week exists.
    assert_eq!(specs[1].series, specs[2].series);
}
