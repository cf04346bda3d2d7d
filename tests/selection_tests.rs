//! Best / worst / median selection.

use approx::assert_relative_eq;
use spmv_analysis::export::parse_selected_configs;
use spmv_analysis::selection::{select_all, SelectedConfig};
use spmv_analysis::{
    select_configs, ChunkSize, HardwareProfile, MatrixInfo, Measure, MetricKind, ResultSet,
    RunRecord, Scenario, SelectionKind, Statistics,
};

fn run(matrix: &str, threads: u32, scheduling: &str, chunk: u64, gflops: Option<f64>) -> RunRecord {
    RunRecord {
        matrix: MatrixInfo::named(matrix),
        scenario: Some(Scenario::new(threads, scheduling, ChunkSize::Value(chunk))),
        statistics: Some(Statistics {
            duration_ms: Measure::Present(1.0),
            gflops: gflops.map_or(Measure::Absent, Measure::Present),
            ..Statistics::default()
        }),
        warmup_ms: Measure::Absent,
        iteration_times_ms: Vec::new(),
        errors: Vec::new(),
        source: "parallel.json".to_string(),
    }
}

fn set(records: Vec<RunRecord>) -> ResultSet {
    let mut set = ResultSet::new("parallel.json", HardwareProfile::unavailable());
    set.records = records;
    set
}

fn pick<'a>(configs: &'a [SelectedConfig], matrix: &str, kind: SelectionKind) -> &'a SelectedConfig {
    configs
        .iter()
        .find(|c| c.matrix == matrix && c.kind == kind)
        .unwrap()
}

#[test]
fn test_odd_group() {
    let set = set(vec![
        run("B.mtx", 2, "static", 1, Some(10.0)),
        run("B.mtx", 4, "dynamic", 8, Some(20.0)),
        run("B.mtx", 8, "guided", 64, Some(15.0)),
    ]);

    let configs = select_configs(&set, &MetricKind::Gflops);

    assert_eq!(configs.len(), 3);
    assert_eq!(pick(&configs, "B.mtx", SelectionKind::Best).metric_value, Some(20.0));
    assert_eq!(pick(&configs, "B.mtx", SelectionKind::Worst).metric_value, Some(10.0));
    assert_eq!(pick(&configs, "B.mtx", SelectionKind::Median).metric_value, Some(15.0));
    assert_eq!(
        pick(&configs, "B.mtx", SelectionKind::Best).to_line(),
        "B.mtx best 4 dynamic 8"
    );
}

#[test]
fn test_even_group_takes_lower_middle() {
    let set = set(vec![
        run("C.mtx", 1, "static", 1, Some(20.0)),
        run("C.mtx", 2, "static", 1, Some(5.0)),
        run("C.mtx", 4, "static", 1, Some(15.0)),
        run("C.mtx", 8, "static", 1, Some(10.0)),
    ]);

    let configs = select_configs(&set, &MetricKind::Gflops);

    let median = pick(&configs, "C.mtx", SelectionKind::Median);
    assert_eq!(median.metric_value, Some(10.0));
    assert_eq!(median.scenario.threads, 8);
}

#[test]
fn test_single_record_is_best_worst_and_median() {
    let set = set(vec![run("D.mtx", 16, "dynamic", 32, Some(3.0))]);

    let configs = select_configs(&set, &MetricKind::Gflops);

    assert_eq!(configs.len(), 3);
    assert!(configs.iter().all(|c| c.scenario.threads == 16));
}

#[test]
fn test_ties_prefer_first_record() {
    let set = set(vec![
        run("E.mtx", 2, "static", 1, Some(7.0)),
        run("E.mtx", 4, "static", 1, Some(7.0)),
        run("E.mtx", 8, "static", 1, Some(7.0)),
    ]);

    let configs = select_configs(&set, &MetricKind::Gflops);

    assert_eq!(pick(&configs, "E.mtx", SelectionKind::Best).scenario.threads, 2);
    assert_eq!(pick(&configs, "E.mtx", SelectionKind::Worst).scenario.threads, 2);
}

#[test]
fn test_unmeasured_and_sequential_records_are_not_ranked() {
    let mut sequential = run("F.mtx", 1, "static", 1, Some(100.0));
    sequential.scenario = None;

    let set = set(vec![
        sequential,
        run("F.mtx", 2, "static", 1, None),
        run("F.mtx", 4, "static", 1, Some(2.0)),
        run("G.mtx", 4, "static", 1, None),
    ]);

    let selections = select_all(&set, &MetricKind::Gflops);

    // G has nothing rankable and is dropped
    assert_eq!(selections.len(), 1);
    assert_eq!(selections[0].matrix, "F.mtx");
    assert_eq!(selections[0].ranked, 1);
    assert_eq!(selections[0].best.record.threads(), Some(4));
}

#[test]
fn test_matrices_keep_first_appearance_order() {
    let set = set(vec![
        run("Z.mtx", 2, "static", 1, Some(1.0)),
        run("A.mtx", 2, "static", 1, Some(1.0)),
        run("Z.mtx", 4, "static", 1, Some(2.0)),
    ]);

    let configs = select_configs(&set, &MetricKind::Gflops);

    let order: Vec<(&str, SelectionKind)> = configs.iter().map(|c| (c.matrix.as_str(), c.kind)).collect();
    assert_eq!(
        order,
        vec![
            ("Z.mtx", SelectionKind::Best),
            ("Z.mtx", SelectionKind::Worst),
            ("Z.mtx", SelectionKind::Median),
            ("A.mtx", SelectionKind::Best),
            ("A.mtx", SelectionKind::Worst),
            ("A.mtx", SelectionKind::Median),
        ]
    );
}

#[test]
fn test_custom_closure_metric() {
    let set = set(vec![
        run("H.mtx", 2, "static", 1, Some(4.0)),
        run("H.mtx", 8, "static", 1, Some(6.0)),
    ]);

    // GFLOP/s per thread
    let per_thread = |r: &RunRecord| Some(r.gflops()? / f64::from(r.threads()?));
    let configs = select_configs(&set, &per_thread);

    let best = pick(&configs, "H.mtx", SelectionKind::Best);
    assert_eq!(best.scenario.threads, 2);
    assert_relative_eq!(best.metric_value.unwrap(), 2.0);
    assert_relative_eq!(pick(&configs, "H.mtx", SelectionKind::Worst).metric_value.unwrap(), 0.75);
}

#[test]
fn test_summary_lines_parse_back() {
    let set = set(vec![
        run("I.mtx", 2, "static", 1, Some(1.0)),
        run("I.mtx", 4, "guided", 16, Some(3.0)),
    ]);
    let configs = select_configs(&set, &MetricKind::Gflops);

    let text: String = configs.iter().map(|c| format!("{c}\n")).collect();
    let parsed = parse_selected_configs(&text).unwrap();

    assert_eq!(parsed.len(), configs.len());
    for (a, b) in parsed.iter().zip(&configs) {
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.scenario, b.scenario);
    }
}
