//! Speedup and strong-scalability derivation.

use approx::assert_relative_eq;
use spmv_analysis::metrics::sequential_durations;
use spmv_analysis::{
    best_speedup_per_thread, sched_chunk_curves, speedup, strong_scaling_curves, AnalysisError,
    ChunkSize, HardwareProfile, MatrixInfo, Measure, ResultSet, RunRecord, Scenario, Statistics,
};

fn record(matrix: &str, scenario: Option<Scenario>, duration_ms: Option<f64>, source: &str) -> RunRecord {
    RunRecord {
        matrix: MatrixInfo::named(matrix),
        scenario,
        statistics: Some(Statistics {
            duration_ms: duration_ms.map_or(Measure::Absent, Measure::Present),
            ..Statistics::default()
        }),
        warmup_ms: Measure::Absent,
        iteration_times_ms: Vec::new(),
        errors: Vec::new(),
        source: source.to_string(),
    }
}

fn seq(matrix: &str, duration_ms: f64) -> RunRecord {
    record(matrix, None, Some(duration_ms), "sequential.json")
}

fn par(matrix: &str, threads: u32, scheduling: &str, chunk: u64, duration_ms: f64) -> RunRecord {
    let scenario = Scenario::new(threads, scheduling, ChunkSize::Value(chunk));
    record(matrix, Some(scenario), Some(duration_ms), "parallel.json")
}

fn set(source: &str, records: Vec<RunRecord>) -> ResultSet {
    let mut set = ResultSet::new(source, HardwareProfile::unavailable());
    set.records = records;
    set
}

/// Matrix A: sequential 1000 ms; parallel 2→600, 4→300, 8→320.
fn matrix_a() -> (ResultSet, ResultSet) {
    let sequential = set("sequential.json", vec![seq("A.mtx", 1000.0)]);
    let parallel = set(
        "parallel.json",
        vec![
            par("A.mtx", 2, "static", 1, 600.0),
            par("A.mtx", 4, "dynamic", 64, 300.0),
            par("A.mtx", 4, "static", 1, 450.0),
            par("A.mtx", 8, "guided", 8, 320.0),
        ],
    );
    (sequential, parallel)
}

#[test]
fn test_speedup_definition() {
    assert_eq!(speedup(1000.0, 1000.0), Some(1.0));
    assert_relative_eq!(speedup(1000.0, 300.0).unwrap(), 3.333, epsilon = 1e-3);
    assert_eq!(speedup(1000.0, 0.0), None);
}

#[test]
fn test_best_speedup_per_thread() {
    let (sequential, parallel) = matrix_a();

    let curves = best_speedup_per_thread(&sequential, &parallel);

    assert_eq!(curves.len(), 1);
    let curve = &curves[0];
    assert_eq!(curve.points.len(), 3);
    assert_relative_eq!(curve.points[&2].speedup, 1.667, epsilon = 1e-3);
    assert_relative_eq!(curve.points[&4].speedup, 3.333, epsilon = 1e-3);
    assert_relative_eq!(curve.points[&8].speedup, 3.125, epsilon = 1e-3);

    // the faster of the two 4-thread variants wins
    assert_eq!(curve.points[&4].scenario.as_ref().unwrap().scheduling, "dynamic");

    let best = curve.best_overall().unwrap();
    assert_eq!(best.threads, 4);
    assert_eq!(best.annotation(), "speedUp:3.33, scheduling: dynamic, chunkSize: 64");
}

#[test]
fn test_speedup_curve_starts_at_baseline() {
    let (sequential, parallel) = matrix_a();
    let curve = &best_speedup_per_thread(&sequential, &parallel)[0];

    let points = curve.with_baseline();
    let threads: Vec<u32> = points.iter().map(|p| p.threads).collect();
    assert_eq!(threads, vec![1, 2, 4, 8]);
    assert_eq!(points[0].speedup, 1.0);
    assert_eq!(curve.peak().unwrap().threads, 4);
}

#[test]
fn test_matrix_without_baseline_is_excluded() {
    let sequential = set("sequential.json", vec![seq("A.mtx", 100.0)]);
    let parallel = set(
        "parallel.json",
        vec![par("A.mtx", 2, "static", 1, 50.0), par("X.mtx", 2, "static", 1, 50.0)],
    );

    let curves = best_speedup_per_thread(&sequential, &parallel);

    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].matrix, "A.mtx");
}

#[test]
fn test_sequential_durations_later_wins_and_ignores_unusable() {
    let sequential = set(
        "sequential.json",
        vec![
            seq("A.mtx", 100.0),
            seq("A.mtx", 120.0),
            seq("B.mtx", 0.0),
            record("C.mtx", None, None, "sequential.json"),
        ],
    );

    let durations = sequential_durations(&sequential);

    assert_eq!(durations.len(), 1);
    assert_eq!(durations["A.mtx"], 120.0);
}

#[test]
fn test_strong_scaling_curves() {
    let (sequential, parallel) = matrix_a();

    let curves = strong_scaling_curves(&sequential, &parallel);

    assert_eq!(curves.len(), 1);
    let curve = &curves[0];
    assert_eq!(curve.sequential_ms, Some(1000.0));
    assert_eq!(curve.points(), vec![(1, 1000.0), (2, 600.0), (4, 300.0), (8, 320.0)]);

    let theory = curve.theoretical();
    assert_eq!(theory.len(), 4);
    assert_relative_eq!(theory[3].1, 125.0);
}

#[test]
fn test_strong_scaling_without_sequential_run() {
    let sequential = set("sequential.json", Vec::new());
    let parallel = set("parallel.json", vec![par("A.mtx", 2, "static", 1, 10.0)]);

    let curves = strong_scaling_curves(&sequential, &parallel);

    assert_eq!(curves[0].points(), vec![(2, 10.0)]);
    assert!(curves[0].theoretical().is_empty());
}

#[test]
fn test_sched_chunk_curves() {
    let sequential = set("sequential.json", vec![seq("A.mtx", 1000.0)]);
    let parallel = set(
        "parallel.json",
        vec![
            par("A.mtx", 4, "static", 1, 500.0),
            par("A.mtx", 2, "static", 1, 800.0),
            par("A.mtx", 2, "dynamic", 64, 500.0),
            par("B.mtx", 2, "dynamic", 64, 1.0),
        ],
    );

    let curves = sched_chunk_curves(&sequential, &parallel, "A.mtx").unwrap();

    assert_eq!(curves.len(), 2);
    let dynamic = curves.iter().find(|c| c.scheduling == "dynamic").unwrap();
    assert_eq!(dynamic.label(), "dynamic, chunk=64");
    assert_eq!(dynamic.points, vec![(1, 1.0), (2, 2.0)]);

    let stat = curves.iter().find(|c| c.scheduling == "static").unwrap();
    assert_eq!(stat.points, vec![(1, 1.0), (2, 1.25), (4, 2.0)]);
}

#[test]
fn test_sched_chunk_missing_counterparts() {
    let sequential = set("sequential.json", vec![seq("A.mtx", 1000.0)]);
    let parallel = set("parallel.json", vec![par("A.mtx", 2, "static", 1, 500.0)]);

    let err = sched_chunk_curves(&sequential, &parallel, "Q.mtx").unwrap_err();
    assert!(matches!(err, AnalysisError::MissingCounterpart { .. }));
    assert!(err.to_string().contains("sequential duration"));

    let only_seq = set("sequential.json", vec![seq("A.mtx", 1000.0), seq("B.mtx", 10.0)]);
    let err = sched_chunk_curves(&only_seq, &parallel, "B.mtx").unwrap_err();
    assert!(err.to_string().contains("parallel runs"));
}
