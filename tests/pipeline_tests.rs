//! End-to-end analysis runs over result files on disk.

use approx::assert_relative_eq;
use serde_json::{json, Value};
use spmv_analysis::perf::{PARALLEL_DIR, SEQUENTIAL_DIR};
use spmv_analysis::{Analysis, AnalysisConfig, AnalysisError, MetricKind, SelectionKind, SummaryExporter};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn par(matrix: &str, threads: u32, scheduling: &str, chunk: u64, duration: f64, gflops: f64) -> Value {
    json!({
        "matrix": {"name": matrix},
        "scenario": {"threads": threads, "scheduling_type": scheduling, "chunk_size": chunk},
        "statistics90": {
            "duration_ms": duration,
            "GFLOPS": gflops,
            "Bandwidth_GBps": gflops * 6.0,
            "Arithmetic_intensity": 0.16
        }
    })
}

fn seq(matrix: &str, duration: f64) -> Value {
    json!({"matrix": {"name": matrix}, "statistics90": {"duration_ms": duration}})
}

/// `seq.json` and `par.json` for matrices A and B; B has no sequential run.
fn write_results(dir: &Path) -> (PathBuf, PathBuf) {
    let sequential = json!({
        "hardware": {"total_cores": 8, "cpu_mhz": 2500.0},
        "results": [seq("A.mtx", 1000.0)]
    });
    let parallel = json!({
        "hardware": {"total_cores": 8, "cpu_mhz": 2500.0},
        "results": [
            par("A.mtx", 2, "static", 1, 600.0, 1.0),
            par("A.mtx", 4, "dynamic", 64, 300.0, 3.0),
            par("A.mtx", 8, "guided", 8, 320.0, 2.0),
            par("B.mtx", 2, "static", 1, 50.0, 5.0),
            par("B.mtx", 4, "static", 1, 40.0, 6.0)
        ]
    });

    let seq_path = dir.join("seq.json");
    let par_path = dir.join("par.json");
    fs::write(&seq_path, sequential.to_string()).unwrap();
    fs::write(&par_path, parallel.to_string()).unwrap();
    (seq_path, par_path)
}

#[test]
fn test_run_select_writes_summary() {
    let dir = TempDir::new().unwrap();
    let (_, par_path) = write_results(dir.path());
    let out = dir.path().join("out/selected.txt");

    let output = Analysis::new().run_select(&par_path, &out).unwrap();

    assert_eq!(output.configs.len(), 6);
    assert_eq!(output.written, 6);
    assert_eq!(output.skipped, 0);
    let text = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "A.mtx best 4 dynamic 64");
    assert_eq!(lines[1], "A.mtx worst 2 static 1");
    assert_eq!(lines[2], "A.mtx median 8 guided 8");
    assert_eq!(lines[3], "B.mtx best 4 static 1");

    let back = SummaryExporter::new(&out).read().unwrap();
    assert_eq!(back.len(), 6);
    assert_eq!(back[5].kind, SelectionKind::Median);
}

#[test]
fn test_run_select_with_configured_metric() {
    let dir = TempDir::new().unwrap();
    let (_, par_path) = write_results(dir.path());
    let out = dir.path().join("selected.txt");

    let analysis = Analysis::from_config(AnalysisConfig::default().with_metric(MetricKind::Duration)).unwrap();
    let output = analysis.run_select(&par_path, &out).unwrap();

    // largest duration ranks highest
    assert_eq!(output.configs[0].to_line(), "A.mtx best 2 static 1");
}

#[test]
fn test_prepare_speedup_from_files() {
    let dir = TempDir::new().unwrap();
    let (seq_path, par_path) = write_results(dir.path());
    let analysis = Analysis::new();

    let (sequential, parallel) = analysis.load_pair(&seq_path, &par_path).unwrap();
    let curves = analysis.prepare_speedup(&sequential, &parallel);

    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].matrix, "A.mtx");
    assert_eq!(curves[0].best_overall().unwrap().threads, 4);

    let scaling = analysis.prepare_strong_scalability(&sequential, &parallel);
    assert_eq!(scaling.len(), 2);
    assert_eq!(scaling[1].sequential_ms, None);
}

#[test]
fn test_load_pair_from_one_directory() {
    let dir = TempDir::new().unwrap();
    write_results(dir.path());
    let analysis = Analysis::new();

    // one folder holding both sweeps: each side keeps its own kind
    let (sequential, parallel) = analysis.load_pair(dir.path(), dir.path()).unwrap();

    assert_eq!(sequential.len(), 1);
    assert_eq!(parallel.len(), 5);
}

#[test]
fn test_load_pair_ignores_misleading_file_names() {
    let dir = TempDir::new().unwrap();
    let seq_path = dir.path().join("partition_baseline.json");
    let par_path = dir.path().join("sequoia_node_results.json");
    fs::write(&seq_path, json!({"results": [seq("A.mtx", 1000.0)]}).to_string()).unwrap();
    fs::write(
        &par_path,
        json!({"results": [par("A.mtx", 4, "dynamic", 64, 300.0, 3.0)]}).to_string(),
    )
    .unwrap();
    let analysis = Analysis::new();

    let (sequential, parallel) = analysis.load_pair(&seq_path, &par_path).unwrap();
    assert_eq!(sequential.len(), 1);
    assert_eq!(parallel.len(), 1);

    let curves = analysis.prepare_speedup(&sequential, &parallel);
    assert_eq!(curves.len(), 1);
    assert_relative_eq!(curves[0].best_overall().unwrap().speedup, 1000.0 / 300.0, epsilon = 1e-9);
}

#[test]
fn test_prepare_roofline_uses_recorded_hardware() {
    let dir = TempDir::new().unwrap();
    let (_, par_path) = write_results(dir.path());
    let analysis = Analysis::new();

    let parallel = analysis.load(&par_path).unwrap();
    let (model, points) = analysis.prepare_roofline(&parallel).unwrap();

    assert_relative_eq!(model.peak_gflops(), 160.0);
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].gflops, 3.0);
    assert_eq!(points[1].gflops, 6.0);
}

#[test]
fn test_prepare_roofline_without_hardware_needs_a_peak() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("par.json");
    fs::write(&path, json!({"results": [par("A.mtx", 2, "static", 1, 1.0, 1.0)]}).to_string()).unwrap();

    let parallel = Analysis::new().load(&path).unwrap();
    assert!(matches!(
        Analysis::new().prepare_roofline(&parallel),
        Err(AnalysisError::Config(_))
    ));

    let analysis = Analysis::from_config(AnalysisConfig::default().with_peak_gflops(500.0)).unwrap();
    let (model, _) = analysis.prepare_roofline(&parallel).unwrap();
    assert_eq!(model.peak_gflops(), 500.0);
}

#[test]
fn test_sched_chunk_unknown_matrix_fails_before_rendering() {
    let dir = TempDir::new().unwrap();
    let (seq_path, par_path) = write_results(dir.path());
    let out = dir.path().join("plots");

    let err = Analysis::new()
        .run_sched_chunk("B.mtx", &seq_path, &par_path, &out)
        .unwrap_err();

    assert!(matches!(err, AnalysisError::MissingCounterpart { .. }));
    assert!(!out.join("speedup_sched_chunk_B.png").exists());
}

#[test]
fn test_miss_rates_require_profile_folders() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join(PARALLEL_DIR)).unwrap();

    let err = Analysis::new()
        .run_miss_rates(dir.path(), dir.path().join("plots"))
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Io { .. }));

    fs::create_dir(dir.path().join(SEQUENTIAL_DIR)).unwrap();
    assert!(Analysis::new().prepare_miss_rates(dir.path()).unwrap().is_empty());
}

#[test]
fn test_config_file_drives_analysis() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("analysis.toml");
    fs::write(
        &path,
        "[selection]\nmetric = \"bandwidth\"\n\n[roofline]\npeak_bandwidth_gbps = 204.8\n",
    )
    .unwrap();

    let analysis = Analysis::from_config(AnalysisConfig::load(&path).unwrap()).unwrap();

    assert_eq!(analysis.config().selection.metric, MetricKind::Bandwidth);
    assert_eq!(analysis.config().roofline.peak_bandwidth_gbps, 204.8);
}
