//! SpMV Benchmark Analysis
//!
//! Post-processing toolkit for sparse matrix-vector multiplication benchmark
//! results.
//!
//! # Overview
//!
//! A benchmark campaign sweeps every matrix over thread counts, scheduling
//! policies and chunk sizes, writing one JSON document per sweep. This crate
//! turns those documents into:
//!
//! - **Selected configurations**: best / worst / median per matrix, the input
//!   of the `perf` profiling step
//! - **Strong scalability** and **speedup** charts
//! - **Roofline** placement of the best run of every matrix
//! - **Cache-miss** comparisons from `perf stat` output
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      SpMV Analysis                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  schema/     - Records, hardware profile, tri-state measures    │
//! │  loader      - Tolerant JSON loading (files and folders)        │
//! │  selection/  - Best / worst / median per matrix                 │
//! │  metrics/    - Speedup, scalability, roofline                   │
//! │  perf/       - Counter extraction and miss rates                │
//! │  render/     - PNG charts                                       │
//! │  export/     - Selected-configuration summary                   │
//! │  pipeline    - Orchestration used by the binaries               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use spmv_analysis::prelude::*;
//!
//! let analysis = Analysis::new();
//! let output = analysis.run_select("results/parallel.json", "selected.txt")?;
//! for config in &output.configs {
//!     println!("{config}");
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod metrics;
pub mod perf;
pub mod pipeline;
pub mod prelude;
pub mod render;
pub mod schema;
pub mod selection;
pub mod validation;

// Re-exports - Errors
pub use error::{AnalysisError, Result};

// Re-exports - Schema
pub use schema::{
    ChunkSize, HardwareProfile, MatrixInfo, Measure, ResultSet, RunRecord, Scenario, SourceKind,
    Statistics,
};

// Re-exports - Config
pub use config::{AnalysisConfig, ChartConfig, LoaderConfig, RooflineConfig, SelectionConfig};

// Re-exports - Loading
pub use loader::{load_file, parse_document, ResultLoader};

// Re-exports - Selection
pub use selection::{select_configs, Metric, MetricKind, SelectedConfig, SelectionKind};

// Re-exports - Metrics
pub use metrics::{
    best_points, best_speedup_per_thread, sched_chunk_curves, speedup, strong_scaling_curves,
    Bound, RooflineModel, RooflinePoint, ScalingCurve, SpeedupCurve, SpeedupPoint, VariantCurve,
};

// Re-exports - Profiles
pub use perf::{compare_profiles, gather_profiles, miss_rate, MissRates, PerfProfile, RunLabel};

// Re-exports - Export
pub use export::{parse_selected_configs, write_selected_configs, SummaryExporter};

// Re-exports - Validation
pub use validation::{ResultSetValidator, ValidationConfig, ValidationLevel, ValidationResult};

// Re-exports - Pipeline
pub use pipeline::{Analysis, RunReport, SelectionOutput};
