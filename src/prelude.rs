//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions of the
//! analysis library.
//!
//! # Usage
//!
//! ```ignore
//! use spmv_analysis::prelude::*;
//!
//! let analysis = Analysis::from_config(AnalysisConfig::default())?;
//! let (sequential, parallel) = analysis.load_pair("seq.json", "par.json")?;
//! for curve in analysis.prepare_speedup(&sequential, &parallel) {
//!     println!("{}: {:?}", curve.matrix, curve.peak());
//! }
//! ```
//!
//! # What's Included
//!
//! ## Pipeline
//! - [`Analysis`] - Driver behind the binaries
//! - [`AnalysisConfig`] - Configuration (TOML or JSON)
//!
//! ## Data
//! - [`ResultLoader`] - Tolerant result loading
//! - [`ResultSet`], [`RunRecord`], [`Scenario`] - Loaded benchmark results
//! - [`Measure`] - Present / absent / invalid field values
//!
//! ## Analyses
//! - [`select_configs`] - Best / worst / median per matrix
//! - [`speedup`], [`best_speedup_per_thread`], [`strong_scaling_curves`]
//! - [`RooflineModel`] - Attainable performance bound
//! - [`PerfProfile`] - Hardware counters from `perf stat`

// ============================================================================
// Pipeline & Configuration
// ============================================================================

pub use crate::config::AnalysisConfig;
pub use crate::pipeline::{Analysis, RunReport, SelectionOutput};

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::{AnalysisError, Result};

// ============================================================================
// Schema & Loading
// ============================================================================

pub use crate::loader::ResultLoader;
pub use crate::schema::{
    ChunkSize, HardwareProfile, MatrixInfo, Measure, ResultSet, RunRecord, Scenario, SourceKind,
    Statistics,
};

// ============================================================================
// Selection
// ============================================================================

pub use crate::selection::{select_configs, Metric, MetricKind, SelectedConfig, SelectionKind};

// ============================================================================
// Metrics
// ============================================================================

pub use crate::metrics::{
    best_points, best_speedup_per_thread, sched_chunk_curves, speedup, strong_scaling_curves,
    Bound, RooflineModel, RooflinePoint, ScalingCurve, SpeedupCurve, SpeedupPoint, VariantCurve,
};

// ============================================================================
// Hardware Counters
// ============================================================================

pub use crate::perf::{MissRates, PerfProfile, ProfileComparison, RunLabel};

// ============================================================================
// Rendering & Export
// ============================================================================

pub use crate::export::SummaryExporter;
pub use crate::render::ChartStyle;

// ============================================================================
// Validation
// ============================================================================

pub use crate::validation::{ResultSetValidator, ValidationLevel, ValidationResult};
