//! Configuration selection.
//!
//! Reduces a parameter sweep to three representative configurations per
//! matrix, which the profiling step then re-runs under `perf`:
//!
//! - **best**: maximum metric, first occurrence on ties
//! - **worst**: minimum metric, first occurrence on ties
//! - **median**: lower-middle element after a stable sort by the metric
//!
//! The median rule matters for reproducibility. For an even group size it
//! picks the element just below the midpoint (`{5, 10, 15, 20}` gives `10`).
//! Averaging the two middle values would name a configuration that was
//! never run.
//!
//! # Example
//!
//! ```ignore
//! use spmv_analysis::selection::{select_configs, MetricKind};
//!
//! let configs = select_configs(&parallel, &MetricKind::Gflops);
//! for config in &configs {
//!     println!("{config}"); // "bcsstk14.mtx best 16 dynamic 64"
//! }
//!
//! // Any closure works as a metric
//! let by_bandwidth_per_thread = |r: &RunRecord| Some(r.bandwidth_gbps()? / r.threads()? as f64);
//! let configs = select_configs(&parallel, &by_bandwidth_per_thread);
//! ```

mod metric;
mod selector;

pub use metric::{Metric, MetricKind};
pub use selector::{
    first_max_index, first_min_index, group_by_matrix, lower_median_index, select_all,
    select_configs, select_group, Candidate, GroupSelection, MatrixGroup, SelectedConfig,
    SelectionKind,
};
