//! Result Schema Module
//!
//! Typed view of the benchmark result files written by the SpMV drivers.
//!
//! # Design Philosophy
//!
//! - **Explicit absence**: every measured field is a [`Measure`], so "not
//!   measured" never turns into `0.0` on the way to a ratio or a plot
//! - **Provenance**: each [`RunRecord`] remembers the file it came from
//! - **Read-only**: records are built once by the loader and only viewed after
//!
//! # Example
//!
//! ```ignore
//! use spmv_analysis::schema::{Measure, ResultSet};
//!
//! let set: ResultSet = spmv_analysis::loader::load_file("parallel.json")?;
//! for record in set.iter() {
//!     match record.statistics.map(|s| s.gflops) {
//!         Some(Measure::Present(g)) => println!("{}: {g:.2} GFLOP/s", record.matrix_name()),
//!         _ => println!("{}: not measured", record.matrix_name()),
//!     }
//! }
//! ```

mod measure;
mod record;

pub use measure::Measure;
pub use record::{
    ChunkSize, HardwareProfile, MatrixInfo, ResultSet, RunRecord, Scenario, SourceKind,
    Statistics, UNKNOWN_SCHEDULING,
};

/// Default FLOPs issued per core per cycle (one AVX-512 FMA lane group).
pub const DEFAULT_FLOPS_PER_CYCLE: f64 = 8.0;

/// Default memory bandwidth assumed for the roofline, GB/s.
pub const DEFAULT_PEAK_BANDWIDTH_GBPS: f64 = 400.0;
