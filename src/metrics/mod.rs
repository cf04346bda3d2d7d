//! Derived metrics: speedup, strong scalability and roofline position.
//!
//! Every ratio here returns `Option` so a missing or zero duration shows up as
//! "not available" instead of `inf` or `NaN` downstream.

pub mod roofline;
pub mod speedup;

pub use roofline::{best_points, logspace, Bound, RooflineModel, RooflinePoint};
pub use speedup::{
    best_duration_per_thread, best_speedup_per_thread, record_speedups, sched_chunk_curves,
    sequential_durations, speedup, strong_scaling_curves, ScalingCurve, SpeedupCurve,
    SpeedupPoint, VariantCurve,
};
