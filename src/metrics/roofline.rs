//! Roofline model.
//!
//! ```text
//!  GFLOP/s
//!     ^          ridge
//!     |            v____________________  peak_gflops
//!     |           /
//!     |          /   compute-bound side
//!     |         /
//!     |        /  slope = peak_bandwidth_gbps
//!     |       /
//!     +------+------------------------------> FLOP/byte
//! ```
//!
//! `attainable(i) = min(i × bandwidth, peak)`. A point is bandwidth-bound
//! left of the ridge and compute-bound at or right of it. Classification is
//! always derived from the model and never stored on a record.

use crate::error::{AnalysisError, Result};
use crate::schema::{ResultSet, Scenario};
use crate::selection::first_max_index;
use std::fmt;

/// Lower end of the rendered intensity axis, FLOP/byte.
pub const ROOF_MIN_INTENSITY: f64 = 1e-2;

/// Upper end of the rendered intensity axis, FLOP/byte.
pub const ROOF_MAX_INTENSITY: f64 = 1e2;

/// Which roof limits a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    BandwidthBound,
    ComputeBound,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::BandwidthBound => write!(f, "bandwidth-bound"),
            Bound::ComputeBound => write!(f, "compute-bound"),
        }
    }
}

/// Machine roofs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RooflineModel {
    peak_gflops: f64,
    peak_bandwidth_gbps: f64,
}

impl RooflineModel {
    /// Build a model; both constants must be positive and finite.
    pub fn new(peak_gflops: f64, peak_bandwidth_gbps: f64) -> Result<Self> {
        for (name, value) in [
            ("peak GFLOP/s", peak_gflops),
            ("peak bandwidth", peak_bandwidth_gbps),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AnalysisError::Config(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(Self {
            peak_gflops,
            peak_bandwidth_gbps,
        })
    }

    pub fn peak_gflops(&self) -> f64 {
        self.peak_gflops
    }

    pub fn peak_bandwidth_gbps(&self) -> f64 {
        self.peak_bandwidth_gbps
    }

    /// Attainable GFLOP/s at an arithmetic intensity.
    #[inline]
    pub fn attainable(&self, intensity: f64) -> f64 {
        (intensity * self.peak_bandwidth_gbps).min(self.peak_gflops)
    }

    /// Intensity where the bandwidth roof meets the compute roof.
    #[inline]
    pub fn ridge_point(&self) -> f64 {
        self.peak_gflops / self.peak_bandwidth_gbps
    }

    pub fn classify(&self, intensity: f64) -> Bound {
        if intensity < self.ridge_point() {
            Bound::BandwidthBound
        } else {
            Bound::ComputeBound
        }
    }

    /// Achieved / attainable, `None` when nothing is attainable.
    pub fn efficiency(&self, intensity: f64, achieved_gflops: f64) -> Option<f64> {
        let attainable = self.attainable(intensity);
        (attainable.is_finite() && attainable > 0.0).then(|| achieved_gflops / attainable)
    }

    /// `(intensity, attainable)` sampled log-uniformly over the rendered axis.
    pub fn roof_curve(&self, samples: usize) -> Vec<(f64, f64)> {
        logspace(ROOF_MIN_INTENSITY, ROOF_MAX_INTENSITY, samples)
            .into_iter()
            .map(|i| (i, self.attainable(i)))
            .collect()
    }
}

/// `n` points spaced evenly in log10 between `start` and `end` (inclusive).
pub fn logspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let (lo, hi) = (start.log10(), end.log10());
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|k| 10f64.powf(lo + step * k as f64)).collect()
        }
    }
}

/// Best-GFLOP/s run of one matrix placed on the roofline.
#[derive(Debug, Clone, PartialEq)]
pub struct RooflinePoint {
    pub matrix: String,
    pub intensity: f64,
    pub gflops: f64,
    pub scenario: Option<Scenario>,
}

impl RooflinePoint {
    /// Legend text: `"<matrix> (T=16, dynamic, C=64)"`.
    pub fn label(&self) -> String {
        match &self.scenario {
            Some(s) => format!("{} (T={}, {}, C={})", self.matrix, s.threads, s.scheduling, s.chunk),
            None => self.matrix.clone(),
        }
    }
}

/// Maximum-GFLOP/s run per matrix, matrices in first-appearance order.
///
/// Runs without GFLOP/s or intensity are skipped; ties keep the first run.
pub fn best_points(set: &ResultSet) -> Vec<RooflinePoint> {
    set.matrix_names()
        .into_iter()
        .filter_map(|matrix| {
            let runs: Vec<(f64, f64, Option<Scenario>)> = set
                .records_for(matrix)
                .filter_map(|r| Some((r.gflops()?, r.arithmetic_intensity()?, r.scenario.clone())))
                .collect();
            let gflops: Vec<f64> = runs.iter().map(|(g, _, _)| *g).collect();
            let Some(best) = first_max_index(&gflops) else {
                log::warn!("{matrix}: no run with both GFLOP/s and intensity, left off the roofline");
                return None;
            };
            let (gflops, intensity, scenario) = runs[best].clone();
            Some(RooflinePoint {
                matrix: matrix.to_string(),
                intensity,
                gflops,
                scenario,
            })
        })
        .collect()
}
