//! Analysis Pipeline
//!
//! Connects the stages behind every binary:
//!
//! ```text
//! result files ─→ ResultLoader ─→ ResultSet ─→ ResultSetValidator (report only)
//!                                    │
//!              ┌─────────────────────┼───────────────────────┐
//!              ↓                     ↓                       ↓
//!       select_configs        metrics::speedup        metrics::roofline
//!              ↓                     ↓                       ↓
//!       SummaryExporter        render::* (PNG)         render::roofline
//!
//! perf folder ─→ perf::compare_profiles ─→ render::render_miss_rates
//! ```
//!
//! Each analysis has a `prepare_*`/derivation method that only computes, and
//! a `run_*` method that also writes its artifact. Tests exercise the former;
//! the binaries call the latter.
//!
//! # Example
//!
//! ```ignore
//! use spmv_analysis::prelude::*;
//!
//! let analysis = Analysis::from_config(AnalysisConfig::load("analysis.toml")?)?;
//! let report = analysis.run_speedup("seq.json", "par.json", "plots/")?;
//! println!("{} matrices -> {}", report.matrices, report.output.display());
//! ```

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::export::SummaryExporter;
use crate::loader::ResultLoader;
use crate::metrics::{
    best_points, best_speedup_per_thread, sched_chunk_curves, strong_scaling_curves, RooflineModel,
    RooflinePoint, ScalingCurve, SpeedupCurve, VariantCurve,
};
use crate::perf::{compare_profiles, ProfileComparison};
use crate::render::{self, ChartStyle};
use crate::schema::{ResultSet, SourceKind};
use crate::selection::{select_configs, SelectedConfig};
use crate::validation::ResultSetValidator;
use std::path::{Path, PathBuf};

/// What a `run_*` call produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Artifact written
    pub output: PathBuf,

    /// Matrices that made it into the artifact
    pub matrices: usize,
}

/// Result of the selection step.
#[derive(Debug, Clone)]
pub struct SelectionOutput {
    pub configs: Vec<SelectedConfig>,

    /// Records that could not be parsed
    pub skipped: usize,

    /// Summary lines written (names containing whitespace are left out)
    pub written: usize,

    pub output: PathBuf,
}

/// Analysis driver holding the configuration shared by every step.
#[derive(Debug, Clone)]
pub struct Analysis {
    config: AnalysisConfig,
    loader: ResultLoader,
    validator: ResultSetValidator,
    style: ChartStyle,
}

impl Default for Analysis {
    fn default() -> Self {
        let config = AnalysisConfig::default();
        Self {
            loader: config.result_loader(),
            style: config.chart.style(),
            validator: ResultSetValidator::new(),
            config,
        }
    }
}

impl Analysis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a configuration, rejecting invalid settings.
    pub fn from_config(config: AnalysisConfig) -> Result<Self> {
        config.validate().map_err(AnalysisError::Config)?;
        Ok(Self {
            loader: config.result_loader(),
            style: config.chart.style(),
            validator: ResultSetValidator::new(),
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// Load a file or directory and log its validation findings.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<ResultSet> {
        let path = path.as_ref();
        let set = self.loader.load(path)?;
        self.validator.validate(&set).log(&path.display().to_string());
        Ok(set)
    }

    /// Load one side of a sequential/parallel comparison.
    ///
    /// Records are told apart by their scenario; records of the other kind
    /// (a directory holding both sweeps) are set aside.
    fn load_kind(&self, path: &Path, kind: SourceKind) -> Result<ResultSet> {
        let set = self.load(path)?;
        let (sequential, parallel) = set.split_by_kind();
        let (kept, other) = match kind {
            SourceKind::Sequential => (sequential, parallel),
            SourceKind::Parallel => (parallel, sequential),
        };
        if !other.is_empty() {
            log::warn!(
                "{}: ignoring {} record(s) that are not {:?} runs",
                path.display(),
                other.len(),
                kind
            );
        }
        if kept.is_empty() && !set.is_empty() {
            log::warn!("{}: no {:?} records", path.display(), kind);
        }
        Ok(kept)
    }

    /// Load the sequential and parallel sweeps and report unpaired matrices.
    pub fn load_pair<P: AsRef<Path>, Q: AsRef<Path>>(&self, sequential: P, parallel: Q) -> Result<(ResultSet, ResultSet)> {
        let sequential = self.load_kind(sequential.as_ref(), SourceKind::Sequential)?;
        let parallel = self.load_kind(parallel.as_ref(), SourceKind::Parallel)?;
        self.validator
            .validate_pairing(&sequential, &parallel)
            .log("pairing");
        Ok((sequential, parallel))
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Best/worst/median configurations using the configured metric.
    pub fn prepare_selection(&self, set: &ResultSet) -> Vec<SelectedConfig> {
        select_configs(set, &self.config.selection.metric)
    }

    pub fn run_select<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<SelectionOutput> {
        let set = self.load(input)?;
        let configs = self.prepare_selection(&set);
        let exporter = SummaryExporter::new(output);
        let written = exporter.export(&configs)?;
        Ok(SelectionOutput {
            configs,
            skipped: set.skipped,
            written,
            output: exporter.output_path().to_path_buf(),
        })
    }

    // ------------------------------------------------------------------
    // Scalability
    // ------------------------------------------------------------------

    pub fn prepare_strong_scalability(&self, sequential: &ResultSet, parallel: &ResultSet) -> Vec<ScalingCurve> {
        strong_scaling_curves(sequential, parallel)
    }

    pub fn run_strong_scalability<P, Q, R>(&self, sequential: P, parallel: Q, out_dir: R) -> Result<RunReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
    {
        let (sequential, parallel) = self.load_pair(sequential, parallel)?;
        let curves = self.prepare_strong_scalability(&sequential, &parallel);
        let output = render::render_strong_scalability(&curves, out_dir.as_ref(), &self.style)?;
        Ok(RunReport {
            output,
            matrices: curves.len(),
        })
    }

    pub fn prepare_speedup(&self, sequential: &ResultSet, parallel: &ResultSet) -> Vec<SpeedupCurve> {
        best_speedup_per_thread(sequential, parallel)
    }

    pub fn run_speedup<P, Q, R>(&self, sequential: P, parallel: Q, out_dir: R) -> Result<RunReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
    {
        let (sequential, parallel) = self.load_pair(sequential, parallel)?;
        let curves = self.prepare_speedup(&sequential, &parallel);
        for curve in &curves {
            if let Some(best) = curve.best_overall() {
                log::info!("{}: best {} at {} threads", curve.matrix, best.annotation(), best.threads);
            }
        }
        let output = render::render_speedup(&curves, out_dir.as_ref(), &self.style)?;
        Ok(RunReport {
            output,
            matrices: curves.len(),
        })
    }

    pub fn prepare_sched_chunk(
        &self,
        matrix: &str,
        sequential: &ResultSet,
        parallel: &ResultSet,
    ) -> Result<Vec<VariantCurve>> {
        sched_chunk_curves(sequential, parallel, matrix)
    }

    pub fn run_sched_chunk<P, Q, R>(&self, matrix: &str, sequential: P, parallel: Q, out_dir: R) -> Result<RunReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
    {
        let (sequential, parallel) = self.load_pair(sequential, parallel)?;
        let curves = self.prepare_sched_chunk(matrix, &sequential, &parallel)?;
        let output = render::render_sched_chunk(matrix, &curves, out_dir.as_ref(), &self.style)?;
        Ok(RunReport { output, matrices: 1 })
    }

    // ------------------------------------------------------------------
    // Roofline
    // ------------------------------------------------------------------

    /// Model from the configured roofs (hardware peak as fallback) and the
    /// best run of every matrix.
    pub fn prepare_roofline(&self, parallel: &ResultSet) -> Result<(RooflineModel, Vec<RooflinePoint>)> {
        let model = self.config.roofline.model(&parallel.hardware)?;
        log::info!(
            "roofline: peak {:.1} GFLOP/s, bandwidth {:.1} GB/s, ridge {:.3} FLOP/byte",
            model.peak_gflops(),
            model.peak_bandwidth_gbps(),
            model.ridge_point()
        );
        let points = best_points(parallel);
        for point in &points {
            log::debug!(
                "{}: {:.3} FLOP/byte, {:.2} GFLOP/s, {}",
                point.matrix,
                point.intensity,
                point.gflops,
                model.classify(point.intensity)
            );
        }
        Ok((model, points))
    }

    pub fn run_roofline<P: AsRef<Path>, R: AsRef<Path>>(&self, parallel: P, out_dir: R) -> Result<RunReport> {
        let parallel = self.load(parallel)?;
        let (model, points) = self.prepare_roofline(&parallel)?;
        let output = render::render_roofline(&model, &points, out_dir.as_ref(), &self.style)?;
        Ok(RunReport {
            output,
            matrices: points.len(),
        })
    }

    // ------------------------------------------------------------------
    // Cache misses
    // ------------------------------------------------------------------

    pub fn prepare_miss_rates<P: AsRef<Path>>(&self, perf_dir: P) -> Result<Vec<ProfileComparison>> {
        compare_profiles(perf_dir.as_ref())
    }

    pub fn run_miss_rates<P: AsRef<Path>, R: AsRef<Path>>(&self, perf_dir: P, out_dir: R) -> Result<RunReport> {
        let comparisons = self.prepare_miss_rates(perf_dir)?;
        if comparisons.is_empty() {
            log::warn!("no matrix has both a sequential and a best profile");
        }
        let output = render::render_miss_rates(&comparisons, out_dir.as_ref(), &self.style)?;
        Ok(RunReport {
            output,
            matrices: comparisons.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = AnalysisConfig::default().with_peak_bandwidth(0.0);
        assert!(matches!(Analysis::from_config(config), Err(AnalysisError::Config(_))));
    }

    #[test]
    fn test_style_follows_config() {
        let analysis = Analysis::from_config(AnalysisConfig::default().with_chart_size(640, 480)).unwrap();
        assert_eq!(analysis.style().width, 640);
        assert_eq!(analysis.style().height, 480);
    }
}
