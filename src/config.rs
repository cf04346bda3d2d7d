//! Analysis configuration management.
//!
//! One struct carries every tunable of the toolkit so a report can be
//! regenerated with exactly the same settings.
//!
//! # Features
//!
//! - **Unified Configuration**: loader, selection, roofline and chart settings
//! - **Serialization**: Save/load configurations to TOML or JSON
//! - **Validation**: Reject non-positive constants before any work starts
//! - **Partial files**: every section has defaults, so a config file only
//!   needs the keys it changes
//!
//! # Example
//!
//! ```ignore
//! use spmv_analysis::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::default().with_peak_bandwidth(204.8);
//! config.save_toml("analysis.toml")?;
//!
//! let loaded = AnalysisConfig::load("analysis.toml")?;
//! assert_eq!(loaded.roofline.peak_bandwidth_gbps, 204.8);
//! ```
//!
//! ```toml
//! [selection]
//! metric = "bandwidth"
//!
//! [roofline]
//! peak_bandwidth_gbps = 204.8
//! peak_gflops = 1766.4
//! ```

use crate::error::{AnalysisError, Result};
use crate::loader::{ResultLoader, DEFAULT_PATTERN};
use crate::metrics::RooflineModel;
use crate::render::ChartStyle;
use crate::schema::{HardwareProfile, DEFAULT_FLOPS_PER_CYCLE, DEFAULT_PEAK_BANDWIDTH_GBPS};
use crate::selection::MetricKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Unified analysis configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Result file discovery
    pub loader: LoaderConfig,

    /// Representative-configuration selection
    pub selection: SelectionConfig,

    /// Machine roofs
    pub roofline: RooflineConfig,

    /// Output image settings
    pub chart: ChartConfig,
}

/// How directory inputs are expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Glob pattern matched inside an input directory
    pub pattern: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
        }
    }
}

/// Selection settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Metric used to rank configurations
    pub metric: MetricKind,
}

/// Roofline constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RooflineConfig {
    /// Memory bandwidth roof in GB/s
    pub peak_bandwidth_gbps: f64,

    /// Compute roof in GFLOP/s; derived from the hardware profile when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_gflops: Option<f64>,

    /// FLOPs per core per cycle used for the derived compute roof
    pub flops_per_cycle: f64,
}

impl Default for RooflineConfig {
    fn default() -> Self {
        Self {
            peak_bandwidth_gbps: DEFAULT_PEAK_BANDWIDTH_GBPS,
            peak_gflops: None,
            flops_per_cycle: DEFAULT_FLOPS_PER_CYCLE,
        }
    }
}

/// Chart image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let style = ChartStyle::default();
        Self {
            width: style.width,
            height: style.height,
            font_family: style.font_family,
        }
    }
}

fn positive(name: &str, value: f64) -> std::result::Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("{name} must be positive and finite, got {value}"))
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metric(mut self, metric: MetricKind) -> Self {
        self.selection.metric = metric;
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.loader.pattern = pattern.into();
        self
    }

    pub fn with_peak_bandwidth(mut self, gbps: f64) -> Self {
        self.roofline.peak_bandwidth_gbps = gbps;
        self
    }

    pub fn with_peak_gflops(mut self, gflops: f64) -> Self {
        self.roofline.peak_gflops = Some(gflops);
        self
    }

    pub fn with_chart_size(mut self, width: u32, height: u32) -> Self {
        self.chart.width = width;
        self.chart.height = height;
        self
    }

    /// Validate every section.
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.loader.validate()?;
        self.roofline.validate()?;
        self.chart.validate()?;
        Ok(())
    }

    /// Loader built from this configuration.
    pub fn result_loader(&self) -> ResultLoader {
        ResultLoader::new().with_pattern(self.loader.pattern.clone())
    }

    /// Load a configuration, choosing the format by file extension
    /// (`.json` is JSON, anything else TOML).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::load_json(path),
            _ => Self::load_toml(path),
        }
    }

    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = toml::to_string_pretty(self).map_err(|e| AnalysisError::Config(e.to_string()))?;
        fs::write(path, text).map_err(|e| AnalysisError::io(path, e))
    }

    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        let config: AnalysisConfig =
            toml::from_str(&text).map_err(|e| AnalysisError::parse(path.display().to_string(), e.to_string()))?;
        config.validate().map_err(AnalysisError::Config)?;
        Ok(config)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).map_err(|e| AnalysisError::Config(e.to_string()))?;
        fs::write(path, text).map_err(|e| AnalysisError::io(path, e))
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        let config: AnalysisConfig = serde_json::from_str(&text)
            .map_err(|e| AnalysisError::parse(path.display().to_string(), e.to_string()))?;
        config.validate().map_err(AnalysisError::Config)?;
        Ok(config)
    }
}

impl LoaderConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.pattern.trim().is_empty() {
            return Err("loader pattern must not be empty".to_string());
        }
        glob::Pattern::new(&self.pattern).map_err(|e| format!("loader pattern `{}`: {e}", self.pattern))?;
        Ok(())
    }
}

impl RooflineConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        positive("peak_bandwidth_gbps", self.peak_bandwidth_gbps)?;
        positive("flops_per_cycle", self.flops_per_cycle)?;
        if let Some(peak) = self.peak_gflops {
            positive("peak_gflops", peak)?;
        }
        Ok(())
    }

    /// Roofline model for a machine.
    ///
    /// An explicit `peak_gflops` wins over the hardware-derived peak.
    pub fn model(&self, hardware: &HardwareProfile) -> Result<RooflineModel> {
        let peak = match self.peak_gflops {
            Some(peak) => peak,
            None => hardware.peak_gflops(self.flops_per_cycle).ok_or_else(|| {
                AnalysisError::Config(
                    "no peak GFLOP/s: hardware profile unavailable and none configured".to_string(),
                )
            })?,
        };
        RooflineModel::new(peak, self.peak_bandwidth_gbps)
    }
}

impl ChartConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.width < 200 || self.height < 150 {
            return Err(format!(
                "chart size must be at least 200x150, got {}x{}",
                self.width, self.height
            ));
        }
        if self.font_family.trim().is_empty() {
            return Err("font_family must not be empty".to_string());
        }
        Ok(())
    }

    /// Chart style with the default palette.
    pub fn style(&self) -> ChartStyle {
        ChartStyle {
            font_family: self.font_family.clone(),
            ..ChartStyle::default().with_size(self.width, self.height)
        }
    }
}
