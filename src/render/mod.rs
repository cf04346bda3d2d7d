//! PNG charts.
//!
//! Every render call takes a [`ChartStyle`] by reference, so styling never
//! leaks from one chart into the next. Axis ranges and series are computed
//! by small pure helpers kept separate from the drawing code.

mod misses;
mod roofline;
mod scaling;

pub use misses::{miss_rate_rows, render_miss_rates, MissRow};
pub use roofline::{render_roofline, roofline_y_range};
pub use scaling::{
    render_sched_chunk, render_speedup, render_strong_scalability, speedup_axes, variant_styles,
};

use crate::error::{AnalysisError, Result};
use plotters::style::{FontDesc, IntoFont, RGBColor};
use std::ops::Range;
use std::path::{Path, PathBuf};

pub const STRONG_SCALABILITY_FILE: &str = "spmv_strong_scalability.png";
pub const SPEEDUP_FILE: &str = "spmv_speedup.png";
pub const ROOFLINE_FILE: &str = "roofline_spmv_bestpoints_config.png";
pub const MISS_RATES_FILE: &str = "seq_best_percentmiss_scatter.png";

/// `speedup_sched_chunk_<safe matrix>.png`
pub fn sched_chunk_file(matrix: &str) -> String {
    format!("speedup_sched_chunk_{}.png", safe_matrix_name(matrix))
}

/// Matrix name usable in a file name: `.mtx` dropped, `/` and spaces to `_`.
pub fn safe_matrix_name(matrix: &str) -> String {
    matrix.replace(".mtx", "").replace(['/', ' '], "_")
}

/// Colorblind-friendly series colors.
pub const DEFAULT_PALETTE: [RGBColor; 8] = [
    RGBColor(0x00, 0x72, 0xB2),
    RGBColor(0xD5, 0x5E, 0x00),
    RGBColor(0x00, 0x9E, 0x73),
    RGBColor(0xCC, 0x79, 0xA7),
    RGBColor(0xE6, 0x9F, 0x00),
    RGBColor(0xA0, 0x20, 0xF0),
    RGBColor(0xF0, 0xE4, 0x42),
    RGBColor(0x56, 0xB4, 0xE9),
];

/// Look of one chart.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    pub palette: Vec<RGBColor>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            font_family: "sans-serif".to_string(),
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl ChartStyle {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Series color `i`, cycling through the palette.
    pub fn color(&self, i: usize) -> RGBColor {
        if self.palette.is_empty() {
            return RGBColor(0, 0, 0);
        }
        self.palette[i % self.palette.len()]
    }

    fn font(&self, size: u32) -> FontDesc<'_> {
        (self.font_family.as_str(), f64::from(size)).into_font()
    }
}

/// Log-axis range covering every positive finite value with some headroom.
///
/// Falls back to `0.1..10` when there is nothing to show.
pub fn log_axis(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo.is_finite() && hi.is_finite() {
        (lo / 1.5)..(hi * 1.5)
    } else {
        0.1..10.0
    }
}

/// Linear axis from zero to the largest finite value plus 15%.
pub fn linear_axis(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let hi = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let hi = if hi > 0.0 { hi * 1.15 } else { 1.0 };
    0.0..hi
}

fn prepare_output(dir: &Path, file: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| AnalysisError::io(dir, e))?;
    Ok(dir.join(file))
}

fn render_error(path: &Path, err: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::Render {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;
