use super::{prepare_output, render_error, ChartStyle, DrawResult, ROOFLINE_FILE};
use crate::error::Result;
use crate::metrics::roofline::{ROOF_MAX_INTENSITY, ROOF_MIN_INTENSITY};
use crate::metrics::{RooflineModel, RooflinePoint};
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

const ROOF_SAMPLES: usize = 300;

/// Performance axis: from below the lowest roof or point to above the peak.
pub fn roofline_y_range(model: &RooflineModel, points: &[RooflinePoint]) -> Range<f64> {
    let floor = points
        .iter()
        .map(|p| p.gflops)
        .filter(|g| g.is_finite() && *g > 0.0)
        .fold(model.attainable(ROOF_MIN_INTENSITY), f64::min);
    let ceiling = points
        .iter()
        .map(|p| p.gflops)
        .filter(|g| g.is_finite())
        .fold(model.peak_gflops(), f64::max);
    (floor / 2.0)..(ceiling * 2.0)
}

/// Roofline with the best run of every matrix.
pub fn render_roofline(
    model: &RooflineModel,
    points: &[RooflinePoint],
    out_dir: &Path,
    style: &ChartStyle,
) -> Result<PathBuf> {
    let path = prepare_output(out_dir, ROOFLINE_FILE)?;
    draw_roofline(&path, model, points, style).map_err(|e| render_error(&path, e))?;
    Ok(path)
}

fn draw_roofline(path: &Path, model: &RooflineModel, points: &[RooflinePoint], style: &ChartStyle) -> DrawResult {
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_range = roofline_y_range(model, points);
    let (y_lo, y_hi) = (y_range.start, y_range.end);
    let mut chart = ChartBuilder::on(&root)
        .caption("Roofline Model using Best SpMV Run", style.font(24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(
            (ROOF_MIN_INTENSITY..ROOF_MAX_INTENSITY).log_scale(),
            y_range.log_scale(),
        )?;

    chart
        .configure_mesh()
        .x_desc("Arithmetic Intensity (FLOPs/Byte)")
        .y_desc("Measured Performance (GFLOPS)")
        .draw()?;

    chart.draw_series(LineSeries::new(model.roof_curve(ROOF_SAMPLES), BLUE.stroke_width(2)))?;

    let ridge = model.ridge_point();
    let peak = model.peak_gflops();
    chart.draw_series(LineSeries::new(
        vec![(ridge, y_lo), (ridge, y_hi)],
        BLACK.mix(0.6).stroke_width(1),
    ))?;
    chart.draw_series(LineSeries::new(
        vec![(ROOF_MIN_INTENSITY, peak), (ROOF_MAX_INTENSITY, peak)],
        BLACK.mix(0.3).stroke_width(1),
    ))?;

    let note = style.font(15);
    chart.draw_series([
        Text::new(format!("Ridge: OI={ridge:.2}"), (ridge * 1.2, peak * 0.3), note.color(&BLACK)),
        Text::new(
            format!("Peak {peak:.0} GFLOPS"),
            (ROOF_MAX_INTENSITY / 18.0, peak * 1.3),
            note.color(&RED),
        ),
        Text::new(
            format!("Bandwidth {} GB/s", model.peak_bandwidth_gbps()),
            (ROOF_MIN_INTENSITY * 1.5, model.attainable(ROOF_MIN_INTENSITY * 1.5) * 1.8),
            note.color(&BLACK.mix(0.6)),
        ),
    ])?;

    for (i, point) in points.iter().enumerate() {
        let color = style.color(i);
        let label = format!("{} [{}]", point.label(), model.classify(point.intensity));
        chart
            .draw_series(std::iter::once(Circle::new(
                (point.intensity, point.gflops),
                7,
                color.filled(),
            )))?
            .label(label)
            .legend(move |(x, y)| Circle::new((x + 10, y), 5, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}
