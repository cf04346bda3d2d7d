//! Duration and speedup charts.

use super::{linear_axis, log_axis, prepare_output, render_error, ChartStyle, DrawResult};
use super::{sched_chunk_file, SPEEDUP_FILE, STRONG_SCALABILITY_FILE};
use crate::error::Result;
use crate::metrics::{ScalingCurve, SpeedupCurve, VariantCurve};
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Log-log duration vs threads, one line per matrix plus `T_seq / p`.
pub fn render_strong_scalability(
    curves: &[ScalingCurve],
    out_dir: &Path,
    style: &ChartStyle,
) -> Result<PathBuf> {
    let path = prepare_output(out_dir, STRONG_SCALABILITY_FILE)?;
    draw_strong_scalability(&path, curves, style).map_err(|e| render_error(&path, e))?;
    Ok(path)
}

fn draw_strong_scalability(path: &Path, curves: &[ScalingCurve], style: &ChartStyle) -> DrawResult {
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_range = log_axis(curves.iter().flat_map(|c| c.points()).map(|(t, _)| f64::from(t)));
    let y_range = log_axis(
        curves
            .iter()
            .flat_map(|c| c.points().into_iter().chain(c.theoretical()))
            .map(|(_, d)| d),
    );

    let mut chart = ChartBuilder::on(&root)
        .caption("Strong Scalability of SpMV: Duration vs Threads (log-log)", style.font(24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range.log_scale(), y_range.log_scale())?;

    chart
        .configure_mesh()
        .x_desc("Number of Threads (1 = Sequential)")
        .y_desc("Duration Time (ms)")
        .draw()?;

    let theory_style = BLACK.mix(0.35).stroke_width(2);
    let mut theory_labelled = false;

    for (i, curve) in curves.iter().enumerate() {
        let color = style.color(i);
        let points: Vec<(f64, f64)> = curve.points().into_iter().map(|(t, d)| (f64::from(t), d)).collect();

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
            .label(curve.matrix.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart.draw_series(points.iter().map(|p| Circle::new(*p, 4, color.filled())))?;

        let theory: Vec<(f64, f64)> = curve
            .theoretical()
            .into_iter()
            .map(|(t, d)| (f64::from(t), d))
            .collect();
        if theory.is_empty() {
            continue;
        }
        let series = chart.draw_series(LineSeries::new(theory, theory_style))?;
        if !theory_labelled {
            series
                .label("theoretical scalability (T_seq/p)")
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], theory_style));
            theory_labelled = true;
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Axis ranges of the speedup chart: threads from 0, speedup from 0.
pub fn speedup_axes(curves: &[SpeedupCurve]) -> (Range<f64>, Range<f64>) {
    let points: Vec<(f64, f64)> = curves
        .iter()
        .flat_map(|c| c.with_baseline())
        .map(|p| (f64::from(p.threads), p.speedup))
        .collect();
    let x = linear_axis(points.iter().map(|(t, _)| *t));
    // headroom for the peak annotation
    let y = linear_axis(points.iter().map(|(_, s)| *s + 0.5));
    (x, y)
}

/// Best speedup per thread count, peak marked and annotated.
pub fn render_speedup(curves: &[SpeedupCurve], out_dir: &Path, style: &ChartStyle) -> Result<PathBuf> {
    let path = prepare_output(out_dir, SPEEDUP_FILE)?;
    draw_speedup(&path, curves, style).map_err(|e| render_error(&path, e))?;
    Ok(path)
}

fn draw_speedup(path: &Path, curves: &[SpeedupCurve], style: &ChartStyle) -> DrawResult {
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_range, y_range) = speedup_axes(curves);
    let mut chart = ChartBuilder::on(&root)
        .caption("Speedup vs Threads per Matrix (best configuration)", style.font(24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Number of Threads (1 = Sequential)")
        .y_desc("Speedup (Sequential Time / Parallel Time)")
        .draw()?;

    for (i, curve) in curves.iter().enumerate() {
        let color = style.color(i);
        let points: Vec<(f64, f64)> = curve
            .with_baseline()
            .iter()
            .map(|p| (f64::from(p.threads), p.speedup))
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
            .label(curve.matrix.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart.draw_series(points.iter().map(|p| Circle::new(*p, 4, color.filled())))?;

        if let Some(peak) = curve.peak() {
            let at = (f64::from(peak.threads), peak.speedup);
            chart.draw_series(std::iter::once(TriangleMarker::new(at, 9, color.filled())))?;
            chart.draw_series(std::iter::once(Text::new(
                peak.annotation(),
                (at.0, at.1 + 0.4),
                style.font(14).color(&color),
            )))?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// `(color index, marker index)` per variant.
///
/// Colors follow the scheduling policy and markers the chunk size, both in
/// order of first appearance among the (already sorted) variants.
pub fn variant_styles(curves: &[VariantCurve]) -> Vec<(usize, usize)> {
    let mut schedulings: Vec<&str> = Vec::new();
    let mut chunks = Vec::new();
    curves
        .iter()
        .map(|curve| {
            let color = match schedulings.iter().position(|s| *s == curve.scheduling) {
                Some(i) => i,
                None => {
                    schedulings.push(&curve.scheduling);
                    schedulings.len() - 1
                }
            };
            let marker = match chunks.iter().position(|c| *c == curve.chunk) {
                Some(i) => i,
                None => {
                    chunks.push(curve.chunk);
                    chunks.len() - 1
                }
            };
            (color, marker)
        })
        .collect()
}

/// Speedup of one matrix per (scheduling, chunk) variant.
pub fn render_sched_chunk(
    matrix: &str,
    curves: &[VariantCurve],
    out_dir: &Path,
    style: &ChartStyle,
) -> Result<PathBuf> {
    let path = prepare_output(out_dir, &sched_chunk_file(matrix))?;
    draw_sched_chunk(&path, matrix, curves, style).map_err(|e| render_error(&path, e))?;
    Ok(path)
}

fn draw_sched_chunk(path: &Path, matrix: &str, curves: &[VariantCurve], style: &ChartStyle) -> DrawResult {
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let points = curves.iter().flat_map(|c| c.points.iter());
    let x_range = linear_axis(points.clone().map(|(t, _)| f64::from(*t)));
    let y_range = linear_axis(points.map(|(_, s)| *s));

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Speedup for matrix '{matrix}' by Scheduling & Chunk Size"),
            style.font(24),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Number of Threads (1 = sequential)")
        .y_desc("Speedup (Sequential / Parallel Time)")
        .draw()?;

    for (curve, (color_idx, marker_idx)) in curves.iter().zip(variant_styles(curves)) {
        let color = style.color(color_idx);
        let points: Vec<(f64, f64)> = curve.points.iter().map(|(t, s)| (f64::from(*t), *s)).collect();

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
            .label(curve.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        match marker_idx % 3 {
            0 => chart.draw_series(points.iter().map(|p| Circle::new(*p, 5, color.filled())))?,
            1 => chart.draw_series(points.iter().map(|p| TriangleMarker::new(*p, 6, color.filled())))?,
            _ => chart.draw_series(points.iter().map(|p| Cross::new(*p, 5, color.stroke_width(2))))?,
        };
    }

    chart.draw_series(std::iter::once(Circle::new((1.0, 1.0), 7, BLACK.filled())))?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ChunkSize;

    fn variant(scheduling: &str, chunk: ChunkSize) -> VariantCurve {
        VariantCurve {
            scheduling: scheduling.to_string(),
            chunk,
            points: vec![(1, 1.0), (4, 3.0)],
        }
    }

    #[test]
    fn test_variant_styles() {
        let curves = vec![
            variant("dynamic", ChunkSize::Value(1)),
            variant("dynamic", ChunkSize::Value(64)),
            variant("static", ChunkSize::Value(1)),
        ];
        assert_eq!(variant_styles(&curves), vec![(0, 0), (0, 1), (1, 0)]);
    }
}
