use super::{prepare_output, render_error, ChartStyle, DrawResult, MISS_RATES_FILE};
use crate::error::Result;
use crate::perf::{MissRates, ProfileComparison};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// One x position of the miss-rate scatter.
#[derive(Debug, Clone, PartialEq)]
pub struct MissRow {
    pub matrix: String,

    /// `sequential` or `<sched>, chunk=<c>, th=<t>`
    pub config: String,

    /// Shared by both rows of a matrix
    pub color_index: usize,
    pub rates: MissRates,
}

impl MissRow {
    pub fn tick_label(&self) -> String {
        format!("{} ({})", self.matrix, self.config)
    }
}

/// Sequential then best row for every matrix, in input order.
pub fn miss_rate_rows(comparisons: &[ProfileComparison]) -> Vec<MissRow> {
    comparisons
        .iter()
        .enumerate()
        .flat_map(|(i, c)| {
            [&c.sequential, &c.best].map(|side| MissRow {
                matrix: c.matrix.clone(),
                config: side.label.to_string(),
                color_index: i,
                rates: side.miss_rates(),
            })
        })
        .collect()
}

/// L1 / LLC / cache miss percentages, sequential vs best configuration.
///
/// Rates that could not be computed are written as "n/a" at the bottom of
/// the chart rather than plotted.
pub fn render_miss_rates(
    comparisons: &[ProfileComparison],
    out_dir: &Path,
    style: &ChartStyle,
) -> Result<PathBuf> {
    let path = prepare_output(out_dir, MISS_RATES_FILE)?;
    let rows = miss_rate_rows(comparisons);
    draw_miss_rates(&path, &rows, style).map_err(|e| render_error(&path, e))?;
    Ok(path)
}

fn draw_miss_rates(path: &Path, rows: &[MissRow], style: &ChartStyle) -> DrawResult {
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let n = rows.len().max(1);
    let labels: Vec<String> = rows.iter().map(MissRow::tick_label).collect();
    let tick = |x: &f64| -> String {
        let i = x.round();
        if (x - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        labels.get(i as usize).cloned().unwrap_or_default()
    };

    let mut chart = ChartBuilder::on(&root)
        .caption("Cache & Memory Miss Percentage (Seq vs Best Config Only)", style.font(24))
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), 0.0..100.0)?;

    chart
        .configure_mesh()
        .x_labels(n)
        .x_label_formatter(&tick)
        .y_desc("Miss Rate (%)")
        .draw()?;

    for (kind, name) in MissRates::NAMES.iter().enumerate() {
        let present: Vec<(f64, f64, usize)> = rows
            .iter()
            .enumerate()
            .filter_map(|(x, row)| row.rates.values()[kind].map(|r| (x as f64, r, row.color_index)))
            .collect();

        let legend_style = BLACK.filled();
        match kind {
            0 => {
                chart
                    .draw_series(
                        present
                            .iter()
                            .map(|(x, r, c)| Circle::new((*x, *r), 6, style.color(*c).filled())),
                    )?
                    .label(*name)
                    .legend(move |(x, y)| Circle::new((x + 10, y), 5, legend_style));
            }
            1 => {
                chart
                    .draw_series(present.iter().map(|(x, r, c)| {
                        EmptyElement::at((*x, *r))
                            + Rectangle::new([(-5, -5), (5, 5)], style.color(*c).filled())
                    }))?
                    .label(*name)
                    .legend(move |(x, y)| Rectangle::new([(x + 5, y - 5), (x + 15, y + 5)], legend_style));
            }
            _ => {
                chart
                    .draw_series(
                        present
                            .iter()
                            .map(|(x, r, c)| TriangleMarker::new((*x, *r), 7, style.color(*c).filled())),
                    )?
                    .label(*name)
                    .legend(move |(x, y)| TriangleMarker::new((x + 10, y), 6, legend_style));
            }
        }
    }

    let missing: Vec<(f64, usize)> = rows
        .iter()
        .enumerate()
        .flat_map(|(x, row)| {
            row.rates
                .values()
                .into_iter()
                .enumerate()
                .filter(|(_, r)| r.is_none())
                .map(move |(kind, _)| (x as f64, kind))
        })
        .collect();
    chart.draw_series(missing.iter().map(|(x, kind)| {
        Text::new(
            format!("n/a {}", ["L1", "LLC", "cache"][*kind]),
            (*x - 0.2, 3.0 + 4.0 * *kind as f64),
            style.font(12).color(&BLACK),
        )
    }))?;

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
    use crate::perf::{LabeledProfile, PerfProfile, RunLabel};

    fn profile(label: &str, text: &str) -> LabeledProfile {
        LabeledProfile {
            label: RunLabel::from_file_name(label),
            profile: PerfProfile::parse(text),
        }
    }

    #[test]
    fn test_rows_pair_sequential_and_best() {
        let comparisons = vec![ProfileComparison {
            matrix: "A".into(),
            sequential: profile("seq_perf_A.mtx.txt", "50 LLC-load-misses\n200 LLC-loads\n"),
            best: profile("perf_A.mtx_best_T8_Sstatic_C16.txt", "1 cache-misses\n0 cache-references\n"),
        }];
        let rows = miss_rate_rows(&comparisons);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].config, "sequential");
        assert_eq!(rows[0].rates.llc, Some(25.0));
        assert_eq!(rows[1].config, "static, chunk=16, th=8");
        assert_eq!(rows[1].rates.cache, None);
        assert_eq!(rows[0].color_index, rows[1].color_index);
        assert_eq!(rows[1].tick_label(), "A (static, chunk=16, th=8)");
    }
}
