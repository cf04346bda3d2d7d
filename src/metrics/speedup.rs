//! Speedup and strong-scalability derivation.
//!
//! All ratios go through [`speedup`], which refuses non-positive or
//! non-finite operands. A missing sequential baseline removes the matrix
//! from speedup output instead of producing a made-up value.

use crate::error::{AnalysisError, Result};
use crate::schema::{ChunkSize, ResultSet, Scenario};
use ahash::AHashMap;
use std::collections::BTreeMap;

/// `sequential_ms / parallel_ms`, or `None` when either operand is unusable.
#[inline]
pub fn speedup(sequential_ms: f64, parallel_ms: f64) -> Option<f64> {
    let usable = |d: f64| d.is_finite() && d > 0.0;
    if usable(sequential_ms) && usable(parallel_ms) {
        Some(sequential_ms / parallel_ms)
    } else {
        None
    }
}

/// Matrix name → sequential 90th-percentile duration.
///
/// If a matrix appears more than once the later record wins. Records with an
/// unavailable or non-positive duration are ignored.
pub fn sequential_durations(sequential: &ResultSet) -> AHashMap<String, f64> {
    let mut durations = AHashMap::new();
    for record in sequential.iter() {
        match record.positive_duration_ms() {
            Some(d) => {
                if durations.insert(record.matrix_name().to_string(), d).is_some() {
                    log::debug!("{}: duplicate sequential record, keeping the later one", record.matrix_name());
                }
            }
            None => log::warn!(
                "{}: sequential record from {} has no usable duration",
                record.matrix_name(),
                record.source
            ),
        }
    }
    durations
}

/// Speedup of one parallel run.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedupPoint {
    pub matrix: String,
    pub threads: u32,
    pub speedup: f64,

    /// Duration the speedup was computed from
    pub duration_ms: f64,

    /// Winning configuration (`None` for the sequential baseline)
    pub scenario: Option<Scenario>,
}

impl SpeedupPoint {
    /// `"speedUp:3.33, scheduling: dynamic, chunkSize: 64"`
    pub fn annotation(&self) -> String {
        let (sched, chunk) = match &self.scenario {
            Some(s) => (s.scheduling.clone(), s.chunk.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        format!("speedUp:{:.2}, scheduling: {sched}, chunkSize: {chunk}", self.speedup)
    }
}

/// Speedup of every parallel run whose matrix has a sequential baseline.
pub fn record_speedups(sequential: &AHashMap<String, f64>, parallel: &ResultSet) -> Vec<SpeedupPoint> {
    parallel
        .iter()
        .filter_map(|record| {
            let scenario = record.scenario.as_ref()?;
            let seq = *sequential.get(record.matrix_name())?;
            let duration = record.duration_ms()?;
            Some(SpeedupPoint {
                matrix: record.matrix_name().to_string(),
                threads: scenario.threads,
                speedup: speedup(seq, duration)?,
                duration_ms: duration,
                scenario: Some(scenario.clone()),
            })
        })
        .collect()
}

/// Minimum parallel duration per thread count for every matrix.
///
/// Matrices are ordered by first appearance; thread counts ascend.
pub fn best_duration_per_thread(parallel: &ResultSet) -> Vec<(String, BTreeMap<u32, f64>)> {
    let mut order: Vec<(String, BTreeMap<u32, f64>)> = Vec::new();
    let mut index: AHashMap<String, usize> = AHashMap::new();

    for record in parallel.iter() {
        let (Some(threads), Some(duration)) = (record.threads(), record.positive_duration_ms()) else {
            continue;
        };
        let slot = *index.entry(record.matrix_name().to_string()).or_insert_with(|| {
            order.push((record.matrix_name().to_string(), BTreeMap::new()));
            order.len() - 1
        });
        order[slot]
            .1
            .entry(threads)
            .and_modify(|best| {
                if duration < *best {
                    *best = duration;
                }
            })
            .or_insert(duration);
    }

    order
}

/// Strong-scalability curve of one matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingCurve {
    pub matrix: String,

    /// Sequential baseline (the 1-thread point)
    pub sequential_ms: Option<f64>,

    /// Minimum parallel duration per thread count
    pub durations: BTreeMap<u32, f64>,
}

impl ScalingCurve {
    /// Measured points: `(1, T_seq)` followed by every thread count but 1.
    pub fn points(&self) -> Vec<(u32, f64)> {
        let mut points = Vec::with_capacity(self.durations.len() + 1);
        if let Some(seq) = self.sequential_ms {
            points.push((1, seq));
        }
        points.extend(self.durations.iter().filter(|(t, _)| **t != 1).map(|(t, d)| (*t, *d)));
        points
    }

    /// Ideal scaling `T_seq / p` over the same thread counts.
    ///
    /// Empty without a sequential baseline. Informational only.
    pub fn theoretical(&self) -> Vec<(u32, f64)> {
        let Some(seq) = self.sequential_ms else {
            return Vec::new();
        };
        self.points()
            .into_iter()
            .map(|(t, _)| (t, seq / f64::from(t)))
            .collect()
    }
}

/// One scaling curve per parallel matrix.
pub fn strong_scaling_curves(sequential: &ResultSet, parallel: &ResultSet) -> Vec<ScalingCurve> {
    let seq = sequential_durations(sequential);
    best_duration_per_thread(parallel)
        .into_iter()
        .map(|(matrix, durations)| {
            let sequential_ms = seq.get(&matrix).copied();
            if sequential_ms.is_none() {
                log::warn!("{matrix}: no sequential duration, curve starts at the first parallel point");
            }
            ScalingCurve {
                matrix,
                sequential_ms,
                durations,
            }
        })
        .collect()
}

/// Best speedup per thread count of one matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedupCurve {
    pub matrix: String,
    pub sequential_ms: f64,

    /// Maximum speedup per thread count, with the configuration behind it
    pub points: BTreeMap<u32, SpeedupPoint>,
}

impl SpeedupCurve {
    /// Points with the sequential baseline `(1, 1.0)` in front.
    ///
    /// A measured 1-thread entry is replaced by the baseline.
    pub fn with_baseline(&self) -> Vec<SpeedupPoint> {
        let mut points = Vec::with_capacity(self.points.len() + 1);
        points.push(SpeedupPoint {
            matrix: self.matrix.clone(),
            threads: 1,
            speedup: 1.0,
            duration_ms: self.sequential_ms,
            scenario: None,
        });
        points.extend(self.points.values().filter(|p| p.threads != 1).cloned());
        points
    }

    /// First maximum of the plotted curve, baseline included.
    pub fn peak(&self) -> Option<SpeedupPoint> {
        let points = self.with_baseline();
        let speedups: Vec<f64> = points.iter().map(|p| p.speedup).collect();
        crate::selection::first_max_index(&speedups).map(|i| points[i].clone())
    }

    /// Best measured configuration across all thread counts.
    pub fn best_overall(&self) -> Option<&SpeedupPoint> {
        let points: Vec<&SpeedupPoint> = self.points.values().collect();
        let speedups: Vec<f64> = points.iter().map(|p| p.speedup).collect();
        crate::selection::first_max_index(&speedups).map(|i| points[i])
    }
}

/// Maximum speedup per (matrix, thread count).
///
/// Matrices without a sequential baseline are left out.
pub fn best_speedup_per_thread(sequential: &ResultSet, parallel: &ResultSet) -> Vec<SpeedupCurve> {
    let seq = sequential_durations(sequential);
    let mut curves: Vec<SpeedupCurve> = Vec::new();
    let mut index: AHashMap<String, usize> = AHashMap::new();

    for point in record_speedups(&seq, parallel) {
        let slot = *index.entry(point.matrix.clone()).or_insert_with(|| {
            curves.push(SpeedupCurve {
                matrix: point.matrix.clone(),
                sequential_ms: seq[&point.matrix],
                points: BTreeMap::new(),
            });
            curves.len() - 1
        });
        let points = &mut curves[slot].points;
        let improves = points
            .get(&point.threads)
            .map_or(true, |best| point.speedup > best.speedup);
        if improves {
            points.insert(point.threads, point);
        }
    }

    let excluded: Vec<&str> = parallel
        .matrix_names()
        .into_iter()
        .filter(|m| !seq.contains_key(*m))
        .collect();
    if !excluded.is_empty() {
        log::warn!("no sequential baseline, excluded from speedup: {}", excluded.join(", "));
    }

    curves
}

/// Speedup curve of one (scheduling, chunk) variant.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantCurve {
    pub scheduling: String,
    pub chunk: ChunkSize,

    /// `(threads, speedup)` starting at `(1, 1.0)`, threads ascending
    pub points: Vec<(u32, f64)>,
}

impl VariantCurve {
    pub fn label(&self) -> String {
        format!("{}, chunk={}", self.scheduling, self.chunk)
    }
}

/// Per-variant speedup curves of one matrix.
///
/// Variants are sorted by scheduling name, then chunk size.
pub fn sched_chunk_curves(
    sequential: &ResultSet,
    parallel: &ResultSet,
    matrix: &str,
) -> Result<Vec<VariantCurve>> {
    let seq = *sequential_durations(sequential)
        .get(matrix)
        .ok_or_else(|| AnalysisError::missing(matrix, "sequential duration"))?;

    let mut variants: BTreeMap<(String, ChunkSize), Vec<(u32, f64)>> = BTreeMap::new();
    let mut runs = 0usize;
    for record in parallel.records_for(matrix) {
        let Some(scenario) = record.scenario.as_ref() else {
            continue;
        };
        runs += 1;
        let Some(s) = record.duration_ms().and_then(|d| speedup(seq, d)) else {
            log::warn!("{matrix}: {} has no usable duration", scenario.variant_label());
            continue;
        };
        variants
            .entry((scenario.scheduling.clone(), scenario.chunk))
            .or_default()
            .push((scenario.threads, s));
    }

    if runs == 0 {
        return Err(AnalysisError::missing(matrix, "parallel runs"));
    }

    Ok(variants
        .into_iter()
        .map(|((scheduling, chunk), mut measured)| {
            measured.sort_by_key(|(t, _)| *t);
            let mut points = Vec::with_capacity(measured.len() + 1);
            points.push((1, 1.0));
            points.extend(measured);
            VariantCurve {
                scheduling,
                chunk,
                points,
            }
        })
        .collect())
}
