//! Benchmark record types.
//!
//! - `HardwareProfile`: machine descriptor used for the theoretical peak
//! - `RunRecord`: one executed configuration with its 90th-percentile stats
//! - `ResultSet`: records loaded from one (or several merged) result files

use super::measure::Measure;
use std::fmt;

/// Machine descriptor written by the benchmark driver.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HardwareProfile {
    /// Total core count
    pub total_cores: Measure<u64>,

    /// Core clock in MHz
    pub cpu_mhz: Measure<f64>,
}

impl HardwareProfile {
    /// Profile for documents that carry no hardware object.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// True when both fields are usable.
    pub fn is_available(&self) -> bool {
        self.total_cores.is_present() && self.cpu_mhz.is_present()
    }

    /// Theoretical peak in GFLOP/s: `cores × GHz × flops_per_cycle`.
    ///
    /// Returns `None` when either field is unavailable or the product is not
    /// strictly positive.
    pub fn peak_gflops(&self, flops_per_cycle: f64) -> Option<f64> {
        let cores = self.total_cores.value()? as f64;
        let mhz = self.cpu_mhz.value()?;
        let peak = cores * mhz / 1000.0 * flops_per_cycle;
        (peak.is_finite() && peak > 0.0).then_some(peak)
    }
}

/// Sparse matrix identity.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixInfo {
    /// Matrix file name (e.g. `bcsstk14.mtx`)
    pub name: String,
    pub rows: Measure<u64>,
    pub cols: Measure<u64>,
    pub nnz: Measure<u64>,
}

impl MatrixInfo {
    /// Matrix with only a name known.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Measure::Absent,
            cols: Measure::Absent,
            nnz: Measure::Absent,
        }
    }
}

/// Chunk size of the parallel work-distribution policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChunkSize {
    /// Explicit chunk size
    Value(u64),
    /// Runtime default (older writers emit `"default"`)
    Default,
    /// Not recorded
    Unknown,
}

impl ChunkSize {
    /// Parse the textual forms found in result files and profile names.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.eq_ignore_ascii_case("default") {
            return ChunkSize::Default;
        }
        match text.parse::<u64>() {
            Ok(v) => ChunkSize::Value(v),
            Err(_) => ChunkSize::Unknown,
        }
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkSize::Value(v) => write!(f, "{v}"),
            ChunkSize::Default => write!(f, "default"),
            ChunkSize::Unknown => write!(f, "unknown"),
        }
    }
}

/// Scheduling name recorded when a result does not report one.
pub const UNKNOWN_SCHEDULING: &str = "unknown";

/// Parallel execution scenario.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scenario {
    /// Thread count
    pub threads: u32,

    /// Scheduling policy name (`static`, `dynamic`, `guided`, ...)
    pub scheduling: String,

    /// Chunk size
    pub chunk: ChunkSize,
}

impl Scenario {
    pub fn new(threads: u32, scheduling: impl Into<String>, chunk: ChunkSize) -> Self {
        Self {
            threads,
            scheduling: scheduling.into(),
            chunk,
        }
    }

    /// `"<scheduling>, chunk=<chunk>"`, the legend label for a variant.
    pub fn variant_label(&self) -> String {
        format!("{}, chunk={}", self.scheduling, self.chunk)
    }
}

/// 90th-percentile statistics of one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Statistics {
    pub duration_ms: Measure<f64>,
    pub flops: Measure<f64>,
    pub gflops: Measure<f64>,
    pub bandwidth_gbps: Measure<f64>,
    pub arithmetic_intensity: Measure<f64>,
}

/// Whether a record comes from a sequential or a parallel sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Sequential,
    Parallel,
}

/// One executed benchmark configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    /// Matrix identity
    pub matrix: MatrixInfo,

    /// Parallel scenario (`None` for sequential runs)
    pub scenario: Option<Scenario>,

    /// 90th-percentile statistics (`None` when the record has none at all)
    pub statistics: Option<Statistics>,

    /// Warm-up time in milliseconds
    pub warmup_ms: Measure<f64>,

    /// Raw per-iteration durations, when the writer emitted them
    pub iteration_times_ms: Vec<f64>,

    /// Errors the benchmark reported for this run
    pub errors: Vec<String>,

    /// File name the record was loaded from
    pub source: String,
}

impl RunRecord {
    /// Matrix name.
    #[inline]
    pub fn matrix_name(&self) -> &str {
        &self.matrix.name
    }

    /// Thread count of the scenario.
    pub fn threads(&self) -> Option<u32> {
        self.scenario.as_ref().map(|s| s.threads)
    }

    fn stat(&self, field: impl Fn(&Statistics) -> Measure<f64>) -> Option<f64> {
        self.statistics.as_ref().and_then(|s| field(s).value())
    }

    /// 90th-percentile duration as recorded.
    pub fn duration_ms(&self) -> Option<f64> {
        self.stat(|s| s.duration_ms)
    }

    /// Duration usable as a ratio operand (present and strictly positive).
    pub fn positive_duration_ms(&self) -> Option<f64> {
        self.duration_ms().filter(|d| *d > 0.0)
    }

    pub fn gflops(&self) -> Option<f64> {
        self.stat(|s| s.gflops)
    }

    pub fn bandwidth_gbps(&self) -> Option<f64> {
        self.stat(|s| s.bandwidth_gbps)
    }

    pub fn arithmetic_intensity(&self) -> Option<f64> {
        self.stat(|s| s.arithmetic_intensity)
    }

    /// True when the record carries a statistics object.
    pub fn has_statistics(&self) -> bool {
        self.statistics.is_some()
    }

    /// Sequential or parallel. Only parallel runs carry a scenario.
    pub fn kind(&self) -> SourceKind {
        if self.scenario.is_some() {
            SourceKind::Parallel
        } else {
            SourceKind::Sequential
        }
    }
}

/// Records sharing one hardware profile.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// File name (or merged label) the set was loaded from
    pub source: String,

    /// Hardware descriptor
    pub hardware: HardwareProfile,

    /// Records in input order
    pub records: Vec<RunRecord>,

    /// Malformed records dropped while loading
    pub skipped: usize,

    /// Document-level errors reported by the benchmark driver
    pub errors: Vec<String>,
}

impl ResultSet {
    pub fn new(source: impl Into<String>, hardware: HardwareProfile) -> Self {
        Self {
            source: source.into(),
            hardware,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RunRecord> {
        self.records.iter()
    }

    /// Concatenate several sets in order.
    ///
    /// The first available hardware profile is kept; record provenance is
    /// untouched so the parts remain distinguishable.
    pub fn merge(label: impl Into<String>, sets: Vec<ResultSet>) -> ResultSet {
        let mut merged = ResultSet::new(label, HardwareProfile::unavailable());
        for set in sets {
            if !merged.hardware.is_available() && set.hardware.is_available() {
                merged.hardware = set.hardware;
            }
            merged.skipped += set.skipped;
            merged.errors.extend(set.errors);
            merged.records.extend(set.records);
        }
        merged
    }

    /// Split into (sequential, parallel) parts using `RunRecord::kind`.
    pub fn split_by_kind(&self) -> (ResultSet, ResultSet) {
        let mut sequential = ResultSet::new(format!("{} (sequential)", self.source), self.hardware);
        let mut parallel = ResultSet::new(format!("{} (parallel)", self.source), self.hardware);
        for record in &self.records {
            match record.kind() {
                SourceKind::Sequential => sequential.records.push(record.clone()),
                SourceKind::Parallel => parallel.records.push(record.clone()),
            }
        }
        (sequential, parallel)
    }

    /// Records for one matrix, in input order.
    pub fn records_for<'a>(&'a self, matrix: &'a str) -> impl Iterator<Item = &'a RunRecord> + 'a {
        self.records.iter().filter(move |r| r.matrix.name == matrix)
    }

    /// Distinct matrix names in order of first appearance.
    pub fn matrix_names(&self) -> Vec<&str> {
        let mut seen = ahash::AHashSet::new();
        self.records
            .iter()
            .map(|r| r.matrix.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }
}
