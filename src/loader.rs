//! Result file loading.
//!
//! Turns benchmark JSON documents into [`ResultSet`]s.
//!
//! # Tolerance Rules
//!
//! | Problem | Handling |
//! |---------|----------|
//! | Not JSON / no `results` array | `AnalysisError::Parse`, whole file rejected |
//! | Record not an object, no matrix name | record skipped, `log::warn!` |
//! | Scenario without a usable thread count | record skipped, `log::warn!` |
//! | Missing statistic | `Measure::Absent` |
//! | Statistic of the wrong type | `Measure::Invalid` |
//!
//! Both the current writer (`statistics90`, `Arithmetic_intensity`) and the
//! older layouts (`statistics_90`, `GFLOP/s`, top-level `threads` and
//! `duration_milliseconds`) are understood.
//!
//! # Example
//!
//! ```ignore
//! use spmv_analysis::loader::ResultLoader;
//!
//! // One file
//! let parallel = ResultLoader::new().load("results/parallel.json")?;
//!
//! // Every JSON file in a folder, concatenated in path order
//! let all = ResultLoader::new().with_pattern("*.json").load("results/")?;
//! ```

use crate::error::{AnalysisError, Result};
use crate::schema::{
    ChunkSize, HardwareProfile, MatrixInfo, Measure, ResultSet, RunRecord, Scenario, Statistics,
    UNKNOWN_SCHEDULING,
};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Default glob used for directory input.
pub const DEFAULT_PATTERN: &str = "*.json";

const STATISTICS_KEYS: &[&str] = &["statistics90", "statistics_90"];
const DURATION_KEYS: &[&str] = &["duration_ms"];
const FLOPS_KEYS: &[&str] = &["FLOPs", "flops"];
const GFLOPS_KEYS: &[&str] = &["GFLOPS", "GFLOP/s", "gflops"];
const BANDWIDTH_KEYS: &[&str] = &["Bandwidth_GBps", "bandwidth_GBps", "bandwidth_gbps"];
const INTENSITY_KEYS: &[&str] = &["Arithmetic_intensity", "arithmetic_intensity"];
const LEGACY_DURATION_KEY: &str = "duration_milliseconds";

/// Loads result files or folders of result files.
#[derive(Debug, Clone)]
pub struct ResultLoader {
    pattern: String,
}

impl Default for ResultLoader {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
        }
    }
}

impl ResultLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the glob used when a directory is given.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Glob used for directory input.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Load a file, or every matching file of a directory merged into one set.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<ResultSet> {
        let path = path.as_ref();
        if path.is_dir() {
            let sets = self.load_dir(path)?;
            Ok(ResultSet::merge(path.display().to_string(), sets))
        } else {
            load_file(path)
        }
    }

    /// Load every matching file of a directory as separate sets, in path order.
    pub fn load_dir<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<ResultSet>> {
        let dir = dir.as_ref();
        let files = matching_files(dir, &self.pattern)?;
        if files.is_empty() {
            return Err(AnalysisError::parse(
                dir.display().to_string(),
                format!("no files matching `{}`", self.pattern),
            ));
        }
        files.iter().map(load_file).collect()
    }
}

/// Files under `dir` matching `pattern`, sorted.
///
/// Only `pattern` is a glob; `dir` is matched literally even when it holds
/// `[`, `*` or `?`.
pub fn matching_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = Path::new(&glob::Pattern::escape(&dir.to_string_lossy())).join(pattern);
    let full = full.to_string_lossy();
    let entries = glob::glob(&full).map_err(|e| AnalysisError::Pattern {
        pattern: full.to_string(),
        reason: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| AnalysisError::io(e.path().to_path_buf(), e.into_error()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load one result file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<ResultSet> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
    let origin = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let set = parse_document(&origin, &text)?;
    log::info!(
        "Loaded {} records from {} ({} skipped)",
        set.len(),
        path.display(),
        set.skipped
    );
    Ok(set)
}

/// Parse a result document; `origin` becomes each record's provenance.
pub fn parse_document(origin: &str, text: &str) -> Result<ResultSet> {
    let root: Value =
        serde_json::from_str(text).map_err(|e| AnalysisError::parse(origin, e.to_string()))?;
    let root = root
        .as_object()
        .ok_or_else(|| AnalysisError::parse(origin, "top-level value is not an object"))?;
    let results = root
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| AnalysisError::parse(origin, "missing `results` array"))?;

    let mut set = ResultSet::new(origin, parse_hardware(origin, root.get("hardware")));
    set.errors = string_list(root.get("errors"));

    for (index, entry) in results.iter().enumerate() {
        match parse_record(entry, origin) {
            Ok(record) => set.records.push(record),
            Err(reason) => {
                log::warn!("{origin}: skipping result #{index}: {reason}");
                set.skipped += 1;
            }
        }
    }

    Ok(set)
}

fn parse_hardware(origin: &str, value: Option<&Value>) -> HardwareProfile {
    match value {
        Some(Value::Object(hw)) => HardwareProfile {
            total_cores: Measure::from_json_u64(hw.get("total_cores")),
            cpu_mhz: Measure::from_json_f64(hw.get("cpu_mhz")),
        },
        None | Some(Value::Null) => HardwareProfile::unavailable(),
        Some(_) => {
            log::warn!("{origin}: `hardware` is not an object, ignoring it");
            HardwareProfile::unavailable()
        }
    }
}

/// First non-null value among aliases.
fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k).filter(|v| !v.is_null()))
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_record(entry: &Value, source: &str) -> std::result::Result<RunRecord, String> {
    let obj = entry.as_object().ok_or("result is not an object")?;

    let matrix = parse_matrix(obj.get("matrix"))?;
    let scenario = parse_scenario(obj)?;
    let statistics = parse_statistics(obj);

    let iteration_times_ms = obj
        .get("all_iteration_times_ms")
        .and_then(Value::as_array)
        .map(|times| {
            times
                .iter()
                .filter_map(Value::as_f64)
                .filter(|t| t.is_finite())
                .collect()
        })
        .unwrap_or_default();

    Ok(RunRecord {
        matrix,
        scenario,
        statistics,
        warmup_ms: Measure::from_json_f64(obj.get("warmUp_time_ms")),
        iteration_times_ms,
        errors: string_list(obj.get("errors")),
        source: source.to_string(),
    })
}

fn parse_matrix(value: Option<&Value>) -> std::result::Result<MatrixInfo, String> {
    let obj = value
        .and_then(Value::as_object)
        .ok_or("missing `matrix` object")?;
    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or("matrix has no name")?;

    Ok(MatrixInfo {
        name: name.to_string(),
        rows: Measure::from_json_u64(obj.get("rows")),
        cols: Measure::from_json_u64(obj.get("cols")),
        nnz: Measure::from_json_u64(obj.get("nnz")),
    })
}

fn parse_scenario(record: &Map<String, Value>) -> std::result::Result<Option<Scenario>, String> {
    let scenario = match record.get("scenario") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(s)) => s,
        Some(_) => return Err("`scenario` is not an object".to_string()),
    };

    // Older drivers wrote the thread count next to the scenario.
    let threads = Measure::from_json_u64(scenario.get("threads"))
        .or(Measure::from_json_u64(record.get("threads")));
    let threads = match threads {
        Measure::Present(t) if t > 0 => {
            u32::try_from(t).map_err(|_| format!("thread count {t} out of range"))?
        }
        Measure::Present(_) => return Err("scenario has zero threads".to_string()),
        Measure::Absent => return Err("scenario has no thread count".to_string()),
        Measure::Invalid => return Err("scenario thread count is not an integer".to_string()),
    };

    let scheduling = scenario
        .get("scheduling_type")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_SCHEDULING)
        .to_string();

    let chunk = match scenario.get("chunk_size") {
        Some(Value::Number(n)) => n.as_u64().map_or(ChunkSize::Unknown, ChunkSize::Value),
        Some(Value::String(s)) => ChunkSize::parse(s),
        _ => ChunkSize::Unknown,
    };

    Ok(Some(Scenario {
        threads,
        scheduling,
        chunk,
    }))
}

fn parse_statistics(record: &Map<String, Value>) -> Option<Statistics> {
    match lookup(record, STATISTICS_KEYS) {
        Some(Value::Object(stats)) => Some(Statistics {
            duration_ms: Measure::from_json_f64(lookup(stats, DURATION_KEYS)),
            flops: Measure::from_json_f64(lookup(stats, FLOPS_KEYS)),
            gflops: Measure::from_json_f64(lookup(stats, GFLOPS_KEYS)),
            bandwidth_gbps: Measure::from_json_f64(lookup(stats, BANDWIDTH_KEYS)),
            arithmetic_intensity: Measure::from_json_f64(lookup(stats, INTENSITY_KEYS)),
        }),
        Some(Value::Null) | None => record.get(LEGACY_DURATION_KEY).map(|d| Statistics {
            duration_ms: Measure::from_json_f64(Some(d)),
            ..Statistics::default()
        }),
        Some(_) => Some(Statistics {
            duration_ms: Measure::Invalid,
            flops: Measure::Invalid,
            gflops: Measure::Invalid,
            bandwidth_gbps: Measure::Invalid,
            arithmetic_intensity: Measure::Invalid,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "hardware": {"total_cores": 8, "cpu_mhz": 2500.0},
        "results": [
            {
                "matrix": {"name": "bcsstk14.mtx", "rows": 1806, "cols": 1806, "nnz": 63454},
                "scenario": {"threads": 4, "scheduling_type": "dynamic", "chunk_size": 64},
                "statistics90": {
                    "duration_ms": 0.25, "FLOPs": 126908, "GFLOPS": 0.507,
                    "Bandwidth_GBps": 3.1, "Arithmetic_intensity": 0.16
                },
                "warmUp_time_ms": 0.9,
                "all_iteration_times_ms": [0.2, 0.25, 0.22],
                "errors": []
            },
            {
                "matrix": {"name": "bcsstk14.mtx", "rows": 1806, "cols": 1806, "nnz": 63454},
                "statistics90": {"duration_ms": 0.8}
            }
        ],
        "errors": []
    }"#;

    #[test]
    fn test_parse_document() {
        let set = parse_document("parallel.json", DOC).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.skipped, 0);
        assert_eq!(set.hardware.total_cores, Measure::Present(8));

        let first = &set.records[0];
        assert_eq!(first.matrix_name(), "bcsstk14.mtx");
        assert_eq!(first.threads(), Some(4));
        assert_eq!(first.gflops(), Some(0.507));
        assert_eq!(first.arithmetic_intensity(), Some(0.16));
        assert_eq!(first.iteration_times_ms.len(), 3);
        assert_eq!(first.source, "parallel.json");

        let second = &set.records[1];
        assert!(second.scenario.is_none());
        assert_eq!(second.duration_ms(), Some(0.8));
        assert_eq!(second.gflops(), None);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = parse_document("broken.json", "{ not json").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse { .. }));
    }

    #[test]
    fn test_missing_results_is_parse_error() {
        let err = parse_document("empty.json", r#"{"hardware": {}}"#).unwrap_err();
        assert!(err.to_string().contains("results"));
    }

    #[test]
    fn test_legacy_layout() {
        let doc = r#"{"results": [{
            "threads": 8,
            "matrix": {"name": "A"},
            "scenario": {"scheduling_type": "guided", "chunk_size": "default"},
            "duration_milliseconds": 12.5
        }]}"#;
        let set = parse_document("legacy.json", doc).unwrap();
        let record = &set.records[0];
        let scenario = record.scenario.as_ref().unwrap();
        assert_eq!(scenario.threads, 8);
        assert_eq!(scenario.chunk, ChunkSize::Default);
        assert_eq!(record.duration_ms(), Some(12.5));
        assert!(!set.hardware.is_available());
    }

    #[test]
    fn test_alias_keys() {
        let doc = r#"{"results": [{
            "matrix": {"name": "A"},
            "scenario": {"threads": 2},
            "statistics_90": {"duration_ms": 1.0, "GFLOP/s": 3.0, "arithmetic_intensity": 0.2}
        }]}"#;
        let set = parse_document("old.json", doc).unwrap();
        let record = &set.records[0];
        assert_eq!(record.gflops(), Some(3.0));
        assert_eq!(record.arithmetic_intensity(), Some(0.2));
        let scenario = record.scenario.as_ref().unwrap();
        assert_eq!(scenario.scheduling, UNKNOWN_SCHEDULING);
        assert_eq!(scenario.chunk, ChunkSize::Unknown);
    }

    #[test]
    fn test_null_alias_falls_through() {
        let doc = r#"{"results": [{
            "matrix": {"name": "A"},
            "scenario": {"threads": 2},
            "statistics90": null,
            "statistics_90": {"duration_ms": 1.0, "GFLOPS": null, "GFLOP/s": 3.0, "gflops": 9.0}
        }]}"#;
        let set = parse_document("mixed.json", doc).unwrap();
        let record = &set.records[0];
        assert_eq!(record.duration_ms(), Some(1.0));
        assert_eq!(record.gflops(), Some(3.0));
        assert_eq!(record.bandwidth_gbps(), None);
    }
}
