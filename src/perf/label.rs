//! Run labels encoded in profile file names.
//!
//! - `seq_perf_<matrix>.mtx.txt`
//! - `perf_<matrix>.mtx_<best|median|worst>_T<threads>_S<scheduling>_C<chunk>.txt`

use crate::schema::ChunkSize;
use crate::selection::SelectionKind;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

fn sequential_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^seq_perf_(.+?)\.mtx\.txt$").expect("valid regex"))
}

fn parallel_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^perf_(.+?)\.mtx_(best|median|worst)_T(\d+)_S(\w+)_C(\w+)\.txt$").expect("valid regex")
    })
}

/// What a profile file measured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunLabel {
    Sequential {
        matrix: String,
    },
    Parallel {
        matrix: String,
        kind: SelectionKind,
        threads: u32,
        scheduling: String,
        chunk: ChunkSize,
    },
    /// File name does not follow either convention
    Unknown,
}

impl RunLabel {
    /// Decode a file name. Never fails; unrecognized names are `Unknown`.
    pub fn from_file_name(name: &str) -> Self {
        if let Some(caps) = sequential_regex().captures(name) {
            return RunLabel::Sequential {
                matrix: caps[1].to_string(),
            };
        }
        if let Some(caps) = parallel_regex().captures(name) {
            let (Ok(kind), Ok(threads)) = (caps[2].parse::<SelectionKind>(), caps[3].parse::<u32>()) else {
                return RunLabel::Unknown;
            };
            return RunLabel::Parallel {
                matrix: caps[1].to_string(),
                kind,
                threads,
                scheduling: caps[4].to_string(),
                chunk: ChunkSize::parse(&caps[5]),
            };
        }
        RunLabel::Unknown
    }

    pub fn matrix(&self) -> Option<&str> {
        match self {
            RunLabel::Sequential { matrix } | RunLabel::Parallel { matrix, .. } => Some(matrix),
            RunLabel::Unknown => None,
        }
    }

    pub fn is_best(&self) -> bool {
        matches!(
            self,
            RunLabel::Parallel {
                kind: SelectionKind::Best,
                ..
            }
        )
    }
}

impl fmt::Display for RunLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunLabel::Sequential { .. } => write!(f, "sequential"),
            RunLabel::Parallel {
                threads,
                scheduling,
                chunk,
                ..
            } => write!(f, "{scheduling}, chunk={chunk}, th={threads}"),
            RunLabel::Unknown => write!(f, "unknown"),
        }
    }
}
