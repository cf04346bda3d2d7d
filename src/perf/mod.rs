//! Cache-miss analysis of `perf stat` profiles.
//!
//! A profile folder holds two subfolders:
//!
//! ```text
//! <perf_folder>/
//! ├── sequential/  seq_perf_<matrix>.mtx.txt
//! └── parallel/    perf_<matrix>.mtx_<kind>_T<threads>_S<sched>_C<chunk>.txt
//! ```
//!
//! Only matrices with both a sequential profile and a `best` parallel profile
//! are compared; everything else is left out without an error.

mod counters;
mod label;

pub use counters::{miss_rate, Counter, MissRates, PerfProfile};
pub use label::RunLabel;

use crate::error::{AnalysisError, Result};
use crate::loader::matching_files;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Subfolder holding the parallel profiles.
pub const PARALLEL_DIR: &str = "parallel";

/// Subfolder holding the sequential profiles.
pub const SEQUENTIAL_DIR: &str = "sequential";

const PROFILE_PATTERN: &str = "*.txt";

/// Sequential and best-parallel profile files of one matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePair {
    pub matrix: String,
    pub sequential: PathBuf,
    pub best: PathBuf,
}

/// Parsed profile with the label decoded from its file name.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledProfile {
    pub label: RunLabel,
    pub profile: PerfProfile,
}

impl LabeledProfile {
    pub fn miss_rates(&self) -> MissRates {
        self.profile.miss_rates()
    }
}

/// Both sides of one matrix, ready for plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileComparison {
    pub matrix: String,
    pub sequential: LabeledProfile,
    pub best: LabeledProfile,
}

/// Read and parse one profile file.
pub fn load_profile(path: &Path) -> Result<LabeledProfile> {
    let text = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
    Ok(LabeledProfile {
        label: RunLabel::from_file_name(&file_name(path)),
        profile: PerfProfile::parse(&text),
    })
}

fn subfolder(root: &Path, name: &str) -> Result<PathBuf> {
    let dir = root.join(name);
    if dir.is_dir() {
        Ok(dir)
    } else {
        Err(AnalysisError::io(
            &dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "profile subfolder not found"),
        ))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Pair sequential and best-parallel profiles, sorted by matrix name.
pub fn gather_profiles(root: &Path) -> Result<Vec<ProfilePair>> {
    let parallel_dir = subfolder(root, PARALLEL_DIR)?;
    let sequential_dir = subfolder(root, SEQUENTIAL_DIR)?;

    let mut best: BTreeMap<String, PathBuf> = BTreeMap::new();
    for path in matching_files(&parallel_dir, PROFILE_PATTERN)? {
        let label = RunLabel::from_file_name(&file_name(&path));
        if let (true, Some(matrix)) = (label.is_best(), label.matrix()) {
            best.insert(matrix.to_string(), path);
        }
    }

    let mut sequential: BTreeMap<String, PathBuf> = BTreeMap::new();
    for path in matching_files(&sequential_dir, PROFILE_PATTERN)? {
        if let RunLabel::Sequential { matrix } = RunLabel::from_file_name(&file_name(&path)) {
            sequential.insert(matrix, path);
        }
    }

    let pairs: Vec<ProfilePair> = best
        .into_iter()
        .filter_map(|(matrix, best)| {
            let Some(seq) = sequential.remove(&matrix) else {
                log::debug!("{matrix}: best profile without sequential counterpart");
                return None;
            };
            Some(ProfilePair {
                matrix,
                sequential: seq,
                best,
            })
        })
        .collect();

    for matrix in sequential.keys() {
        log::debug!("{matrix}: sequential profile without best counterpart");
    }
    log::info!("{} matrices with paired profiles under {}", pairs.len(), root.display());
    Ok(pairs)
}

/// Load every paired profile under `root`.
pub fn compare_profiles(root: &Path) -> Result<Vec<ProfileComparison>> {
    gather_profiles(root)?
        .into_iter()
        .map(|pair| {
            Ok(ProfileComparison {
                sequential: load_profile(&pair.sequential)?,
                best: load_profile(&pair.best)?,
                matrix: pair.matrix,
            })
        })
        .collect()
}
