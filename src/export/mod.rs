//! Selected-configuration summary export.
//!
//! The summary is a plain text file with one line per (matrix, kind):
//!
//! ```text
//! bcsstk14.mtx best 16 dynamic 64
//! bcsstk14.mtx worst 2 static 1
//! bcsstk14.mtx median 8 guided 8
//! ```
//!
//! The profiling scripts read it back line by line, so the format carries no
//! header and no comments.

use crate::error::{AnalysisError, Result};
use crate::selection::SelectedConfig;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Configurations that survive a write/read cycle; the rest are logged.
fn writable(configs: &[SelectedConfig]) -> impl Iterator<Item = &SelectedConfig> {
    configs.iter().filter(|config| {
        let ok = config.is_writable();
        if !ok {
            log::warn!(
                "skipping `{}`: matrix and scheduling names must not contain whitespace",
                config.to_line()
            );
        }
        ok
    })
}

/// Render summary lines, newline-terminated.
pub fn format_selected_configs(configs: &[SelectedConfig]) -> String {
    let mut out = String::with_capacity(configs.len() * 40);
    for config in writable(configs) {
        out.push_str(&config.to_line());
        out.push('\n');
    }
    out
}

/// Parse a summary, skipping blank lines.
pub fn parse_selected_configs(text: &str) -> Result<Vec<SelectedConfig>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            SelectedConfig::parse_line(line).map_err(|e| match e {
                AnalysisError::Parse { reason, .. } => {
                    AnalysisError::parse("selected configs", format!("line {}: {reason}", i + 1))
                }
                other => other,
            })
        })
        .collect()
}

/// Writes selected-configuration summaries to a file.
#[derive(Debug, Clone)]
pub struct SummaryExporter {
    output_path: PathBuf,
}

impl SummaryExporter {
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        Self {
            output_path: output_path.as_ref().to_path_buf(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Write the summary, creating the parent folder if needed.
    ///
    /// Configurations whose names contain whitespace are skipped with a
    /// warning. Returns the number of lines written.
    pub fn export(&self, configs: &[SelectedConfig]) -> Result<usize> {
        let path = &self.output_path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AnalysisError::io(parent, e))?;
        }

        let file = File::create(path).map_err(|e| AnalysisError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        let mut written = 0;
        for config in writable(configs) {
            writeln!(writer, "{}", config.to_line()).map_err(|e| AnalysisError::io(path, e))?;
            written += 1;
        }
        writer.flush().map_err(|e| AnalysisError::io(path, e))?;

        log::info!("wrote {written} selected configuration(s) to {}", path.display());
        Ok(written)
    }

    /// Read a summary written by [`SummaryExporter::export`].
    pub fn read(&self) -> Result<Vec<SelectedConfig>> {
        let text = fs::read_to_string(&self.output_path).map_err(|e| AnalysisError::io(&self.output_path, e))?;
        parse_selected_configs(&text)
    }
}

/// Convenience wrapper around [`SummaryExporter`].
pub fn write_selected_configs<P: AsRef<Path>>(configs: &[SelectedConfig], path: P) -> Result<usize> {
    SummaryExporter::new(path).export(configs)
}
