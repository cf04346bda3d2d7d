//! Result Validation Module
//!
//! Data-quality checks run on loaded result sets before any derivation.
//! Findings are reported, never fatal: the analysis still runs on whatever
//! is usable, and the binaries log the report with `log::warn!`.
//!
//! # Validation Categories
//!
//! 1. **Hardware**: the profile needed for the derived compute roof
//! 2. **Completeness**: records without statistics, invalid fields, skipped entries
//! 3. **Durations**: non-positive durations that cannot feed a speedup
//! 4. **Pairing**: duplicate sequential baselines, parallel matrices without one
//!
//! # Usage
//!
//! ```ignore
//! use spmv_analysis::validation::ResultSetValidator;
//!
//! let result = ResultSetValidator::new().validate(&set);
//! for warning in result.warnings() {
//!     log::warn!("{warning}");
//! }
//! ```

use crate::schema::{ResultSet, SourceKind, Statistics};
use ahash::{AHashMap, AHashSet};
use std::fmt;

/// Validation result for a single check.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    /// Data is valid
    Valid,
    /// Data has minor issues (warnings)
    Warning(String),
    /// Data has serious issues (errors)
    Error(String),
}

impl ValidationLevel {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationLevel::Valid)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, ValidationLevel::Warning(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ValidationLevel::Error(_))
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationLevel::Valid => write!(f, "Valid"),
            ValidationLevel::Warning(msg) => write!(f, "Warning: {msg}"),
            ValidationLevel::Error(msg) => write!(f, "Error: {msg}"),
        }
    }
}

/// Aggregated validation result.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    results: Vec<(String, ValidationLevel)>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validation result.
    pub fn add(&mut self, check_name: &str, level: ValidationLevel) {
        self.results.push((check_name.to_string(), level));
    }

    /// Append another result's checks.
    pub fn extend(&mut self, other: ValidationResult) {
        self.results.extend(other.results);
    }

    /// No errors and no warnings.
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|(_, level)| level.is_valid())
    }

    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|(_, level)| level.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.results.iter().any(|(_, level)| level.is_warning())
    }

    fn messages(&self, pick: impl Fn(&ValidationLevel) -> Option<&str>) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|(name, level)| pick(level).map(|msg| format!("{name}: {msg}")))
            .collect()
    }

    /// `"<check>: <message>"` for every warning.
    pub fn warnings(&self) -> Vec<String> {
        self.messages(|level| match level {
            ValidationLevel::Warning(msg) => Some(msg.as_str()),
            _ => None,
        })
    }

    /// `"<check>: <message>"` for every error.
    pub fn errors(&self) -> Vec<String> {
        self.messages(|level| match level {
            ValidationLevel::Error(msg) => Some(msg.as_str()),
            _ => None,
        })
    }

    pub fn all_results(&self) -> &[(String, ValidationLevel)] {
        &self.results
    }

    pub fn check_count(&self) -> usize {
        self.results.len()
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|(_, l)| l.is_valid()).count()
    }

    /// Send every finding to the log.
    pub fn log(&self, context: &str) {
        for error in self.errors() {
            log::error!("{context}: {error}");
        }
        for warning in self.warnings() {
            log::warn!("{context}: {warning}");
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let passed = self.passed_count();
        let total = self.check_count();
        writeln!(f, "Validation: {passed}/{total} checks passed")?;

        for (name, level) in &self.results {
            if !level.is_valid() {
                writeln!(f, "  - {name}: {level}")?;
            }
        }

        Ok(())
    }
}

/// Which checks to run.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Warn when the hardware profile is unavailable
    pub check_hardware: bool,

    /// Warn about records with missing, invalid or non-positive fields
    pub check_statistics: bool,

    /// Warn about matrices with more than one sequential record
    pub check_duplicates: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            check_hardware: true,
            check_statistics: true,
            check_duplicates: true,
        }
    }
}

/// Validator for loaded result sets.
#[derive(Debug, Clone, Default)]
pub struct ResultSetValidator {
    config: ValidationConfig,
}

fn invalid_fields(stats: &Statistics) -> usize {
    [
        stats.duration_ms,
        stats.flops,
        stats.gflops,
        stats.bandwidth_gbps,
        stats.arithmetic_intensity,
    ]
    .iter()
    .filter(|m| m.is_invalid())
    .count()
}

impl ResultSetValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate one result set.
    pub fn validate(&self, set: &ResultSet) -> ValidationResult {
        let mut result = ValidationResult::new();

        if set.is_empty() {
            result.add("records", ValidationLevel::Error(format!("{} holds no usable records", set.source)));
        } else {
            result.add("records", ValidationLevel::Valid);
        }

        if set.skipped > 0 {
            result.add(
                "skipped",
                ValidationLevel::Warning(format!("{} malformed record(s) skipped", set.skipped)),
            );
        }

        for error in &set.errors {
            result.add("document", ValidationLevel::Warning(format!("benchmark reported: {error}")));
        }

        if self.config.check_hardware {
            let level = if set.hardware.is_available() {
                ValidationLevel::Valid
            } else {
                ValidationLevel::Warning("hardware profile unavailable, peak GFLOP/s must be configured".into())
            };
            result.add("hardware", level);
        }

        if self.config.check_statistics {
            self.validate_statistics(set, &mut result);
        }

        if self.config.check_duplicates {
            self.validate_duplicates(set, &mut result);
        }

        result
    }

    fn validate_statistics(&self, set: &ResultSet, result: &mut ValidationResult) {
        let mut missing = 0usize;
        for record in set.iter() {
            let name = record.matrix_name();
            let Some(stats) = record.statistics.as_ref() else {
                missing += 1;
                continue;
            };

            let invalid = invalid_fields(stats);
            if invalid > 0 {
                result.add(
                    name,
                    ValidationLevel::Warning(format!("{invalid} statistics field(s) of the wrong type")),
                );
            }

            if let Some(d) = record.duration_ms() {
                if d <= 0.0 {
                    result.add(
                        name,
                        ValidationLevel::Warning(format!("non-positive duration {d} ms, no speedup possible")),
                    );
                }
            }

            if !record.errors.is_empty() {
                result.add(
                    name,
                    ValidationLevel::Warning(format!("run reported errors: {}", record.errors.join("; "))),
                );
            }
        }

        let level = if missing == 0 {
            ValidationLevel::Valid
        } else {
            ValidationLevel::Warning(format!("{missing} record(s) without statistics"))
        };
        result.add("statistics", level);
    }

    fn validate_duplicates(&self, set: &ResultSet, result: &mut ValidationResult) {
        let mut counts: AHashMap<&str, usize> = AHashMap::new();
        for record in set.iter().filter(|r| r.kind() == SourceKind::Sequential) {
            *counts.entry(record.matrix_name()).or_default() += 1;
        }
        for matrix in set.matrix_names() {
            if let Some(n) = counts.get(matrix).filter(|n| **n > 1) {
                result.add(
                    matrix,
                    ValidationLevel::Warning(format!("{n} sequential records, the last one is used")),
                );
            }
        }
    }

    /// Check that every parallel matrix has a sequential baseline.
    pub fn validate_pairing(&self, sequential: &ResultSet, parallel: &ResultSet) -> ValidationResult {
        let mut result = ValidationResult::new();
        let baselines: AHashSet<&str> = sequential.iter().map(|r| r.matrix_name()).collect();
        for matrix in parallel.matrix_names() {
            let level = if baselines.contains(matrix) {
                ValidationLevel::Valid
            } else {
                ValidationLevel::Warning("no sequential baseline, excluded from speedup".into())
            };
            result.add(matrix, level);
        }
        result
    }
}
