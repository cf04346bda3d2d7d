//! Command-line helpers shared by the binaries in `tools/`.
//!
//! Every binary takes a fixed number of positional arguments plus a few
//! `--flag value` options. Misuse becomes [`AnalysisError::Usage`] and the
//! binary exits with status 1.

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use std::fmt::Display;
use std::str::FromStr;

/// Flag accepted by every binary.
pub const CONFIG_FLAG: &str = "config";

/// Parsed command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    positionals: Vec<String>,
    flags: Vec<(String, String)>,
    help: bool,
}

impl CliArgs {
    /// Parse arguments (program name excluded).
    ///
    /// `flags` lists the accepted option names without the leading dashes.
    /// Both `--name value` and `--name=value` are understood.
    pub fn parse<I, S>(args: I, flags: &[&str]) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = CliArgs::default();
        let mut iter = args.into_iter().map(Into::into);

        while let Some(arg) = iter.next() {
            if arg == "--help" || arg == "-h" {
                parsed.help = true;
                continue;
            }
            let Some(option) = arg.strip_prefix("--") else {
                parsed.positionals.push(arg);
                continue;
            };

            let (name, inline) = match option.split_once('=') {
                Some((name, value)) => (name.to_string(), Some(value.to_string())),
                None => (option.to_string(), None),
            };
            if name != CONFIG_FLAG && !flags.contains(&name.as_str()) {
                return Err(AnalysisError::Usage(format!("unknown option `--{name}`")));
            }
            let value = match inline {
                Some(value) => value,
                None => iter
                    .next()
                    .ok_or_else(|| AnalysisError::Usage(format!("option `--{name}` requires a value")))?,
            };
            parsed.flags.push((name, value));
        }

        Ok(parsed)
    }

    /// Parse the process arguments.
    pub fn from_env(flags: &[&str]) -> Result<Self> {
        Self::parse(std::env::args().skip(1), flags)
    }

    pub fn wants_help(&self) -> bool {
        self.help
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// Exactly `n` positional arguments.
    pub fn expect_positionals(&self, n: usize) -> Result<&[String]> {
        if self.positionals.len() == n {
            Ok(&self.positionals)
        } else {
            Err(AnalysisError::Usage(format!(
                "expected {n} argument(s), got {}",
                self.positionals.len()
            )))
        }
    }

    /// Raw option value; the last occurrence wins.
    pub fn flag_str(&self, name: &str) -> Option<&str> {
        self.flags
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Option value parsed into `T`.
    pub fn flag<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.flag_str(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|e| AnalysisError::Usage(format!("invalid value `{raw}` for `--{name}`: {e}")))
            })
            .transpose()
    }

    /// Floating-point option that must be positive and finite.
    pub fn flag_f64(&self, name: &str) -> Result<Option<f64>> {
        match self.flag::<f64>(name)? {
            Some(v) if !(v.is_finite() && v > 0.0) => Err(AnalysisError::Usage(format!(
                "`--{name}` must be a positive number, got {v}"
            ))),
            other => Ok(other),
        }
    }

    /// Configuration from `--config`, or the defaults.
    pub fn load_config(&self) -> Result<AnalysisConfig> {
        match self.flag_str(CONFIG_FLAG) {
            Some(path) => AnalysisConfig::load(path),
            None => Ok(AnalysisConfig::default()),
        }
    }
}

/// Logger for the binaries, `info` and up.
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
