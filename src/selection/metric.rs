//! Metric accessors used to rank records.

use crate::schema::RunRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Something that reads a rankable number off a record.
///
/// `None` means the record cannot be ranked (metric not measured).
pub trait Metric {
    fn value(&self, record: &RunRecord) -> Option<f64>;
}

impl<F> Metric for F
where
    F: Fn(&RunRecord) -> Option<f64>,
{
    fn value(&self, record: &RunRecord) -> Option<f64> {
        self(record)
    }
}

/// Built-in ranking metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Achieved GFLOP/s (the selection metric of the study)
    #[default]
    Gflops,
    /// Achieved bandwidth in GB/s
    Bandwidth,
    /// Arithmetic intensity in FLOP/byte
    Intensity,
    /// 90th-percentile duration in ms (larger ranks higher)
    Duration,
}

impl MetricKind {
    pub fn all() -> &'static [MetricKind] {
        &[
            MetricKind::Gflops,
            MetricKind::Bandwidth,
            MetricKind::Intensity,
            MetricKind::Duration,
        ]
    }

    /// Name used on the command line and in configs.
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::Gflops => "gflops",
            MetricKind::Bandwidth => "bandwidth",
            MetricKind::Intensity => "intensity",
            MetricKind::Duration => "duration",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::Gflops => "GFLOP/s",
            MetricKind::Bandwidth => "GB/s",
            MetricKind::Intensity => "FLOP/byte",
            MetricKind::Duration => "ms",
        }
    }
}

impl Metric for MetricKind {
    fn value(&self, record: &RunRecord) -> Option<f64> {
        match self {
            MetricKind::Gflops => record.gflops(),
            MetricKind::Bandwidth => record.bandwidth_gbps(),
            MetricKind::Intensity => record.arithmetic_intensity(),
            MetricKind::Duration => record.duration_ms(),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        MetricKind::all()
            .iter()
            .copied()
            .find(|m| m.name() == lower)
            .ok_or_else(|| {
                let names: Vec<&str> = MetricKind::all().iter().map(|m| m.name()).collect();
                format!("unknown metric `{s}` (expected one of: {})", names.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_from_str() {
        assert_eq!("gflops".parse::<MetricKind>().unwrap(), MetricKind::Gflops);
        assert_eq!("Bandwidth".parse::<MetricKind>().unwrap(), MetricKind::Bandwidth);
        let err = "speed".parse::<MetricKind>().unwrap_err();
        assert!(err.contains("gflops"));
    }

    #[test]
    fn test_name_roundtrip() {
        for metric in MetricKind::all() {
            assert_eq!(metric.name().parse::<MetricKind>().unwrap(), *metric);
        }
    }
}
