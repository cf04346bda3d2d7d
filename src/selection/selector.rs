//! Best / worst / median selection per matrix.

use super::metric::Metric;
use crate::error::{AnalysisError, Result};
use crate::schema::{ChunkSize, ResultSet, RunRecord, Scenario};
use ahash::AHashMap;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Which representative of a matrix group was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SelectionKind {
    Best,
    Worst,
    Median,
}

impl SelectionKind {
    /// Output order of the summary.
    pub fn all() -> &'static [SelectionKind] {
        &[SelectionKind::Best, SelectionKind::Worst, SelectionKind::Median]
    }

    pub fn name(&self) -> &'static str {
        match self {
            SelectionKind::Best => "best",
            SelectionKind::Worst => "worst",
            SelectionKind::Median => "median",
        }
    }
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SelectionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "best" => Ok(SelectionKind::Best),
            "worst" => Ok(SelectionKind::Worst),
            "median" => Ok(SelectionKind::Median),
            other => Err(format!("unknown selection kind `{other}`")),
        }
    }
}

/// Records of one matrix, in input order.
#[derive(Debug, Clone)]
pub struct MatrixGroup<'a> {
    pub matrix: &'a str,

    /// `(index in the source slice, record)`
    pub records: Vec<(usize, &'a RunRecord)>,
}

impl MatrixGroup<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Group records by matrix name, groups ordered by first appearance.
pub fn group_by_matrix(records: &[RunRecord]) -> Vec<MatrixGroup<'_>> {
    let mut index: AHashMap<&str, usize> = AHashMap::new();
    let mut groups: Vec<MatrixGroup<'_>> = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let name = record.matrix_name();
        let slot = *index.entry(name).or_insert_with(|| {
            groups.push(MatrixGroup {
                matrix: name,
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].records.push((i, record));
    }

    groups
}

/// A record that took part in ranking.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Index in the source slice
    pub index: usize,
    pub record: &'a RunRecord,
    pub value: f64,
}

/// Index of the first maximum.
pub fn first_max_index(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, v) in values.iter().enumerate() {
        match best {
            Some(b) if *v <= values[b] => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Index of the first minimum.
pub fn first_min_index(values: &[f64]) -> Option<usize> {
    let mut worst: Option<usize> = None;
    for (i, v) in values.iter().enumerate() {
        match worst {
            Some(w) if *v >= values[w] => {}
            _ => worst = Some(i),
        }
    }
    worst
}

/// Index of the lower-middle element after a stable sort by value.
///
/// Odd lengths give the true middle. Even lengths give the element just
/// below the midpoint, never an average of the two middle values.
pub fn lower_median_index(values: &[f64]) -> Option<usize> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|a, b| values[*a].partial_cmp(&values[*b]).unwrap_or(Ordering::Equal));
    let rank = if n % 2 == 1 { n / 2 } else { n / 2 - 1 };
    Some(order[rank])
}

/// Best, worst and median of one matrix.
#[derive(Debug, Clone)]
pub struct GroupSelection<'a> {
    pub matrix: &'a str,
    pub best: Candidate<'a>,
    pub worst: Candidate<'a>,
    pub median: Candidate<'a>,

    /// Records that could be ranked
    pub ranked: usize,
}

impl<'a> GroupSelection<'a> {
    pub fn get(&self, kind: SelectionKind) -> &Candidate<'a> {
        match kind {
            SelectionKind::Best => &self.best,
            SelectionKind::Worst => &self.worst,
            SelectionKind::Median => &self.median,
        }
    }

    /// Summary entries in best, worst, median order.
    pub fn configs(&self) -> Vec<SelectedConfig> {
        SelectionKind::all()
            .iter()
            .filter_map(|kind| SelectedConfig::from_candidate(self.matrix, *kind, self.get(*kind)))
            .collect()
    }
}

/// Rank one group.
///
/// Only records with a scenario and a finite metric take part: a sequential
/// run is not a configuration, and an unmeasured metric cannot be ranked.
/// Returns `None` when nothing in the group can be ranked.
pub fn select_group<'a, M: Metric + ?Sized>(
    group: &MatrixGroup<'a>,
    metric: &M,
) -> Option<GroupSelection<'a>> {
    let candidates: Vec<Candidate<'a>> = group
        .records
        .iter()
        .filter(|(_, r)| r.scenario.is_some())
        .filter_map(|(index, record)| {
            metric
                .value(record)
                .filter(|v| v.is_finite())
                .map(|value| Candidate {
                    index: *index,
                    record: *record,
                    value,
                })
        })
        .collect();

    let excluded = group.len() - candidates.len();
    if excluded > 0 {
        log::debug!(
            "{}: {excluded} record(s) without scenario or metric left out of ranking",
            group.matrix
        );
    }

    let values: Vec<f64> = candidates.iter().map(|c| c.value).collect();
    let best = first_max_index(&values)?;
    let worst = first_min_index(&values)?;
    let median = lower_median_index(&values)?;

    Some(GroupSelection {
        matrix: group.matrix,
        best: candidates[best],
        worst: candidates[worst],
        median: candidates[median],
        ranked: candidates.len(),
    })
}

/// Rank every matrix of a result set.
pub fn select_all<'a, M: Metric + ?Sized>(set: &'a ResultSet, metric: &M) -> Vec<GroupSelection<'a>> {
    group_by_matrix(&set.records)
        .iter()
        .filter_map(|group| select_group(group, metric))
        .collect()
}

/// Selected configurations of a result set, three per rankable matrix.
pub fn select_configs<M: Metric + ?Sized>(set: &ResultSet, metric: &M) -> Vec<SelectedConfig> {
    select_all(set, metric)
        .iter()
        .flat_map(GroupSelection::configs)
        .collect()
}

/// One line of the selected-configuration summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedConfig {
    pub matrix: String,
    pub kind: SelectionKind,
    pub scenario: Scenario,

    /// Metric value that decided the selection (`None` when parsed back)
    pub metric_value: Option<f64>,
}

impl SelectedConfig {
    fn from_candidate(matrix: &str, kind: SelectionKind, candidate: &Candidate<'_>) -> Option<Self> {
        let scenario = candidate.record.scenario.clone()?;
        Some(Self {
            matrix: matrix.to_string(),
            kind,
            scenario,
            metric_value: Some(candidate.value),
        })
    }

    /// True when [`SelectedConfig::to_line`] reads back as the same fields:
    /// names must be non-empty and free of whitespace.
    pub fn is_writable(&self) -> bool {
        [self.matrix.as_str(), self.scenario.scheduling.as_str()]
            .iter()
            .all(|field| !field.is_empty() && !field.contains(char::is_whitespace))
    }

    /// `<matrix> <kind> <threads> <scheduling> <chunk>`
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.matrix, self.kind, self.scenario.threads, self.scenario.scheduling, self.scenario.chunk
        )
    }

    /// Parse a summary line.
    pub fn parse_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(AnalysisError::parse(
                "selected configs",
                format!("expected 5 fields, got {}: `{line}`", fields.len()),
            ));
        }
        let kind = fields[1]
            .parse::<SelectionKind>()
            .map_err(|e| AnalysisError::parse("selected configs", e))?;
        let threads = fields[2].parse::<u32>().map_err(|_| {
            AnalysisError::parse("selected configs", format!("bad thread count `{}`", fields[2]))
        })?;

        Ok(Self {
            matrix: fields[0].to_string(),
            kind,
            scenario: Scenario::new(threads, fields[3], ChunkSize::parse(fields[4])),
            metric_value: None,
        })
    }
}

impl fmt::Display for SelectedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_max_and_min_prefer_first_occurrence() {
        let values = [3.0, 7.0, 1.0, 7.0, 1.0];
        assert_eq!(first_max_index(&values), Some(1));
        assert_eq!(first_min_index(&values), Some(2));
        assert_eq!(first_max_index(&[]), None);
    }

    #[test]
    fn test_lower_median_index() {
        assert_eq!(lower_median_index(&[10.0, 20.0, 15.0]), Some(2));
        // sorted: 5, 10, 15, 20 -> lower middle is 10 at index 1
        assert_eq!(lower_median_index(&[20.0, 10.0, 5.0, 15.0]), Some(1));
        assert_eq!(lower_median_index(&[4.0]), Some(0));
        assert_eq!(lower_median_index(&[]), None);
    }

    #[test]
    fn test_lower_median_ties_keep_input_order() {
        // stable sort: indices 1 and 2 tie, rank 1 is index 1
        assert_eq!(lower_median_index(&[9.0, 5.0, 5.0, 1.0]), Some(1));
    }

    #[test]
    fn test_parse_line() {
        let config = SelectedConfig::parse_line("bcsstk14.mtx best 16 dynamic 64").unwrap();
        assert_eq!(config.kind, SelectionKind::Best);
        assert_eq!(config.scenario.threads, 16);
        assert_eq!(config.scenario.chunk, ChunkSize::Value(64));
        assert_eq!(config.to_line(), "bcsstk14.mtx best 16 dynamic 64");

        assert!(config.is_writable());

        assert!(SelectedConfig::parse_line("A best 4 static").is_err());
        assert!(SelectedConfig::parse_line("A top 4 static 1").is_err());
        assert!(SelectedConfig::parse_line("A best four static 1").is_err());
    }
}
