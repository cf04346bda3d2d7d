//! Hardware counter extraction from `perf stat` output.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Counters read from a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Counter {
    L1DcacheLoads,
    L1DcacheLoadMisses,
    LlcLoads,
    LlcLoadMisses,
    CacheReferences,
    CacheMisses,
}

impl Counter {
    pub fn all() -> &'static [Counter] {
        &[
            Counter::L1DcacheLoads,
            Counter::L1DcacheLoadMisses,
            Counter::LlcLoads,
            Counter::LlcLoadMisses,
            Counter::CacheReferences,
            Counter::CacheMisses,
        ]
    }

    /// Event name as printed by `perf stat`.
    pub fn event_name(&self) -> &'static str {
        match self {
            Counter::L1DcacheLoads => "L1-dcache-loads",
            Counter::L1DcacheLoadMisses => "L1-dcache-load-misses",
            Counter::LlcLoads => "LLC-loads",
            Counter::LlcLoadMisses => "LLC-load-misses",
            Counter::CacheReferences => "cache-references",
            Counter::CacheMisses => "cache-misses",
        }
    }

    fn regex(&self) -> &'static Regex {
        let table = counter_table();
        // table is built from Counter::all() in the same order
        &table[*self as usize]
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

fn counter_table() -> &'static [Regex] {
    static TABLE: OnceLock<Vec<Regex>> = OnceLock::new();
    TABLE.get_or_init(|| {
        Counter::all()
            .iter()
            .map(|c| {
                let pattern = format!(r"([0-9,]+)\s+{}", regex::escape(c.event_name()));
                Regex::new(&pattern).expect("counter pattern is a valid regex")
            })
            .collect()
    })
}

fn elapsed_regex() -> &'static Regex {
    static ELAPSED: OnceLock<Regex> = OnceLock::new();
    ELAPSED.get_or_init(|| {
        Regex::new(r"([0-9.]+) seconds time elapsed").expect("elapsed pattern is a valid regex")
    })
}

/// `100 × misses / loads`, or `None` when a count is missing or `loads` is 0.
pub fn miss_rate(misses: Option<u64>, loads: Option<u64>) -> Option<f64> {
    match (misses, loads) {
        (Some(m), Some(l)) if l > 0 => Some(100.0 * m as f64 / l as f64),
        _ => None,
    }
}

/// Miss percentages of one profile.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MissRates {
    pub l1: Option<f64>,
    pub llc: Option<f64>,
    pub cache: Option<f64>,
}

impl MissRates {
    /// Series names, in the order of [`MissRates::values`].
    pub const NAMES: [&'static str; 3] = ["L1 Miss Rate (%)", "LLC Miss Rate (%)", "Cache Miss Rate (%)"];

    pub fn values(&self) -> [Option<f64>; 3] {
        [self.l1, self.llc, self.cache]
    }
}

/// Counters and elapsed time of one `perf stat` run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PerfProfile {
    counts: Vec<(Counter, u64)>,

    /// Wall time reported by `perf stat`, seconds
    pub elapsed_s: Option<f64>,
}

impl PerfProfile {
    /// Extract every known counter; missing ones are simply absent.
    pub fn parse(text: &str) -> Self {
        let counts = Counter::all()
            .iter()
            .filter_map(|counter| {
                let raw = counter.regex().captures(text)?.get(1)?.as_str().replace(',', "");
                match raw.parse::<u64>() {
                    Ok(v) => Some((*counter, v)),
                    Err(_) => {
                        log::debug!("{counter}: unreadable count `{raw}`");
                        None
                    }
                }
            })
            .collect();

        let elapsed_s = elapsed_regex()
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok());

        Self { counts, elapsed_s }
    }

    pub fn count(&self, counter: Counter) -> Option<u64> {
        self.counts.iter().find(|(c, _)| *c == counter).map(|(_, v)| *v)
    }

    pub fn miss_rates(&self) -> MissRates {
        MissRates {
            l1: miss_rate(self.count(Counter::L1DcacheLoadMisses), self.count(Counter::L1DcacheLoads)),
            llc: miss_rate(self.count(Counter::LlcLoadMisses), self.count(Counter::LlcLoads)),
            cache: miss_rate(self.count(Counter::CacheMisses), self.count(Counter::CacheReferences)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
 Performance counter stats for './spmv bcsstk14.mtx':

     1,234,567,890      L1-dcache-loads
        12,345,678      L1-dcache-load-misses     #    1.00% of all L1-dcache accesses
         2,000,000      LLC-loads
           500,000      LLC-load-misses           #   25.00% of all LL-cache accesses
         4,000,000      cache-references
         1,000,000      cache-misses              #   25.000 % of all cache refs

       1.503226877 seconds time elapsed
";

    #[test]
    fn test_parse_counts_with_separators() {
        let profile = PerfProfile::parse(SAMPLE);
        assert_eq!(profile.count(Counter::L1DcacheLoads), Some(1_234_567_890));
        assert_eq!(profile.count(Counter::LlcLoadMisses), Some(500_000));
        assert_eq!(profile.elapsed_s, Some(1.503226877));
    }

    #[test]
    fn test_miss_rates() {
        let rates = PerfProfile::parse(SAMPLE).miss_rates();
        assert_eq!(rates.llc, Some(25.0));
        assert_eq!(rates.cache, Some(25.0));
        assert!((rates.l1.unwrap() - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_miss_rate_guards() {
        assert_eq!(miss_rate(Some(50), Some(200)), Some(25.0));
        assert_eq!(miss_rate(Some(50), Some(0)), None);
        assert_eq!(miss_rate(None, Some(200)), None);
        assert_eq!(miss_rate(Some(50), None), None);
    }

    #[test]
    fn test_missing_counters_are_absent() {
        let profile = PerfProfile::parse("   10 cache-references\n");
        assert_eq!(profile.count(Counter::CacheReferences), Some(10));
        assert_eq!(profile.count(Counter::CacheMisses), None);
        assert_eq!(profile.miss_rates(), MissRates::default());
        assert_eq!(profile.elapsed_s, None);
    }
}
