use std::{fs, path::Path};

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::datastructures::ConfigurationKey;

/// The fixed vocabulary of per-run metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Solved,
    SolutionLength,
    UpperBound,
    SolutionRuntime,
    HeuristicSolutionLength,
    HeuristicSolutionRuntime,
    HeuristicRuntime,
    ReductionIsComplete,
    ReductionQuality,
    ReductionUpperBound,
    ReductionRuntime,
    MatchIlpSolutionLength,
    MatchIlpUpperBound,
    MatchIlpRuntime,
    MddIlpSolutionLength,
    MddIlpUpperBound,
    MddIlpRuntime,
    MddMemoryConsumption,
    MainProcessMemoryConsumption,
    Gap,
    MatchIlpGap,
    MddIlpGap,
    HeuristicSolutionBest,
}

impl Metric {
    pub const ALL: [Metric; 23] = [
        Metric::Solved,
        Metric::SolutionLength,
        Metric::UpperBound,
        Metric::SolutionRuntime,
        Metric::HeuristicSolutionLength,
        Metric::HeuristicSolutionRuntime,
        Metric::HeuristicRuntime,
        Metric::ReductionIsComplete,
        Metric::ReductionQuality,
        Metric::ReductionUpperBound,
        Metric::ReductionRuntime,
        Metric::MatchIlpSolutionLength,
        Metric::MatchIlpUpperBound,
        Metric::MatchIlpRuntime,
        Metric::MddIlpSolutionLength,
        Metric::MddIlpUpperBound,
        Metric::MddIlpRuntime,
        Metric::MddMemoryConsumption,
        Metric::MainProcessMemoryConsumption,
        Metric::Gap,
        Metric::MatchIlpGap,
        Metric::MddIlpGap,
        Metric::HeuristicSolutionBest,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Solved => "solved",
            Metric::SolutionLength => "solution_length",
            Metric::UpperBound => "upper_bound",
            Metric::SolutionRuntime => "solution_runtime",
            Metric::HeuristicSolutionLength => "heuristic_solution_length",
            Metric::HeuristicSolutionRuntime => "heuristic_solution_runtime",
            Metric::HeuristicRuntime => "heuristic_runtime",
            Metric::ReductionIsComplete => "reduction_is_complete",
            Metric::ReductionQuality => "reduction_quality",
            Metric::ReductionUpperBound => "reduction_upper_bound",
            Metric::ReductionRuntime => "reduction_runtime",
            Metric::MatchIlpSolutionLength => "match_ilp_solution_length",
            Metric::MatchIlpUpperBound => "match_ilp_upper_bound",
            Metric::MatchIlpRuntime => "match_ilp_runtime",
            Metric::MddIlpSolutionLength => "mdd_ilp_solution_length",
            Metric::MddIlpUpperBound => "mdd_ilp_upper_bound",
            Metric::MddIlpRuntime => "mdd_ilp_runtime",
            Metric::MddMemoryConsumption => "mdd_memory_consumption",
            Metric::MainProcessMemoryConsumption => {
                "main_process_memory_consumption"
            }
            Metric::Gap => "gap",
            Metric::MatchIlpGap => "match_ilp_gap",
            Metric::MddIlpGap => "mdd_ilp_gap",
            Metric::HeuristicSolutionBest => "heuristic_solution_best",
        }
    }

    /// Looks up a metric that may be read from a log file.
    /// Derived metrics are never taken from the log.
    pub fn from_log_key(key: &str) -> Option<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|m| !m.is_derived())
            .find(|m| m.name() == key)
    }

    /// Boolean indicators are summed per group instead of summarized.
    pub fn is_indicator(&self) -> bool {
        matches!(
            self,
            Metric::Solved
                | Metric::ReductionIsComplete
                | Metric::HeuristicSolutionBest
        )
    }

    pub fn is_derived(&self) -> bool {
        matches!(
            self,
            Metric::Gap
                | Metric::MatchIlpGap
                | Metric::MddIlpGap
                | Metric::HeuristicSolutionBest
        )
    }

    pub fn numeric() -> impl Iterator<Item = Metric> {
        Metric::ALL.into_iter().filter(|m| !m.is_indicator())
    }

    pub fn indicators() -> impl Iterator<Item = Metric> {
        Metric::ALL.into_iter().filter(Metric::is_indicator)
    }
}

/// One parsed run. Every metric holds its default until the log overwrites it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricRecord {
    pub solved: bool,
    pub solution_length: f64,
    pub upper_bound: f64,
    pub solution_runtime: f64,
    pub heuristic_solution_length: f64,
    pub heuristic_solution_runtime: f64,
    pub heuristic_runtime: f64,
    pub reduction_is_complete: bool,
    pub reduction_quality: f64,
    pub reduction_upper_bound: f64,
    pub reduction_runtime: f64,
    pub match_ilp_solution_length: f64,
    pub match_ilp_upper_bound: f64,
    pub match_ilp_runtime: f64,
    pub mdd_ilp_solution_length: f64,
    pub mdd_ilp_upper_bound: f64,
    pub mdd_ilp_runtime: f64,
    pub mdd_memory_consumption: f64,
    pub main_process_memory_consumption: f64,
    pub gap: f64,
    pub match_ilp_gap: f64,
    pub mdd_ilp_gap: f64,
    pub heuristic_solution_best: bool,
}

impl MetricRecord {
    /// Numeric view of a metric, indicators are 0 or 1.
    pub fn get(&self, metric: Metric) -> f64 {
        let indicator = |flag: bool| if flag { 1.0 } else { 0.0 };
        match metric {
            Metric::Solved => indicator(self.solved),
            Metric::SolutionLength => self.solution_length,
            Metric::UpperBound => self.upper_bound,
            Metric::SolutionRuntime => self.solution_runtime,
            Metric::HeuristicSolutionLength => self.heuristic_solution_length,
            Metric::HeuristicSolutionRuntime => self.heuristic_solution_runtime,
            Metric::HeuristicRuntime => self.heuristic_runtime,
            Metric::ReductionIsComplete => indicator(self.reduction_is_complete),
            Metric::ReductionQuality => self.reduction_quality,
            Metric::ReductionUpperBound => self.reduction_upper_bound,
            Metric::ReductionRuntime => self.reduction_runtime,
            Metric::MatchIlpSolutionLength => self.match_ilp_solution_length,
            Metric::MatchIlpUpperBound => self.match_ilp_upper_bound,
            Metric::MatchIlpRuntime => self.match_ilp_runtime,
            Metric::MddIlpSolutionLength => self.mdd_ilp_solution_length,
            Metric::MddIlpUpperBound => self.mdd_ilp_upper_bound,
            Metric::MddIlpRuntime => self.mdd_ilp_runtime,
            Metric::MddMemoryConsumption => self.mdd_memory_consumption,
            Metric::MainProcessMemoryConsumption => {
                self.main_process_memory_consumption
            }
            Metric::Gap => self.gap,
            Metric::MatchIlpGap => self.match_ilp_gap,
            Metric::MddIlpGap => self.mdd_ilp_gap,
            Metric::HeuristicSolutionBest => {
                indicator(self.heuristic_solution_best)
            }
        }
    }

    fn set(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::SolutionLength => &mut self.solution_length,
            Metric::UpperBound => &mut self.upper_bound,
            Metric::SolutionRuntime => &mut self.solution_runtime,
            Metric::HeuristicSolutionLength => {
                &mut self.heuristic_solution_length
            }
            Metric::HeuristicSolutionRuntime => {
                &mut self.heuristic_solution_runtime
            }
            Metric::HeuristicRuntime => &mut self.heuristic_runtime,
            Metric::ReductionQuality => &mut self.reduction_quality,
            Metric::ReductionUpperBound => &mut self.reduction_upper_bound,
            Metric::ReductionRuntime => &mut self.reduction_runtime,
            Metric::MatchIlpSolutionLength => {
                &mut self.match_ilp_solution_length
            }
            Metric::MatchIlpUpperBound => &mut self.match_ilp_upper_bound,
            Metric::MatchIlpRuntime => &mut self.match_ilp_runtime,
            Metric::MddIlpSolutionLength => &mut self.mdd_ilp_solution_length,
            Metric::MddIlpUpperBound => &mut self.mdd_ilp_upper_bound,
            Metric::MddIlpRuntime => &mut self.mdd_ilp_runtime,
            Metric::MddMemoryConsumption => &mut self.mdd_memory_consumption,
            Metric::MainProcessMemoryConsumption => {
                &mut self.main_process_memory_consumption
            }
            Metric::Solved
            | Metric::ReductionIsComplete
            | Metric::Gap
            | Metric::MatchIlpGap
            | Metric::MddIlpGap
            | Metric::HeuristicSolutionBest => return,
        };
        *slot = value;
    }

    fn derive(&mut self) {
        self.gap = gap_percentage(self.upper_bound, self.solution_length);
        self.match_ilp_gap = gap_percentage(
            self.match_ilp_upper_bound,
            self.match_ilp_solution_length,
        );
        self.mdd_ilp_gap = gap_percentage(
            self.mdd_ilp_upper_bound,
            self.mdd_ilp_solution_length,
        );
        self.heuristic_solution_best =
            self.solution_length == self.heuristic_solution_length;
    }
}

/// A parsed run together with the configuration it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRecord {
    pub key: ConfigurationKey,
    pub metrics: MetricRecord,
}

/// Percentage shortfall of `solution` from `upper_bound`.
/// A zero bound yields a non-finite value.
pub fn gap_percentage(upper_bound: f64, solution: f64) -> f64 {
    100.0 * (upper_bound - solution) / upper_bound
}

fn split_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.trim().split_once(':')?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Parses the content of one solver log. Unknown keys and malformed lines are
/// ignored, derived metrics are computed once all lines are read.
pub fn parse_log(content: &str) -> MetricRecord {
    let mut record = MetricRecord::default();
    for (key, value) in content.lines().filter_map(split_line) {
        let Some(metric) = Metric::from_log_key(key) else { continue; };
        match metric {
            Metric::Solved => {
                record.solved |= value.eq_ignore_ascii_case("true")
            }
            Metric::ReductionIsComplete => {
                record.reduction_is_complete |=
                    value.eq_ignore_ascii_case("true")
            }
            Metric::ReductionQuality => {
                if let Ok(v) = value.parse::<f64>() {
                    record.set(metric, 100.0 * v);
                }
            }
            Metric::MddMemoryConsumption => {
                if let Ok(v) = value.parse::<f64>() {
                    record.set(metric, v / 1000.0);
                }
            }
            _ => {
                if let Ok(v) = value.parse::<f64>() {
                    record.set(metric, v);
                }
            }
        }
    }
    record.derive();
    record
}

/// Invalid UTF-8 only spoils the lines it occurs in.
pub fn parse_log_file(path: &Path) -> Result<MetricRecord> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read log file {path:?}"))?;
    Ok(parse_log(&String::from_utf8_lossy(&bytes)))
}

/// Metric names in column order, used for per-run tables.
pub fn metric_names() -> Vec<&'static str> {
    Metric::ALL.iter().map(Metric::name).collect_vec()
}
