use std::path::Path;

use anyhow::{Context, Result};
use glob::glob;
use itertools::Itertools;
use log::{debug, info, warn};
use polars::prelude::*;

use crate::datastructures::ConfigurationKey;
use crate::group_key::KeyExtractor;
use crate::log_parser::{parse_log_file, KeyedRecord, Metric};

pub const PROPERTY_1: &str = "Property_1";
pub const PROPERTY_2: &str = "Property_2";
pub const RUNS: &str = "runs";

/// Summary statistics computed for every numeric metric of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Mean,
    Median,
    Min,
    Max,
    Q25,
    Q75,
}

impl Statistic {
    pub const ALL: [Statistic; 6] = [
        Statistic::Mean,
        Statistic::Median,
        Statistic::Min,
        Statistic::Max,
        Statistic::Q25,
        Statistic::Q75,
    ];

    fn prefix(&self) -> &'static str {
        match self {
            Statistic::Mean => "avg",
            Statistic::Median => "median",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Q25 => "q25",
            Statistic::Q75 => "q75",
        }
    }

    pub fn column(&self, metric: Metric) -> String {
        format!("{}_{}", self.prefix(), metric.name())
    }

    fn expr(&self, metric: Metric) -> Expr {
        let values = col(metric.name());
        let aggregated = match self {
            Statistic::Mean => values.mean(),
            Statistic::Median => values.median(),
            Statistic::Min => values.min(),
            Statistic::Max => values.max(),
            Statistic::Q25 => {
                values.quantile(lit(0.25), QuantileInterpolOptions::Linear)
            }
            Statistic::Q75 => {
                values.quantile(lit(0.75), QuantileInterpolOptions::Linear)
            }
        };
        aggregated.alias(&self.column(metric))
    }
}

/// Column holding the number of runs in which an indicator was set.
pub fn count_column(metric: Metric) -> &'static str {
    match metric {
        Metric::Solved => "solved_count",
        Metric::ReductionIsComplete => "reduction_complete_count",
        Metric::HeuristicSolutionBest => "heuristic_best_count",
        _ => metric.name(),
    }
}

/// Finds all result files of a directory and parses those whose name matches
/// the extractor. Unmatched names and unreadable files are skipped.
pub fn collect_records(
    results_dir: &Path,
    file_glob: &str,
    extractor: &KeyExtractor,
) -> Result<Vec<KeyedRecord>> {
    let pattern = results_dir.join(file_glob);
    let pattern = pattern
        .to_str()
        .with_context(|| format!("Non UTF-8 results path {pattern:?}"))?;
    let mut records = Vec::new();
    let mut skipped = 0;
    for path in glob(pattern)
        .with_context(|| format!("Invalid glob pattern: {pattern}"))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
    {
        let Some(key) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| extractor.extract(name))
        else {
            debug!("Skipping {:?}, file name does not match", path);
            skipped += 1;
            continue;
        };
        match parse_log_file(&path) {
            Ok(metrics) => records.push(KeyedRecord { key, metrics }),
            Err(err) => {
                warn!("Skipping unreadable result file: {err:#}");
                skipped += 1;
            }
        }
    }
    info!(
        "Parsed {} result files from {:?} ({} skipped)",
        records.len(),
        results_dir,
        skipped
    );
    Ok(records)
}

/// Per-run table with key columns followed by one column per metric.
///
/// Non-finite values become nulls so every aggregation skips them.
pub fn records_to_dataframe(records: &[KeyedRecord]) -> Result<DataFrame> {
    let mut columns = vec![
        Series::new(
            PROPERTY_1,
            records.iter().map(|r| r.key.property_1).collect_vec(),
        ),
        Series::new(
            PROPERTY_2,
            records
                .iter()
                .map(|r| r.key.property_2.clone())
                .collect_vec(),
        ),
    ];
    for metric in Metric::ALL {
        let series = if metric.is_indicator() {
            Series::new(
                metric.name(),
                records
                    .iter()
                    .map(|r| r.metrics.get(metric) as i64)
                    .collect_vec(),
            )
        } else {
            Series::new(
                metric.name(),
                records
                    .iter()
                    .map(|r| Some(r.metrics.get(metric)).filter(|v| v.is_finite()))
                    .collect_vec(),
            )
        };
        columns.push(series);
    }
    Ok(DataFrame::new(columns)?)
}

/// Groups runs by configuration key and summarizes every metric.
pub fn aggregate(runs: LazyFrame) -> LazyFrame {
    let counts = Metric::indicators()
        .map(|metric| col(metric.name()).sum().alias(count_column(metric)));
    let statistics = Metric::numeric().flat_map(|metric| {
        Statistic::ALL.into_iter().map(move |stat| stat.expr(metric))
    });
    let aggregations = std::iter::once(count().alias(RUNS))
        .chain(counts)
        .chain(statistics)
        .collect_vec();
    runs.groupby([col(PROPERTY_1), col(PROPERTY_2)])
        .agg(aggregations)
}

/// Orders runs for the per-run export; the sort is stable.
pub fn sort_records<F, K>(records: &mut [KeyedRecord], sort_key: F)
where
    F: Fn(&ConfigurationKey) -> K,
    K: Ord,
{
    records.sort_by_key(|record| sort_key(&record.key));
}

#[cfg(test)]
mod tests;
