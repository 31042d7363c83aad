use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use itertools::Itertools;
use log::{info, warn};
use polars::prelude::*;

use crate::aggregation::{
    aggregate, collect_records, count_column, records_to_dataframe,
    Statistic, PROPERTY_1, PROPERTY_2, RUNS,
};
use crate::datastructures::{Cell, ConfigurationKey, SourceConfig, SummaryRow};
use crate::group_key::KeyExtractor;
use crate::log_parser::Metric;

pub const BASELINE_KEY_COLUMN: &str = "horn_Filename";

/// Stand-in for numeric cells that are too small to tell apart from zero.
pub const SENTINEL_EPSILON: f64 = 0.009;
pub const SENTINEL_THRESHOLD: f64 = 0.01;

const UPPER_BOUND_FALLBACKS: [(Metric, Metric); 2] = [
    (Metric::MatchIlpUpperBound, Metric::ReductionUpperBound),
    (Metric::MddIlpUpperBound, Metric::ReductionUpperBound),
];

const EXEMPT_BASELINE_COLUMNS: [&str; 3] =
    ["horn_gap", "horn_opt_tot", "horn_opt_mdd"];

/// Whether a merged column keeps values below the sentinel threshold.
/// Zero is meaningful for counts and gap percentages.
pub fn is_sentinel_exempt(column: &str) -> bool {
    let gap_family = [Metric::Gap, Metric::MatchIlpGap, Metric::MddIlpGap];
    column == PROPERTY_1
        || column == PROPERTY_2
        || column == RUNS
        || EXEMPT_BASELINE_COLUMNS.contains(&column)
        || Metric::indicators().any(|m| count_column(m) == column)
        || gap_family.iter().any(|&metric| {
            Statistic::ALL.iter().any(|stat| stat.column(metric) == column)
        })
}

fn clamp_sentinel(value: f64) -> f64 {
    if value < SENTINEL_THRESHOLD {
        SENTINEL_EPSILON
    } else {
        value
    }
}

/// Replaces negative upper bounds of the exact methods by the bound of the
/// reduction stage of the same run.
pub fn fallback_upper_bounds(runs: LazyFrame) -> LazyFrame {
    runs.with_columns(UPPER_BOUND_FALLBACKS.map(|(target, fallback)| {
        when(col(target.name()).lt(lit(0.0)))
            .then(col(fallback.name()))
            .otherwise(col(target.name()))
            .alias(target.name())
    }))
}

/// Replaces every non-exempt floating point cell below the threshold by
/// [`SENTINEL_EPSILON`]. Nulls stay null.
pub fn normalize_sentinels(df: DataFrame) -> Result<DataFrame> {
    let columns = df
        .get_columns()
        .iter()
        .map(|series| -> Result<Series> {
            if is_sentinel_exempt(series.name())
                || series.dtype() != &DataType::Float64
            {
                return Ok(series.clone());
            }
            let mut normalized = series
                .f64()?
                .into_iter()
                .map(|value| value.map(clamp_sentinel))
                .collect::<Float64Chunked>()
                .into_series();
            normalized.rename(series.name());
            Ok(normalized)
        })
        .collect::<Result<Vec<Series>>>()?;
    Ok(DataFrame::new(columns)?)
}

/// Reads a tab separated baseline table and replaces its file name column by
/// the two key columns. Rows whose file name does not match are dropped.
///
/// Returns `None` if the file does not exist.
pub fn load_baseline_table(
    path: &Path,
    extractor: &KeyExtractor,
) -> Result<Option<DataFrame>> {
    if !path.exists() {
        warn!("Baseline table {:?} not found, continuing without it", path);
        return Ok(None);
    }
    let df = CsvReader::from_path(path)?
        .with_delimiter(b'\t')
        .has_header(true)
        .finish()
        .with_context(|| format!("Failed to read baseline table {path:?}"))?;
    let keys = df
        .column(BASELINE_KEY_COLUMN)?
        .utf8()?
        .into_iter()
        .map(|name| name.and_then(|n| extractor.extract(n.trim())))
        .collect_vec();
    let mask = BooleanChunked::from_slice(
        "mask",
        &keys.iter().map(Option::is_some).collect_vec(),
    );
    let keys = keys.into_iter().flatten().collect_vec();
    let mut columns = vec![
        Series::new(PROPERTY_1, keys.iter().map(|k| k.property_1).collect_vec()),
        Series::new(
            PROPERTY_2,
            keys.iter().map(|k| k.property_2.clone()).collect_vec(),
        ),
    ];
    for series in df.filter(&mask)?.get_columns() {
        if series.name() != BASELINE_KEY_COLUMN {
            columns.push(series.cast(&DataType::Float64)?);
        }
    }
    info!("Loaded {} baseline rows from {:?}", keys.len(), path);
    Ok(Some(DataFrame::new(columns)?))
}

/// Inner join on the configuration key. Aggregated rows without a baseline
/// counterpart are dropped.
pub fn join_baseline(aggregated: LazyFrame, baseline: DataFrame) -> LazyFrame {
    let keys = [col(PROPERTY_1), col(PROPERTY_2)];
    aggregated.join(baseline.lazy(), &keys, &keys, JoinType::Inner)
}

/// Parses, aggregates and merges one result source into a normalized table.
pub fn merge_results(source: &SourceConfig) -> Result<DataFrame> {
    let extractor = KeyExtractor::new(&source.pattern)?
        .with_key_remap(source.remap.as_ref());
    let records =
        collect_records(&source.results_dir, &source.file_glob, &extractor)?;
    let runs = fallback_upper_bounds(records_to_dataframe(&records)?.lazy());
    let aggregated = aggregate(runs);
    let baseline = match &source.baseline {
        Some(baseline) => load_baseline_table(
            &baseline.path,
            &KeyExtractor::new(&baseline.pattern)?,
        )?,
        None => None,
    };
    let merged = match baseline {
        Some(baseline) => join_baseline(aggregated, baseline),
        None => aggregated,
    };
    normalize_sentinels(merged.collect()?)
}

/// Converts a merged table into rows of cells. Every non-key column is read
/// as floating point.
pub fn summary_rows(df: &DataFrame) -> Result<Vec<SummaryRow>> {
    let property_1 = df.column(PROPERTY_1)?.i64()?;
    let property_2 = df.column(PROPERTY_2)?.utf8()?;
    let mut rows = property_1
        .into_no_null_iter()
        .zip(property_2.into_no_null_iter())
        .map(|(p1, p2)| SummaryRow {
            key: ConfigurationKey::new(p1, p2),
            cells: HashMap::new(),
        })
        .collect_vec();
    for series in df.get_columns() {
        if series.name() == PROPERTY_1 || series.name() == PROPERTY_2 {
            continue;
        }
        let values = series.cast(&DataType::Float64)?;
        for (row, value) in rows.iter_mut().zip(values.f64()?.into_iter()) {
            row.cells.insert(series.name().to_string(), Cell::from(value));
        }
    }
    Ok(rows)
}
