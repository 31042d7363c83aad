#![warn(missing_docs)]
//! Turn raw per-run solver logs of the RFLCS experiments into LaTeX comparison tables.
//!
//! The pipeline parses every log file of a results directory into a fixed set of metrics,
//! groups the runs by the configuration encoded in the file name, summarizes each group,
//! joins an optional baseline table computed elsewhere and renders one row per
//! configuration. In every row the best value of each metric among the competing methods
//! is printed in bold.
//!
//! The `rflcs_tables` executable drives the pipeline from a json config. The library can
//! also be used step by step:
//!
//! Example
//! ```rust
//! use rflcs_report::datastructures::{KeyScheme, LabeledRow};
//! use rflcs_report::group_key::KeyExtractor;
//! use rflcs_report::{aggregation, merge};
//! # use anyhow::Result;
//! # use polars::prelude::IntoLazy;
//! # use std::path::Path;
//!
//! fn example() -> Result<Vec<LabeledRow>> {
//!     // file names look like `<alphabet size>_<length fraction>.<seed>.out`
//!     let extractor = KeyExtractor::new(r"^(\d+)_(\d*n-div-\d+).(\d+).out$")?;
//!     let records = aggregation::collect_records(Path::new("type0"), "*.out", &extractor)?;
//!
//!     let runs = aggregation::records_to_dataframe(&records)?.lazy();
//!     let aggregated = aggregation::aggregate(merge::fallback_upper_bounds(runs));
//!     let merged = merge::normalize_sentinels(aggregated.collect()?)?;
//!
//!     // sort by length fraction, then alphabet size
//!     Ok(KeyScheme::Fraction.arrange(merge::summary_rows(&merged)?))
//! }
//! ```

/// Statistical summary of runs that share a configuration key.
#[allow(missing_docs)]
pub mod aggregation;

/// Keys, cells, rows and the json config.
#[allow(missing_docs)]
pub mod datastructures;

/// Cell formatting with highlighting of the best value in a row.
pub mod formatting;

/// Configuration keys from result file names.
#[allow(missing_docs)]
pub mod group_key;

/// LaTeX table layouts and the grouped table renderer.
#[allow(missing_docs)]
pub mod latex_table;

/// Parsing of single solver logs into metric records.
#[allow(missing_docs)]
pub mod log_parser;

/// Upper bound fallback, baseline join and sentinel normalization.
#[allow(missing_docs)]
pub mod merge;

/// Sort order and labels of configuration keys.
#[allow(missing_docs)]
pub mod ordering;

/// Creation of complete report files.
#[allow(missing_docs)]
pub mod report;

#[cfg(test)]
mod test_utils;
