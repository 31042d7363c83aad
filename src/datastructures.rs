use core::fmt;
use std::{collections::HashMap, fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Identifies one experiment parameterization, shared by all repeated runs of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigurationKey {
    pub property_1: i64,
    pub property_2: String,
}

impl ConfigurationKey {
    pub fn new(property_1: i64, property_2: impl Into<String>) -> Self {
        Self {
            property_1,
            property_2: property_2.into(),
        }
    }
}

impl fmt::Display for ConfigurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.property_1, self.property_2)
    }
}

/// A table cell that is either a number or absent.
///
/// Non-finite numbers are kept as `Numeric` but report no [`Cell::value`], so
/// they render like missing cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Numeric(f64),
    Missing,
}

impl Cell {
    pub fn value(&self) -> Option<f64> {
        match *self {
            Cell::Numeric(v) if v.is_finite() => Some(v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.value().is_none()
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Missing, Cell::Numeric)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Numeric(value)
    }
}

/// One merged and normalized row, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub key: ConfigurationKey,
    pub cells: HashMap<String, Cell>,
}

impl SummaryRow {
    /// Looks up a column, columns that the row's source does not provide are missing.
    pub fn cell(&self, column: &str) -> Cell {
        self.cells.get(column).copied().unwrap_or(Cell::Missing)
    }
}

/// A [`SummaryRow`] placed in the final table order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRow {
    pub primary_label: String,
    pub secondary_label: String,
    pub row: SummaryRow,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    pub tables: Vec<TableConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TableConfig {
    pub name: String,
    pub out: PathBuf,
    pub caption: String,
    pub label: String,
    pub heading_property_1: String,
    pub heading_property_2: String,
    #[serde(default)]
    pub layout: Layout,
    pub key_scheme: KeyScheme,
    #[serde(default)]
    pub runs_out: Option<PathBuf>,
    pub sources: Vec<SourceConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SourceConfig {
    pub results_dir: PathBuf,
    #[serde(default = "default_file_glob")]
    pub file_glob: String,
    pub pattern: String,
    #[serde(default)]
    pub remap: Option<KeyRemap>,
    #[serde(default)]
    pub baseline: Option<BaselineConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BaselineConfig {
    pub path: PathBuf,
    pub pattern: String,
}

/// Folds keys of a differently named dataset into the primary schema.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeyRemap {
    /// Keep `Property_1`, replace `Property_2` by a constant.
    #[serde(rename = "fixed_property_2")]
    FixedProperty2(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Baseline vs. heuristic vs. MDD + Gurobi.
    #[default]
    Full,
    /// Match ILP vs. MDD ILP.
    Ilp,
}

/// How configuration keys are ordered and labeled in a table.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeyScheme {
    /// `Property_2` encodes a fraction of the form `<k>n-div-<d>`.
    Fraction,
    /// `Property_2` is a small repetition count.
    Repetitions,
}

impl Config {
    pub fn from_file(path: &PathBuf) -> Result<Config> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {path:?}"))?;
        let config: Config = serde_json::from_str(&config_str)
            .with_context(|| format!("Invalid config {path:?}"))?;
        Ok(config)
    }
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_glob() -> String {
    "*.out".to_string()
}
