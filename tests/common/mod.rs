#![allow(dead_code)]
use std::path::PathBuf;

use rflcs_report::datastructures::*;

pub const TYPE0_PATTERN: &str = r"^(\d+)_(\d*n-div-\d+).(\d+).out$";
pub const HORN_PATTERN: &str = r"^(\d+)_(\S+)$";

pub fn type0_source(baseline: &str) -> SourceConfig {
    SourceConfig {
        results_dir: PathBuf::from("data/test/type0"),
        file_glob: "*.out".to_string(),
        pattern: TYPE0_PATTERN.to_string(),
        remap: None,
        baseline: Some(BaselineConfig {
            path: PathBuf::from(baseline),
            pattern: HORN_PATTERN.to_string(),
        }),
    }
}

pub fn generated_source() -> SourceConfig {
    SourceConfig {
        results_dir: PathBuf::from("data/test/generated_instances"),
        file_glob: "*.out".to_string(),
        pattern: r"^(\d+)_(\d+).(\d+).out$".to_string(),
        remap: Some(KeyRemap::FixedProperty2("n-div-8".to_string())),
        baseline: None,
    }
}

pub fn fraction_table() -> TableConfig {
    TableConfig {
        name: "table_0".to_string(),
        out: PathBuf::from("table_0.tex"),
        caption: "Instance Set 1 Results".to_string(),
        label: "tab:results_1".to_string(),
        heading_property_1: "$|\\Sigma|$".to_string(),
        heading_property_2: "$n$".to_string(),
        layout: Layout::Full,
        key_scheme: KeyScheme::Fraction,
        runs_out: None,
        sources: vec![type0_source("data/test/type0_horn"), generated_source()],
    }
}

pub fn repetitions_table() -> TableConfig {
    TableConfig {
        name: "table_1_no_mdd".to_string(),
        out: PathBuf::from("table_1_no_mdd.tex"),
        caption: "No MDD Instance Set 2 Results".to_string(),
        label: "tab:results_2_no_mdd".to_string(),
        heading_property_1: "$|\\Sigma|$".to_string(),
        heading_property_2: "reps".to_string(),
        layout: Layout::Ilp,
        key_scheme: KeyScheme::Repetitions,
        runs_out: None,
        sources: vec![SourceConfig {
            results_dir: PathBuf::from("data/test/type1"),
            file_glob: "*.out".to_string(),
            pattern: r"^(\d+)_(\d+)reps.(\d+).out$".to_string(),
            remap: None,
            baseline: None,
        }],
    }
}

pub fn keys(rows: &[LabeledRow]) -> Vec<(i64, &str)> {
    rows.iter()
        .map(|r| (r.row.key.property_1, r.row.key.property_2.as_str()))
        .collect()
}
