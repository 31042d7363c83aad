use crate::datastructures::{ConfigurationKey, SummaryRow};
use crate::log_parser::{parse_log, KeyedRecord};

/// Builds a run from log lines, as if read from `<property_1>_<property_2>.<seed>.out`.
pub fn keyed_run(property_1: i64, property_2: &str, log: &str) -> KeyedRecord {
    KeyedRecord {
        key: ConfigurationKey::new(property_1, property_2),
        metrics: parse_log(log),
    }
}

pub fn runtime_run(property_1: i64, property_2: &str, runtime: f64) -> KeyedRecord {
    keyed_run(
        property_1,
        property_2,
        &format!("solved : true\nsolution_runtime : {runtime}\n"),
    )
}

pub fn find_row<'a>(
    rows: &'a [SummaryRow],
    property_1: i64,
    property_2: &str,
) -> &'a SummaryRow {
    rows.iter()
        .find(|r| r.key == ConfigurationKey::new(property_1, property_2))
        .expect("row for key")
}
