use rflcs_report::datastructures::{Cell, KeyScheme, TableConfig};
use rflcs_report::report;
mod common;
use common::*;

#[test]
fn test_missing_baseline_keeps_all_rows() {
    let table = TableConfig {
        sources: vec![type0_source("data/test/does_not_exist")],
        key_scheme: KeyScheme::Fraction,
        ..fraction_table()
    };
    let rows = report::build_rows(&table).unwrap();
    assert_eq!(
        keys(&rows),
        [(4, "n-div-8"), (4, "n-div-2"), (8, "n-div-2")]
    );
    assert!(rows.iter().all(|r| r.row.cell("horn_s") == Cell::Missing));
    assert_eq!(rows[2].row.cell("avg_gap"), Cell::Numeric(0.0));
}

#[test]
fn test_baseline_join_drops_unmatched_rows() {
    let rows = report::build_rows(&TableConfig {
        sources: vec![type0_source("data/test/type0_horn")],
        ..fraction_table()
    })
    .unwrap();
    assert_eq!(keys(&rows), [(4, "n-div-8"), (4, "n-div-2")]);
}
