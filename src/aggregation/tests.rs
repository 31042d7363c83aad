use polars::prelude::*;

use super::*;
use crate::datastructures::Cell;
use crate::merge::summary_rows;
use crate::test_utils::*;

fn aggregated_rows(records: &[KeyedRecord]) -> Vec<crate::datastructures::SummaryRow> {
    let runs = records_to_dataframe(records).unwrap();
    let df = aggregate(runs.lazy()).collect().unwrap();
    summary_rows(&df).unwrap()
}

#[test]
fn test_runs_dataframe_has_fixed_schema() {
    let records = vec![
        runtime_run(4, "n-div-2", 1.0),
        keyed_run(4, "n-div-2", "upper_bound : 0\n"),
    ];
    let df = records_to_dataframe(&records).unwrap();
    assert_eq!(df.height(), 2);
    assert_eq!(df.width(), 2 + Metric::ALL.len());
    assert_eq!(df.column("gap").unwrap().null_count(), 2);
    assert_eq!(
        df["solved"],
        Series::new("solved", &[1_i64, 0])
    );
}

#[test]
fn test_statistics_per_group() {
    let records = vec![
        runtime_run(4, "n-div-2", 1.0),
        runtime_run(4, "n-div-2", 4.0),
        runtime_run(4, "n-div-2", 2.0),
        runtime_run(4, "n-div-2", 3.0),
        keyed_run(8, "n-div-2", "solution_runtime : 9.5\n"),
    ];
    let rows = aggregated_rows(&records);
    assert_eq!(rows.len(), 2);

    let row = find_row(&rows, 4, "n-div-2");
    let runtime = |stat: Statistic| {
        row.cell(&stat.column(Metric::SolutionRuntime)).value().unwrap()
    };
    assert_eq!(runtime(Statistic::Mean), 2.5);
    assert_eq!(runtime(Statistic::Median), 2.5);
    assert_eq!(runtime(Statistic::Min), 1.0);
    assert_eq!(runtime(Statistic::Max), 4.0);
    assert_eq!(runtime(Statistic::Q25), 1.75);
    assert_eq!(runtime(Statistic::Q75), 3.25);
    assert_eq!(row.cell("solved_count"), Cell::Numeric(4.0));
    assert_eq!(row.cell(RUNS), Cell::Numeric(4.0));

    let single = find_row(&rows, 8, "n-div-2");
    assert_eq!(single.cell("solved_count"), Cell::Numeric(0.0));
    assert_eq!(
        single.cell("q75_solution_runtime"),
        Cell::Numeric(9.5)
    );
}

#[test]
fn test_non_finite_gaps_are_skipped() {
    let records = vec![
        keyed_run(2, "3reps", "upper_bound : 100\nsolution_length : 60\n"),
        keyed_run(2, "3reps", "upper_bound : 0\nsolution_length : 60\n"),
        keyed_run(2, "3reps", "upper_bound : 100\nsolution_length : 80\n"),
        keyed_run(3, "3reps", "upper_bound : 0\n"),
    ];
    let rows = aggregated_rows(&records);
    let row = find_row(&rows, 2, "3reps");
    assert_eq!(row.cell("avg_gap"), Cell::Numeric(30.0));
    assert_eq!(row.cell("max_gap"), Cell::Numeric(40.0));
    assert_eq!(row.cell(RUNS), Cell::Numeric(3.0));
    assert!(find_row(&rows, 3, "3reps").cell("avg_gap").is_missing());
}

#[test]
fn test_grouping_ignores_record_order() {
    let records = (1..=7)
        .map(|i| runtime_run(i % 2, "n-div-4", (i * i) as f64))
        .collect_vec();
    let mut reversed = records.clone();
    reversed.reverse();
    let mut rotated = records.clone();
    rotated.rotate_left(3);

    let mut expected = aggregated_rows(&records);
    expected.sort_by(|a, b| a.key.cmp(&b.key));
    for permutation in [reversed, rotated] {
        let mut rows = aggregated_rows(&permutation);
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        assert_eq!(rows, expected);
    }
}

#[test]
fn test_sort_records_is_stable() {
    let mut records = vec![
        runtime_run(8, "a", 1.0),
        runtime_run(4, "b", 2.0),
        runtime_run(8, "c", 3.0),
        runtime_run(4, "d", 4.0),
    ];
    sort_records(&mut records, |key| key.property_1);
    let order = records
        .iter()
        .map(|r| r.key.property_2.as_str())
        .collect_vec();
    assert_eq!(order, ["b", "d", "a", "c"]);
}
