use std::fmt::Write;

use itertools::Itertools;

use crate::aggregation::{count_column, Statistic, RUNS};
use crate::datastructures::{Cell, LabeledRow, Layout, SummaryRow};
use crate::formatting::*;
use crate::log_parser::Metric;

const GROUP_SEPARATOR: &str = " \\hline";
const TABLE_POSTFIX: &str = "\\end{tabular}\n    }\n\\end{table}";

/// Caption, label and key headings of one table.
#[derive(Debug, Clone, Copy)]
pub struct TableMeta<'a> {
    pub caption: &'a str,
    pub label: &'a str,
    pub heading_property_1: &'a str,
    pub heading_property_2: &'a str,
}

/// Markup of one table kind. The renderer only handles grouping.
pub trait TableLayout {
    fn header(&self, meta: &TableMeta) -> String;
    /// One table row without the primary label column.
    fn row(&self, row: &LabeledRow) -> String;
}

pub fn layout(kind: Layout) -> Box<dyn TableLayout> {
    match kind {
        Layout::Full => Box::new(FullComparison),
        Layout::Ilp => Box::new(IlpComparison),
    }
}

/// Rows sharing a primary label.
#[derive(Debug)]
pub struct RowGroup<'a> {
    pub label: &'a str,
    pub rows: Vec<&'a LabeledRow>,
}

/// Groups rows by primary label in order of first appearance, so a label
/// never opens two groups.
pub fn group_rows(rows: &[LabeledRow]) -> Vec<RowGroup<'_>> {
    let mut groups: Vec<RowGroup> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|g| g.label == row.primary_label) {
            Some(group) => group.rows.push(row),
            None => groups.push(RowGroup {
                label: &row.primary_label,
                rows: vec![row],
            }),
        }
    }
    groups
}

pub fn render_table(
    layout: &dyn TableLayout,
    meta: &TableMeta,
    rows: &[LabeledRow],
) -> String {
    let mut table = layout.header(meta);
    table.push('\n');
    for group in group_rows(rows) {
        // writing into a String cannot fail
        let _ = writeln!(table, "{GROUP_SEPARATOR}");
        let _ = writeln!(
            table,
            "\\multirow{{{}}}{{*}}{{{}}}",
            group.rows.len(),
            group.label
        );
        for row in group.rows {
            let _ = writeln!(table, "{}", layout.row(row));
        }
    }
    let _ = writeln!(table, "{GROUP_SEPARATOR}");
    let _ = writeln!(table, "{TABLE_POSTFIX}");
    table
}

fn right_bordered(text: &str) -> String {
    format!("\\multicolumn{{1}}{{r|}}{{{text}}}")
}

fn table_prefix(
    meta: &TableMeta,
    width: &str,
    column_spec: &str,
    headings: &[&str],
) -> String {
    let mut prefix = format!(
        "\\begin{{table}}[!ht]\n    \\centering\n    \\caption{{{}}}\n    \\label{{{}}}\n    \\resizebox{{{width}}}{{!}}{{\n    \\begin{{tabular}}{{{column_spec}}}\n    \\hline\n    \\multirow{{2}}{{*}}{{{}}} & \\multirow{{2}}{{*}}{{{}}}",
        meta.caption, meta.label, meta.heading_property_1, meta.heading_property_2,
    );
    for heading in headings {
        prefix.push_str("\n    ");
        prefix.push_str(heading);
    }
    prefix
}

fn avg(row: &SummaryRow, metric: Metric) -> Cell {
    row.cell(&Statistic::Mean.column(metric))
}

fn count(row: &SummaryRow, metric: Metric) -> Cell {
    row.cell(count_column(metric))
}

fn table_row(secondary_label: &str, cells: &[String]) -> String {
    format!("& {} & {} \\\\", secondary_label, cells.iter().join(" & "))
}

/// Baseline (MDD + CPLEX) vs. heuristic vs. MDD + Gurobi.
pub struct FullComparison;

impl TableLayout for FullComparison {
    fn header(&self, meta: &TableMeta) -> String {
        let units = [
            "obj",
            "gap{[}\\%{]}",
            "$t_{prep}${[}s{]}",
            "$t_{tot}${[}s{]}",
            "\\#opt",
        ]
        .iter()
        .map(|h| right_bordered(h))
        .collect_vec();
        let headings = [
            "& \\multirow{2}{*}{obj best}".to_string(),
            "& \\multicolumn{6}{c|}{MDD + CPLEX (Horn)}".to_string(),
            "& \\multicolumn{4}{c|}{Heuristic}".to_string(),
            "& \\multicolumn{7}{c}{MDD + Gurobi} \\\\ \\cline{4-20}".to_string(),
            format!("&  &  & {}", units.join(" & ")),
            "& red{[}\\%{]}".to_string(),
            format!(
                "& {} & {} & {} & $t_{{tot}}${{[}}s{{]}}",
                right_bordered("obj"),
                right_bordered("best"),
                right_bordered("$t_{sol}${[}s{]}")
            ),
            format!("& {}", units.join(" & ")),
            format!("& {}", right_bordered("red{[}\\%{]}")),
            "& ram{[}MB{]} \\\\".to_string(),
        ];
        table_prefix(
            meta,
            "\\textwidth",
            "c|c|c|cccccc|cccc|ccccccc",
            &headings.iter().map(String::as_str).collect_vec(),
        )
    }

    fn row(&self, labeled: &LabeledRow) -> String {
        let row = &labeled.row;
        let horn = |column: &str| row.cell(column);
        let solution_length = avg(row, Metric::SolutionLength);
        let gap = avg(row, Metric::Gap);
        let reduction_runtime = avg(row, Metric::ReductionRuntime);
        let solution_runtime = avg(row, Metric::SolutionRuntime);
        let reduction_quality = avg(row, Metric::ReductionQuality);
        let solved = count(row, Metric::Solved);
        let complete = count(row, Metric::ReductionIsComplete);
        let cells = [
            format_max(horn("horn_s_best"), &[horn("horn_s"), solution_length]),
            right_bordered(&format_max(
                horn("horn_s"),
                &[horn("horn_s_best"), solution_length],
            )),
            right_bordered(&format_min_exact(horn("horn_gap"), &[gap])),
            right_bordered(&format_min(horn("horn_t_prep"), &[reduction_runtime])),
            right_bordered(&format_min(horn("horn_t_tot"), &[solution_runtime])),
            right_bordered(&format_opt(
                horn("horn_opt_tot"),
                horn("horn_opt_mdd"),
                solved,
                complete,
            )),
            format_max(horn("horn_reduction"), &[reduction_quality]),
            right_bordered(&format_max(
                avg(row, Metric::HeuristicSolutionLength),
                &[horn("horn_s_best"), solution_length],
            )),
            right_bordered(&format_count_highlight(
                count(row, Metric::HeuristicSolutionBest),
                row.cell(RUNS),
            )),
            right_bordered(&format_plain(avg(
                row,
                Metric::HeuristicSolutionRuntime,
            ))),
            format_plain(avg(row, Metric::HeuristicRuntime)),
            right_bordered(&format_max(
                solution_length,
                &[horn("horn_s"), horn("horn_s_best")],
            )),
            right_bordered(&format_min_exact(gap, &[horn("horn_gap")])),
            right_bordered(&format_min(reduction_runtime, &[horn("horn_t_prep")])),
            right_bordered(&format_min(solution_runtime, &[horn("horn_t_tot")])),
            right_bordered(&format_opt(
                solved,
                complete,
                horn("horn_opt_tot"),
                horn("horn_opt_mdd"),
            )),
            right_bordered(&format_max(reduction_quality, &[horn("horn_reduction")])),
            format_plain(avg(row, Metric::MddMemoryConsumption)),
        ];
        table_row(&labeled.secondary_label, &cells)
    }
}

/// Match ILP vs. MDD ILP.
pub struct IlpComparison;

impl TableLayout for IlpComparison {
    fn header(&self, meta: &TableMeta) -> String {
        let method = || {
            [
                right_bordered("obj"),
                right_bordered("$t_{ilp}${[}s{]}"),
            ]
            .join(" & ")
        };
        let headings = [
            "& \\multicolumn{3}{c|}{Match ILP}".to_string(),
            "& \\multicolumn{3}{c}{MDD ILP} \\\\".to_string(),
            "\\cline{3-8}".to_string(),
            "&".to_string(),
            format!("& {} & {}", method(), right_bordered("gap{[}\\%{]}")),
            format!(
                "& {} & \\multicolumn{{1}}{{r}}{{gap{{[}}\\%{{]}}}} \\\\",
                method()
            ),
        ];
        table_prefix(
            meta,
            "0.7\\textwidth",
            "c|c|ccc|ccc",
            &headings.iter().map(String::as_str).collect_vec(),
        )
    }

    fn row(&self, labeled: &LabeledRow) -> String {
        let row = &labeled.row;
        let match_length = avg(row, Metric::MatchIlpSolutionLength);
        let match_runtime = avg(row, Metric::MatchIlpRuntime);
        let match_gap = avg(row, Metric::MatchIlpGap);
        let mdd_length = avg(row, Metric::MddIlpSolutionLength);
        let mdd_runtime = avg(row, Metric::MddIlpRuntime);
        let mdd_gap = avg(row, Metric::MddIlpGap);
        let cells = [
            right_bordered(&format_max(match_length, &[mdd_length])),
            right_bordered(&format_min(match_runtime, &[mdd_runtime])),
            right_bordered(&format_min_exact(match_gap, &[mdd_gap])),
            right_bordered(&format_max(mdd_length, &[match_length])),
            right_bordered(&format_min(mdd_runtime, &[match_runtime])),
            format!(
                "\\multicolumn{{1}}{{r}}{{{}}}",
                format_min_exact(mdd_gap, &[match_gap])
            ),
        ];
        table_row(&labeled.secondary_label, &cells)
    }
}
