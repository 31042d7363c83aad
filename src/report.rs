use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::info;
use polars::prelude::*;

use crate::aggregation::{collect_records, records_to_dataframe, sort_records};
use crate::datastructures::{LabeledRow, TableConfig};
use crate::group_key::KeyExtractor;
use crate::latex_table::{layout, render_table, TableMeta};
use crate::merge::{merge_results, summary_rows};

/// Merges every source of a table and puts the rows into table order.
/// Columns a source does not provide stay missing in its rows.
pub fn build_rows(table: &TableConfig) -> Result<Vec<LabeledRow>> {
    let mut rows = Vec::new();
    for source in &table.sources {
        let merged = merge_results(source)?;
        rows.extend(summary_rows(&merged)?);
    }
    Ok(table.key_scheme.arrange(rows))
}

pub fn render_report(table: &TableConfig, rows: &[LabeledRow]) -> String {
    let meta = TableMeta {
        caption: &table.caption,
        label: &table.label,
        heading_property_1: &table.heading_property_1,
        heading_property_2: &table.heading_property_2,
    };
    render_table(layout(table.layout).as_ref(), &meta, rows)
}

/// Writes to a sibling temporary file first, so the target is either the old
/// or the complete new report.
pub fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid output path {path:?}"))?;
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));
    fs::write(&tmp_path, content)
        .with_context(|| format!("Failed to write {tmp_path:?}"))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to move report to {path:?}"))?;
    Ok(())
}

/// Writes the sorted per-run table of all sources as csv, the input of the
/// box plots.
pub fn export_runs(table: &TableConfig, path: &Path) -> Result<()> {
    let mut records = Vec::new();
    for source in &table.sources {
        let extractor = KeyExtractor::new(&source.pattern)?
            .with_key_remap(source.remap.as_ref());
        records.extend(collect_records(
            &source.results_dir,
            &source.file_glob,
            &extractor,
        )?);
    }
    sort_records(&mut records, |key| table.key_scheme.sort_key(key));
    let mut df = records_to_dataframe(&records)?;
    let mut file = fs::File::create(path)
        .with_context(|| format!("Failed to create {path:?}"))?;
    CsvWriter::new(&mut file).has_header(true).finish(&mut df)?;
    info!("Wrote {} runs to {:?}", df.height(), path);
    Ok(())
}

/// Builds, renders and writes one table.
pub fn create_table(table: &TableConfig, out_dir: &Path) -> Result<()> {
    let rows = build_rows(table)?;
    let out = out_dir.join(&table.out);
    write_atomically(&out, &render_report(table, &rows))?;
    info!(
        "Wrote table {} with {} rows to {:?}",
        table.name,
        rows.len(),
        out
    );
    if let Some(runs_out) = &table.runs_out {
        export_runs(table, &out_dir.join(runs_out))?;
    }
    Ok(())
}
