//! Export surfaces
//!
//! Three stable output forms for downstream consumers:
//! - delimited text (csv writer) for tabular tooling
//! - a row-major JSON mapping for spreadsheet writers, carrying the
//!   machine-readable validation block where one exists
//! - a plain-text form for the embedding layer: title line, header line,
//!   one blank separator line, then data lines — the separator keeps the
//!   data start offset stable for row-oriented scanners regardless of how
//!   many header rows the source grid had

use serde_json::{json, Value};

use crate::core::consolidate::merge::ConsolidatedTable;
use crate::core::normalize::TableBlock;
use crate::utils::error::{TableError, TableResult};

/// Render a block as delimited text, header first
pub fn block_to_delimited(block: &TableBlock, delimiter: u8) -> TableResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(Vec::new());

    writer
        .write_record(block.header_labels())
        .map_err(|e| TableError::internal(e.to_string()))?;
    for row in &block.rows {
        writer
            .write_record(row)
            .map_err(|e| TableError::internal(e.to_string()))?;
    }

    finish(writer)
}

/// Render a consolidated table as delimited text; missing cells are "N/A"
pub fn consolidated_to_delimited(
    table: &ConsolidatedTable,
    delimiter: u8,
) -> TableResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(Vec::new());

    let mut header = vec![table.title.as_str()];
    header.extend(table.column_keys.iter().map(String::as_str));
    writer
        .write_record(&header)
        .map_err(|e| TableError::internal(e.to_string()))?;

    for row_key in &table.row_keys {
        let mut record = vec![row_key.as_str()];
        record.extend(
            table
                .column_keys
                .iter()
                .map(|col| table.cell_or_missing(row_key, col)),
        );
        writer
            .write_record(&record)
            .map_err(|e| TableError::internal(e.to_string()))?;
    }

    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> TableResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| TableError::internal(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| TableError::internal(e.to_string()))
}

/// Row-major mapping of a block for spreadsheet writers
pub fn block_to_row_major(block: &TableBlock) -> Value {
    json!({
        "source": block.provenance.source_id,
        "page": block.provenance.page,
        "title": block.title(),
        "continuation": block.is_continuation,
        "columns": block.columns,
        "header": block.header_labels(),
        "rows": block.rows,
    })
}

/// Row-major mapping of a consolidated table, validation block included
pub fn consolidated_to_row_major(table: &ConsolidatedTable) -> Value {
    let rows: Vec<Value> = table
        .row_keys
        .iter()
        .map(|row_key| {
            let mut cells = vec![Value::String(row_key.clone())];
            cells.extend(
                table
                    .column_keys
                    .iter()
                    .map(|col| Value::String(table.cell_or_missing(row_key, col).to_string())),
            );
            Value::Array(cells)
        })
        .collect();

    json!({
        "title": table.title,
        "periods": table.periods,
        "header": table.column_keys,
        "rows": rows,
        "validation": table.validation,
    })
}

/// Plain-text form for the embedding layer
///
/// Line 0: title. Line 1: header. Line 2: blank. Lines 3+: data.
pub fn block_to_embedding_text(block: &TableBlock) -> String {
    let mut out = String::new();
    out.push_str(block.title().unwrap_or(""));
    out.push('\n');
    out.push_str(&block.header_labels().join(" | "));
    out.push_str("\n\n");
    for row in &block.rows {
        out.push_str(&row.join(" | "));
        out.push('\n');
    }
    out
}

/// Plain-text form of a consolidated table for the embedding layer
pub fn consolidated_to_embedding_text(table: &ConsolidatedTable) -> String {
    let mut out = String::new();
    out.push_str(&table.title);
    out.push('\n');
    out.push_str(&table.column_keys.join(" | "));
    out.push_str("\n\n");
    for row_key in &table.row_keys {
        let cells: Vec<&str> = std::iter::once(row_key.as_str())
            .chain(
                table
                    .column_keys
                    .iter()
                    .map(|col| table.cell_or_missing(row_key, col)),
            )
            .collect();
        out.push_str(&cells.join(" | "));
        out.push('\n');
    }
    out
}
