//! Grid normalization pipeline
//!
//! Turns a raw [`Grid`] into one or more [`TableBlock`]s: header rows are
//! classified, per-column contexts accumulate period signals, labels are
//! flattened, and stacked sub-tables are split into independent blocks.
//! The pipeline never fails on malformed input; degraded results carry
//! warnings instead.

pub mod classify;
pub mod context;
pub mod flatten;
pub mod split;

use serde::Serialize;

use crate::core::grid::{Grid, Provenance};
use crate::utils::error::EngineWarning;

pub use classify::{classify, classify_with, Classification, RowClassification, RowKind};
pub use context::{build_contexts, ColumnContext};
pub use flatten::{flatten, NormalizedColumn};
pub use split::split_ranges;

// =============================================================================
// Normalization Options
// =============================================================================

/// Options for grid normalization
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Detect embedded headers and split stacked sub-tables
    /// Default: true
    pub split_blocks: bool,

    /// Keep row 0 as a header when no row carries a positive header signal
    /// Default: true
    pub assume_header_when_ambiguous: bool,

    /// Fill ratio below which a sparse row reads as a spanning label
    /// Default: 0.30
    pub spanning_fill_max: f64,

    /// Fill ratio below which a row with a period phrase reads as spanning
    /// Default: 0.50
    pub spanning_phrase_fill_max: f64,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            split_blocks: true,
            assume_header_when_ambiguous: true,
            spanning_fill_max: 0.30,
            spanning_phrase_fill_max: 0.50,
        }
    }
}

impl NormalizeOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Best-effort recovery on ambiguous input (the default behavior)
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Require positive header signals; ambiguous grids become headerless
    /// data with placeholder column labels instead of guessing
    pub fn strict() -> Self {
        Self {
            assume_header_when_ambiguous: false,
            ..Self::default()
        }
    }

    /// Treat the grid as one block even if embedded headers appear
    pub fn single_block() -> Self {
        Self {
            split_blocks: false,
            ..Self::default()
        }
    }
}

// =============================================================================
// Output Types
// =============================================================================

/// One logical table extracted from a grid
#[derive(Debug, Clone, Serialize)]
pub struct TableBlock {
    pub provenance: Provenance,
    /// Row range `[row_start, row_end)` within the source grid
    pub row_start: usize,
    pub row_end: usize,
    /// True for the second and later sub-tables of a stacked grid
    pub is_continuation: bool,
    /// One entry per column, label column included
    pub columns: Vec<NormalizedColumn>,
    /// First-column text of each data row
    pub row_labels: Vec<String>,
    /// Data rows, one cell per column
    pub rows: Vec<Vec<String>>,
}

impl TableBlock {
    pub fn title(&self) -> Option<&str> {
        self.provenance.title.as_deref()
    }

    /// Display labels in column order
    pub fn header_labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.display_label.as_str()).collect()
    }

    /// Non-empty data cells outside the label column
    pub fn data_cell_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().skip(1).filter(|v| !v.is_empty()).count())
            .sum()
    }

    /// Cell text at (data row, column), or "" when out of range
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Normalization output with warnings
#[derive(Debug, Clone)]
pub struct NormalizeOutput {
    pub blocks: Vec<TableBlock>,
    pub warnings: Vec<EngineWarning>,
}

impl NormalizeOutput {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Normalize a grid with default options
pub fn normalize_grid(grid: &Grid) -> NormalizeOutput {
    normalize_grid_with_options(grid, &NormalizeOptions::default())
}

/// Normalize a grid: classify, resolve, flatten, and split
pub fn normalize_grid_with_options(grid: &Grid, options: &NormalizeOptions) -> NormalizeOutput {
    let mut warnings = Vec::new();

    if grid.is_empty() {
        warnings.push(EngineWarning::new("empty grid, nothing to normalize"));
        return NormalizeOutput {
            blocks: Vec::new(),
            warnings,
        };
    }

    let ranges = if options.split_blocks {
        split_ranges(grid, options)
    } else {
        vec![(0, grid.n_rows())]
    };

    let mut blocks = Vec::with_capacity(ranges.len());
    for (index, &(start, end)) in ranges.iter().enumerate() {
        let sub = grid.slice_rows(start, end);
        let block = normalize_block(&sub, options, start, end, index > 0, &mut warnings);
        blocks.push(block);
    }

    NormalizeOutput { blocks, warnings }
}

/// Run classification/resolution/flattening over one block's rows
fn normalize_block(
    sub: &Grid,
    options: &NormalizeOptions,
    row_start: usize,
    row_end: usize,
    is_continuation: bool,
    warnings: &mut Vec<EngineWarning>,
) -> TableBlock {
    let classification = classify_with(sub, options);

    if classification.defaulted {
        if options.assume_header_when_ambiguous {
            warnings.push(
                EngineWarning::new("no header signal detected")
                    .at_row(row_start)
                    .with_suggestion("row 0 was kept as the header"),
            );
        } else {
            warnings.push(
                EngineWarning::new("no header signal detected")
                    .at_row(row_start)
                    .with_suggestion("all rows were kept as data"),
            );
        }
    }

    let contexts = build_contexts(sub, &classification);
    let columns = if classification.rows.is_empty() {
        // Headerless strict-mode block: placeholder labels
        (0..sub.n_cols())
            .map(|col| NormalizedColumn {
                column_index: col,
                period_code: None,
                category: None,
                display_label: format!("Column {}", col),
                is_static: col == 0,
            })
            .collect()
    } else {
        flatten(&classification, &contexts)
    };

    for col in &columns {
        if col.is_unresolved() {
            warnings.push(
                EngineWarning::new(format!(
                    "column could not be mapped to a period: \"{}\"",
                    col.display_label
                ))
                .at_column(col.column_index)
                .with_suggestion("the raw header text was kept as the label"),
            );
        }
    }

    let data_rows: Vec<Vec<String>> = (classification.data_start..sub.n_rows())
        .map(|r| {
            sub.row(r)
                .iter()
                .map(|cell| cell.as_str().to_string())
                .collect()
        })
        .collect();
    let row_labels = data_rows
        .iter()
        .map(|row| row.first().cloned().unwrap_or_default())
        .collect();

    // Later sub-tables never inherit the first block's document metadata
    let provenance = if is_continuation {
        Provenance {
            source_id: sub.provenance.source_id.clone(),
            page: None,
            title: None,
        }
    } else {
        sub.provenance.clone()
    };

    TableBlock {
        provenance,
        row_start,
        row_end,
        is_continuation,
        columns,
        row_labels,
        rows: data_rows,
    }
}
