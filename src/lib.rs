//! # fintab
//!
//! Header normalization and time-series consolidation for financial tables.
//!
//! ## Features
//!
//! - **Header Reconstruction**: classifies multi-row headers (spanning
//!   labels, period phrases, dates, units) with no reliable markup
//! - **Canonical Periods**: "Three Months Ended March 31, 2024" and
//!   pre-normalized "Q1-QTD-2024" resolve to the same code
//! - **Flattening**: one normalized label per column, duplicate words
//!   collapsed, footnote markers stripped
//! - **Stacked Tables**: embedded secondary headers split a grid into
//!   independent sub-tables
//! - **Consolidation**: same-titled tables merge across reporting periods
//!   with cell-count conservation checks
//! - **Degraded, Never Silent**: malformed input yields best-effort output
//!   plus enumerable warnings, not exceptions
//!
//! ## Usage Examples
//!
//! ### Normalizing a markdown table
//!
//! ```rust
//! use fintab::normalize_markdown;
//!
//! let output = normalize_markdown(
//!     "| | Three Months Ended |\n| | March 31, |\n| Revenue | 2024 | 2023 |\n| Net sales | 10 | 20 |",
//! );
//! let labels = output.blocks[0].header_labels();
//! assert_eq!(labels, vec!["Revenue", "Q1-QTD-2024", "Q1-QTD-2023"]);
//! ```
//!
//! ### Consolidating across periods
//!
//! ```rust
//! use fintab::{consolidate_blocks, normalize_markdown};
//!
//! let q1 = normalize_markdown("| | Three Months Ended March 31, 2024 |\n| Inflows | 100 |");
//! let q2 = normalize_markdown("| | Three Months Ended June 30, 2024 |\n| Inflows | 120 |");
//! let mut blocks = q1.blocks;
//! blocks.extend(q2.blocks);
//!
//! let table = consolidate_blocks(&blocks, false);
//! assert!(table.validation.is_valid());
//! ```

/// Core processing engines
pub mod core;

/// Data layer - static mappings and pattern tables
pub mod data;

/// Feature modules - input and output surfaces
pub mod features;

/// Utility modules
pub mod utils;

// Re-export core types and functions
pub use core::grid::{Cell, Grid, Provenance};
pub use core::normalize::{
    classify, classify_with, normalize_grid, normalize_grid_with_options, Classification,
    ColumnContext, NormalizeOptions, NormalizeOutput, NormalizedColumn, RowClassification,
    RowKind, TableBlock,
};
pub use core::period::{assemble, resolve_cell, PeriodCode};
pub use core::consolidate::{
    find_matching, ConsolidateOptions, ConsolidatedTable, MatchOptions, PeriodTable,
};

// Re-export data modules
pub use data::columns;
pub use data::months;
pub use data::phrases;

// Re-export feature modules
pub use features::export;
pub use features::markdown;

// Re-export utilities
pub use utils::diagnostics;
pub use utils::diagnostics::{
    format_diagnostics, CheckResult, Diagnostic, DiagnosticLevel, Validation, ValidationStatus,
};
pub use utils::error::{EngineWarning, TableError, TableResult};

/// Normalize a markdown pipe table with default options
///
/// # Arguments
/// * `input` - markdown pipe-table text
///
/// # Returns
/// Normalized table blocks plus any warnings
pub fn normalize_markdown(input: &str) -> NormalizeOutput {
    let grid = markdown::parse_markdown_table(input, Provenance::new("markdown"));
    normalize_grid(&grid)
}

/// Normalize a markdown pipe table with custom options and provenance
pub fn normalize_markdown_with_options(
    input: &str,
    provenance: Provenance,
    options: &NormalizeOptions,
) -> NormalizeOutput {
    let grid = markdown::parse_markdown_table(input, provenance);
    normalize_grid_with_options(&grid, options)
}

/// Consolidate normalized blocks into one time-ordered table
pub fn consolidate_blocks(blocks: &[TableBlock], transpose: bool) -> ConsolidatedTable {
    core::consolidate::consolidate(blocks, &ConsolidateOptions { transpose })
}

/// Analyze a grid's structure without converting it
///
/// Reports how the classifier reads the grid: header rows found, where data
/// starts, columns that fail to resolve, and embedded sub-tables. Used by
/// the CLI's check mode.
pub fn check_grid(grid: &Grid) -> CheckResult {
    let mut result = CheckResult::new();

    if grid.is_empty() {
        result.add(Diagnostic::new(
            DiagnosticLevel::Error,
            "grid has no rows or columns",
        ));
        return result;
    }

    let output = normalize_grid(grid);

    if output.blocks.len() > 1 {
        result.add(Diagnostic::new(
            DiagnosticLevel::Info,
            format!("grid splits into {} sub-tables", output.blocks.len()),
        ));
    }

    for block in &output.blocks {
        let classification = classify(&grid.slice_rows(block.row_start, block.row_end));
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Info,
                format!(
                    "block at row {}: {} header row(s), data starts at row {}",
                    block.row_start,
                    classification.header_count(),
                    block.row_start + classification.data_start
                ),
            )
            .at_row(block.row_start),
        );
    }

    for warning in &output.warnings {
        let mut diag = Diagnostic::new(DiagnosticLevel::Warning, warning.message.clone());
        if let Some(row) = warning.row {
            diag = diag.at_row(row);
        }
        if let Some(suggestion) = &warning.suggestion {
            diag = diag.with_suggestion(suggestion.clone());
        }
        result.add(diag);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_markdown_basic() {
        let output = normalize_markdown(
            "| | At June 30, 2024 | |\n| --- | --- | --- |\n| Assets | 100 | 200 |",
        );
        assert_eq!(output.blocks.len(), 1);
        let labels = output.blocks[0].header_labels();
        assert_eq!(labels[1], "Q2-2024");
        assert_eq!(labels[2], "Q2-2024");
    }

    #[test]
    fn test_consolidate_blocks_transposed() {
        let q1 = normalize_markdown("| | Three Months Ended March 31, 2024 |\n| Inflows | 100 |");
        let q2 = normalize_markdown("| | Three Months Ended June 30, 2024 |\n| Inflows | 120 |");
        let mut blocks = q1.blocks;
        blocks.extend(q2.blocks);

        let table = consolidate_blocks(&blocks, true);
        assert_eq!(table.row_keys, vec!["Q1-QTD-2024", "Q2-QTD-2024"]);
        assert_eq!(table.column_keys, vec!["Inflows"]);
    }

    #[test]
    fn test_check_grid_reports_structure() {
        let grid = markdown::parse_markdown_table(
            "| | 2024 | 2023 |\n| Revenue | 10 | 20 |",
            Provenance::new("check"),
        );
        let result = check_grid(&grid);
        assert!(!result.is_empty());
        assert!(!result.has_errors());
    }

    #[test]
    fn test_check_grid_empty_is_error() {
        let grid = Grid::from_rows(vec![], Provenance::new("empty"));
        let result = check_grid(&grid);
        assert!(result.has_errors());
    }
}
