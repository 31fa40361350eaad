//! Header-row classification and the header/data boundary
//!
//! Scans a grid top-down, tagging each leading row until the first data row
//! is found. The boundary is monotonic: once data starts, no later row is
//! reclassified as header within the same block (stacked sub-tables are the
//! splitter's job, not the classifier's).

use crate::core::grid::Grid;
use crate::core::period::code::PeriodCode;
use crate::data::columns::is_unit_text;
use crate::data::phrases::{contains_period_phrase, is_year_cell, looks_like_date};

use super::NormalizeOptions;

/// Raw dates, bare years, and already-canonical codes all read as dates
pub(crate) fn reads_as_date(text: &str) -> bool {
    looks_like_date(text) || PeriodCode::parse_canonical(text).is_some()
}

/// What a header row contributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// One label visually centered over several data columns
    Spanning,
    /// "Three/Six/Nine Months Ended", "Year Ended", "Fiscal Year Ended"
    PeriodType,
    /// Bare years or month-day dates
    DateOrYear,
    /// Descriptive grouping text that is neither a date nor a unit
    Category,
    /// Currency/scale prefix row ("$ in millions")
    Unit,
    /// First row of table data; ends classification
    Data,
}

/// Tag for one classified row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowClassification {
    pub row: usize,
    pub kind: RowKind,
}

/// Result of scanning a grid's leading rows
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// One entry per header row, in grid order
    pub rows: Vec<RowClassification>,
    /// Index of the first data row; equals `n_rows` when no data was found
    pub data_start: usize,
    /// True when row 0 was kept as a header only by the fallback rule
    pub defaulted: bool,
}

impl Classification {
    pub fn header_count(&self) -> usize {
        self.rows.len()
    }

    pub fn kind_of(&self, row: usize) -> Option<RowKind> {
        self.rows
            .iter()
            .find(|rc| rc.row == row)
            .map(|rc| rc.kind)
    }
}

/// Classify a grid's leading rows with default options
pub fn classify(grid: &Grid) -> Classification {
    classify_with(grid, &NormalizeOptions::default())
}

/// Classify a grid's leading rows and locate the data boundary
///
/// Never fails: an empty grid yields an empty classification with
/// `data_start = 0`. When no row carries a positive header signal, row 0 is
/// kept as a header by default; strict options disable that fallback and
/// the whole grid is treated as data instead.
pub fn classify_with(grid: &Grid, options: &NormalizeOptions) -> Classification {
    let mut result = Classification::default();
    if grid.is_empty() {
        return result;
    }

    let mut header_seen = false;
    let mut data_start = grid.n_rows();

    for row in 0..grid.n_rows() {
        match classify_row(grid, row, header_seen, options) {
            RowKind::Data => {
                data_start = row;
                break;
            }
            kind => {
                if kind == RowKind::Category
                    && row == 0
                    && !row_has_header_signal(grid, row, options)
                {
                    result.defaulted = true;
                }
                result.rows.push(RowClassification { row, kind });
                header_seen = true;
            }
        }
    }

    if result.defaulted && !options.assume_header_when_ambiguous {
        return Classification {
            rows: Vec::new(),
            data_start: 0,
            defaulted: true,
        };
    }

    result.data_start = data_start;
    result
}

/// Classify a single row given whether any header row precedes it
fn classify_row(grid: &Grid, row: usize, header_seen: bool, options: &NormalizeOptions) -> RowKind {
    let first = grid.cell_text(row, 0);
    let fill = grid.row_fill_ratio(row);
    let non_empty: Vec<&str> = grid
        .row(row)
        .iter()
        .filter(|c| !c.is_empty())
        .map(|c| c.as_str())
        .collect();

    // Unit rows are sparse too, so they are tested before the spanning rule
    if is_unit_text(first) {
        return RowKind::Unit;
    }

    let has_phrase = non_empty.iter().any(|t| contains_period_phrase(t));
    if fill < options.spanning_fill_max || (has_phrase && fill < options.spanning_phrase_fill_max)
    {
        return RowKind::Spanning;
    }

    if has_phrase {
        return RowKind::PeriodType;
    }

    if is_year_cell(first) {
        return RowKind::DateOrYear;
    }
    if !non_empty.is_empty() {
        let date_like = non_empty.iter().filter(|t| reads_as_date(t)).count();
        if date_like * 2 > non_empty.len() {
            return RowKind::DateOrYear;
        }
    }

    // The boundary rule: a previously seen header plus a descriptive first
    // cell means table data starts here.
    if header_seen && !first.is_empty() && !reads_as_date(first) {
        return RowKind::Data;
    }

    RowKind::Category
}

/// True if the row carries any positive header signal on its own
fn row_has_header_signal(grid: &Grid, row: usize, options: &NormalizeOptions) -> bool {
    let fill = grid.row_fill_ratio(row);
    if fill < options.spanning_fill_max {
        return true;
    }
    grid.row(row)
        .iter()
        .filter(|c| !c.is_empty())
        .any(|c| reads_as_date(c.as_str()) || contains_period_phrase(c.as_str()))
}
