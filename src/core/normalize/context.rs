//! Per-column header state
//!
//! While the classifier walks header rows, each column accumulates a
//! [`ColumnContext`]: the spanning label above it, the period phrase, the
//! month/day/year fragments, category and unit text. Contexts are built once
//! per column per block and discarded after flattening.
//!
//! Spanning propagation is re-evaluated per header row: a label carries
//! right across empty cells until a different non-empty value appears, so
//! two period groups ("Three Months Ended" next to "Six Months Ended") in
//! one row stay independent.

use crate::core::grid::Grid;
use crate::core::period::code::PeriodCode;
use crate::core::period::resolve::resolve_cell;
use crate::data::phrases::{DateFragment, PeriodPhrase};

use super::classify::{Classification, RowKind};

/// Accumulated header state for one column
#[derive(Debug, Clone, Default)]
pub struct ColumnContext {
    pub column: usize,
    /// Spanning label currently covering this column
    pub spanning: Option<String>,
    /// Period phrase contributed by any header row
    pub phrase: Option<PeriodPhrase>,
    /// An already-canonical code found verbatim in a header cell
    pub preparsed: Option<PeriodCode>,
    /// Verbatim fiscal-quarter notation, e.g. (3, 2024) for "3Q 2024"
    pub fiscal: Option<(u8, i32)>,
    /// Both halves of a dual point-in-time header
    pub dual: Option<(DateFragment, DateFragment)>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub year: Option<i32>,
    /// Descriptive text that is neither a date nor a unit
    pub category: Option<String>,
    /// Currency/scale text ("$ in millions")
    pub unit: Option<String>,
    /// True once any date/period signal reached this column
    pub is_date_column: bool,
    /// Static columns (Total, % Change, units) never get a period code
    pub is_static: bool,
    /// Every non-empty header text seen, for fallback labels
    pub raw: Vec<String>,
}

impl ColumnContext {
    pub fn new(column: usize) -> Self {
        ColumnContext {
            column,
            ..Default::default()
        }
    }

    /// All raw header text joined, the label of last resort
    pub fn raw_label(&self) -> String {
        self.raw.join(" ")
    }
}

/// Carry non-empty values right across empty cells within one row
///
/// Returns one entry per column: the cell's own text, or the nearest
/// non-empty text to its left.
pub fn propagate_row<'a>(grid: &'a Grid, row: usize) -> Vec<Option<&'a str>> {
    let mut carried: Option<&str> = None;
    grid.row(row)
        .iter()
        .map(|cell| {
            if !cell.is_empty() {
                carried = Some(cell.as_str());
            }
            carried
        })
        .collect()
}

/// Build one context per column from the classified header rows
pub fn build_contexts(grid: &Grid, classification: &Classification) -> Vec<ColumnContext> {
    let mut contexts: Vec<ColumnContext> =
        (0..grid.n_cols()).map(ColumnContext::new).collect();

    for rc in &classification.rows {
        match rc.kind {
            RowKind::Unit => {
                // Unit text attaches where it appears; it does not span
                for (col, ctx) in contexts.iter_mut().enumerate() {
                    let text = grid.cell_text(rc.row, col);
                    if !text.is_empty() && ctx.unit.is_none() {
                        ctx.unit = Some(text.to_string());
                    }
                }
            }
            RowKind::Data => {}
            _ => {
                let propagated = propagate_row(grid, rc.row);
                for (col, ctx) in contexts.iter_mut().enumerate() {
                    if let Some(Some(text)) = propagated.get(col) {
                        resolve_cell(text, ctx);
                    }
                }
            }
        }
    }

    contexts
}
