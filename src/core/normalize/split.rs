//! Stacked sub-table splitting
//!
//! Financial filings stack logically separate tables in one physical grid:
//! a second header appears below the first table's data rows and starts a
//! new column layout. The splitter finds those embedded headers and
//! partitions the grid into independent row ranges; each range is then
//! classified and flattened on its own, because a later sub-table's header
//! never shares column semantics with the first.

use crate::core::grid::Grid;

use super::classify::{classify_with, reads_as_date};
use super::NormalizeOptions;

/// Partition a grid into block row ranges `[start, end)`
///
/// The first range always starts at row 0. A grid without embedded headers
/// yields exactly one range covering every row.
pub fn split_ranges(grid: &Grid, options: &NormalizeOptions) -> Vec<(usize, usize)> {
    let n = grid.n_rows();
    if n == 0 {
        return Vec::new();
    }

    let mut ranges = Vec::new();
    let mut start = 0;
    // First data row of the block currently being scanned, absolute index
    let mut data_row = classify_with(grid, options).data_start;

    loop {
        let boundary = ((data_row + 1).max(start + 1)..n).find(|&r| is_embedded_header(grid, r));

        match boundary {
            Some(b) => {
                ranges.push((start, b));
                start = b;
                let sub = grid.slice_rows(b, n);
                let sub_data = classify_with(&sub, options).data_start;
                // Ensure forward progress even if the new block has no
                // recognizable data rows
                data_row = b + sub_data.max(1);
            }
            None => {
                ranges.push((start, n));
                break;
            }
        }
    }

    ranges
}

/// True if this row opens a new sub-table below existing data
///
/// A row qualifies when (i) its first cell is empty and every other
/// non-empty cell reads as a date/year, (ii) its first cell itself matches
/// a period or year pattern, or (iii) every non-empty cell in the row reads
/// as a header rather than a value.
fn is_embedded_header(grid: &Grid, row: usize) -> bool {
    let cells = grid.row(row);
    let first = grid.cell_text(row, 0);
    let non_empty: Vec<&str> = cells
        .iter()
        .filter(|c| !c.is_empty())
        .map(|c| c.as_str())
        .collect();
    if non_empty.is_empty() {
        return false;
    }

    let rest: Vec<&str> = cells
        .iter()
        .skip(1)
        .filter(|c| !c.is_empty())
        .map(|c| c.as_str())
        .collect();

    if first.is_empty() {
        return !rest.is_empty() && rest.iter().all(|t| reads_as_date(t));
    }

    if reads_as_date(first) {
        return true;
    }

    non_empty.iter().all(|t| reads_as_date(t))
}
