//! The rectangular cell grid consumed by the normalization pipeline
//!
//! A [`Grid`] is the immutable input contract with the extraction layer:
//! rows of optional text cells plus minimal provenance. Construction pads
//! every row to the grid's maximum column count so downstream stages can
//! index without bounds branching.

use serde::Serialize;

/// A single cell: optional text plus its position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub text: Option<String>,
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(text: Option<String>, row: usize, col: usize) -> Self {
        let text = text.and_then(|t| {
            let trimmed = t.trim();
            if trimmed.is_empty() {
                None
            } else if trimmed.len() == t.len() {
                Some(t)
            } else {
                Some(trimmed.to_string())
            }
        });
        Cell { text, row, col }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none()
    }

    /// Cell text, or "" for an empty cell
    pub fn as_str(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Where a grid came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Provenance {
    /// Source document identifier (filing name, file stem)
    pub source_id: String,
    /// Page or sheet reference within the source
    pub page: Option<String>,
    /// Table title supplied by the extractor, when known
    pub title: Option<String>,
}

impl Provenance {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            page: None,
            title: None,
        }
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Rows × columns of text cells, padded to uniform width
#[derive(Debug, Clone, Serialize)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    pub provenance: Provenance,
}

impl Grid {
    /// Build a grid from raw optional strings, padding ragged rows
    pub fn from_rows(raw: Vec<Vec<Option<String>>>, provenance: Provenance) -> Self {
        let width = raw.iter().map(|r| r.len()).max().unwrap_or(0);
        let rows = raw
            .into_iter()
            .enumerate()
            .map(|(r, mut row)| {
                row.resize(width, None);
                row.into_iter()
                    .enumerate()
                    .map(|(c, text)| Cell::new(text, r, c))
                    .collect()
            })
            .collect();
        Grid { rows, provenance }
    }

    /// Convenience constructor from plain strings; "" becomes an empty cell
    pub fn from_strings(raw: Vec<Vec<&str>>, provenance: Provenance) -> Self {
        let rows = raw
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|s| if s.is_empty() { None } else { Some(s.to_string()) })
                    .collect()
            })
            .collect();
        Self::from_rows(rows, provenance)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0 || self.n_cols() == 0
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Cell text at (row, col), or "" when out of range or empty
    pub fn cell_text(&self, row: usize, col: usize) -> &str {
        self.cell(row, col).map(|c| c.as_str()).unwrap_or("")
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        self.rows.get(row).map(|r| r.as_slice()).unwrap_or(&[])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Fraction of non-empty cells in a row, 0.0 for an out-of-range row
    pub fn row_fill_ratio(&self, row: usize) -> f64 {
        let cells = self.row(row);
        if cells.is_empty() {
            return 0.0;
        }
        let filled = cells.iter().filter(|c| !c.is_empty()).count();
        filled as f64 / cells.len() as f64
    }

    /// Count of non-empty cells in a row
    pub fn row_filled_count(&self, row: usize) -> usize {
        self.row(row).iter().filter(|c| !c.is_empty()).count()
    }

    /// New grid holding rows [start, end), positions re-based to the sub-grid
    pub fn slice_rows(&self, start: usize, end: usize) -> Grid {
        let end = end.min(self.n_rows());
        let rows = self.rows[start.min(end)..end]
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .map(|cell| Cell {
                        text: cell.text.clone(),
                        row: r,
                        col: cell.col,
                    })
                    .collect()
            })
            .collect();
        Grid {
            rows,
            provenance: self.provenance.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged_rows_padded() {
        let grid = Grid::from_rows(
            vec![
                vec![Some("a".into()), Some("b".into()), Some("c".into())],
                vec![Some("d".into())],
            ],
            Provenance::new("test"),
        );
        assert_eq!(grid.n_cols(), 3);
        assert_eq!(grid.cell_text(1, 0), "d");
        assert!(grid.cell(1, 2).unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_cells_are_empty() {
        let grid = Grid::from_rows(
            vec![vec![Some("  ".into()), Some(" x ".into())]],
            Provenance::new("test"),
        );
        assert!(grid.cell(0, 0).unwrap().is_empty());
        assert_eq!(grid.cell_text(0, 1), "x");
    }

    #[test]
    fn test_fill_ratio() {
        let grid = Grid::from_strings(
            vec![vec!["At June 30, 2024", "", "", ""]],
            Provenance::new("test"),
        );
        assert_eq!(grid.row_fill_ratio(0), 0.25);
        assert_eq!(grid.row_fill_ratio(5), 0.0);
    }

    #[test]
    fn test_slice_rows_rebases_positions() {
        let grid = Grid::from_strings(
            vec![vec!["h"], vec!["a"], vec!["b"]],
            Provenance::new("test"),
        );
        let sub = grid.slice_rows(1, 3);
        assert_eq!(sub.n_rows(), 2);
        assert_eq!(sub.cell(0, 0).unwrap().row, 0);
        assert_eq!(sub.cell_text(0, 0), "a");
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::from_rows(vec![], Provenance::new("test"));
        assert!(grid.is_empty());
        assert_eq!(grid.cell_text(0, 0), "");
    }
}
