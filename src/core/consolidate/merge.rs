//! Consolidation: merging matched tables into one time-ordered table
//!
//! The merge is an outer join on row label across every input block's
//! first column: a label present in only one period still appears, with
//! "N/A" rendered for the periods that lack it. Cell-count conservation is
//! checked and any imbalance is reported on the validation block, never
//! silently swallowed.

use indexmap::{IndexMap, IndexSet};

use crate::core::normalize::TableBlock;
use crate::core::period::code::PeriodCode;
use crate::utils::diagnostics::{CellCounts, Validation};

/// Placeholder rendered for (row, period) combinations with no data
pub const MISSING: &str = "N/A";

/// Row-key prefix for periods that never parsed to a canonical code
pub const UNKNOWN_PREFIX: &str = "Unknown-";

/// Options for consolidation
#[derive(Debug, Clone, Default)]
pub struct ConsolidateOptions {
    /// Swap axes: one row per period, one column per metric
    /// Default: false
    pub transpose: bool,
}

impl ConsolidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transposed() -> Self {
        Self { transpose: true }
    }
}

/// The merged, validated output table
#[derive(Debug, Clone)]
pub struct ConsolidatedTable {
    pub title: String,
    /// Every period that contributed a column, chronologically sorted
    pub periods: Vec<PeriodCode>,
    /// Row keys in output order
    pub row_keys: Vec<String>,
    /// Column keys in output order
    pub column_keys: Vec<String>,
    /// (row key, column key) → cell text; missing combinations are absent
    pub data: IndexMap<(String, String), String>,
    pub validation: Validation,
}

impl ConsolidatedTable {
    /// Cell text, or "N/A" for a combination no input table supplied
    pub fn cell_or_missing(&self, row_key: &str, column_key: &str) -> &str {
        self.data
            .get(&(row_key.to_string(), column_key.to_string()))
            .map(String::as_str)
            .unwrap_or(MISSING)
    }
}

/// Merge blocks on row label, producing one combined table
pub fn consolidate(blocks: &[TableBlock], options: &ConsolidateOptions) -> ConsolidatedTable {
    let title = blocks
        .iter()
        .find_map(|b| b.title())
        .unwrap_or_default()
        .to_string();

    let mut row_keys: IndexSet<String> = IndexSet::new();
    let mut column_keys: IndexSet<String> = IndexSet::new();
    let mut periods: IndexSet<PeriodCode> = IndexSet::new();
    let mut data: IndexMap<(String, String), String> = IndexMap::new();

    let mut counts = CellCounts::default();
    let mut validation = Validation::valid(CellCounts::default());

    for block in blocks {
        counts.input += block.data_cell_count();

        for (row_idx, label) in block.row_labels.iter().enumerate() {
            let row_key = label.clone();
            row_keys.insert(row_key.clone());

            for column in block.columns.iter().skip(1) {
                let value = block.cell(row_idx, column.column_index);
                if value.is_empty() {
                    continue;
                }

                let column_key = column_key_for(column.period_code.as_ref(), column);
                if let Some(code) = &column.period_code {
                    periods.insert(code.clone());
                }
                column_keys.insert(column_key.clone());

                let key = (row_key.clone(), column_key);
                match data.get(&key) {
                    None => {
                        data.insert(key, value.to_string());
                    }
                    Some(existing) if existing == value => {
                        // Same fact reported by two overlapping filings
                        counts.duplicates += 1;
                    }
                    Some(existing) => {
                        validation.warn(format!(
                            "conflicting values for ({}, {}): kept \"{}\", dropped \"{}\"",
                            key.0, key.1, existing, value
                        ));
                    }
                }
            }
        }
    }

    let mut periods: Vec<PeriodCode> = periods.into_iter().collect();
    periods.sort();

    let mut table = ConsolidatedTable {
        title,
        periods,
        row_keys: row_keys.into_iter().collect(),
        column_keys: column_keys.into_iter().collect(),
        data,
        validation,
    };

    if options.transpose {
        transpose(&mut table);
    }

    counts.output = table.data.len();
    table.validation.counts = counts;
    table.validation.check_conservation();
    table
}

/// Column key: the period code, or "{metric} ({period})" when a category
/// names the column, or the display label for period-less columns
fn column_key_for(
    period: Option<&PeriodCode>,
    column: &crate::core::normalize::NormalizedColumn,
) -> String {
    match period {
        Some(code) => {
            let period_str = code.to_string();
            match &column.category {
                Some(cat) if !period_str.to_lowercase().contains(&cat.to_lowercase()) => {
                    format!("{} ({})", cat, period_str)
                }
                _ => period_str,
            }
        }
        None => column.display_label.clone(),
    }
}

/// Swap axes in place: periods become rows, metrics become columns
///
/// Period rows are ordered chronologically; keys that never parsed sort
/// last under an "Unknown-" marker rather than being dropped.
fn transpose(table: &mut ConsolidatedTable) {
    let mut swapped: IndexMap<(String, String), String> = IndexMap::new();
    for ((row, col), value) in table.data.drain(..) {
        swapped.insert((transposed_row_key(&col), row), value);
    }

    let mut new_rows: Vec<String> = table
        .column_keys
        .iter()
        .map(|c| transposed_row_key(c))
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect();
    new_rows.sort_by(|a, b| {
        let pa = PeriodCode::parse_canonical(a);
        let pb = PeriodCode::parse_canonical(b);
        match (pa, pb) {
            (Some(pa), Some(pb)) => pa.cmp(&pb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    });

    let new_columns = std::mem::take(&mut table.row_keys);
    table.row_keys = new_rows;
    table.column_keys = new_columns;
    table.data = swapped;
}

/// Row key for a transposed column: canonical codes stay as-is, anything
/// unparseable is tagged
fn transposed_row_key(column_key: &str) -> String {
    if PeriodCode::parse_canonical(column_key).is_some() {
        column_key.to_string()
    } else {
        format!("{}{}", UNKNOWN_PREFIX, column_key)
    }
}
