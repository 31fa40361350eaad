//! Header flattening
//!
//! Combines the classified header rows into a single normalized label per
//! column: the resolved period code plus any category text, with duplicate
//! words collapsed and trailing footnote markers stripped. Column 0 is the
//! row-label column and never receives a period label.

use serde::Serialize;

use crate::core::period::code::PeriodCode;
use crate::core::period::resolve::assemble;
use crate::data::columns::keeps_trailing_number;
use crate::data::phrases::looks_like_date;
use crate::utils::text::collapse_duplicate_words;

use super::classify::Classification;
use super::context::ColumnContext;

/// One flattened output column
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedColumn {
    pub column_index: usize,
    /// Canonical period for date columns; `None` for static/label columns
    pub period_code: Option<PeriodCode>,
    pub category: Option<String>,
    /// What downstream consumers see; never empty for a column with data
    pub display_label: String,
    pub is_static: bool,
}

impl NormalizedColumn {
    /// True when the column saw date signals that could not be resolved
    pub fn is_unresolved(&self) -> bool {
        matches!(self.period_code, Some(PeriodCode::Unresolved(_)))
    }
}

/// Flatten classified header rows into one normalized label per column
pub fn flatten(
    classification: &Classification,
    contexts: &[ColumnContext],
) -> Vec<NormalizedColumn> {
    let multi_header = classification.header_count() >= 3;

    contexts
        .iter()
        .map(|ctx| {
            if ctx.column == 0 {
                flatten_label_column(ctx, multi_header)
            } else {
                flatten_data_column(ctx)
            }
        })
        .collect()
}

/// Column 0: category/unit text only, no period code
fn flatten_label_column(ctx: &ColumnContext, multi_header: bool) -> NormalizedColumn {
    let mut label = ctx.category.clone().unwrap_or_default();
    if label.is_empty() {
        // With stacked headers the unit row labels the row-label column
        // ("$ in millions"); with fewer rows fall back to any header text.
        if multi_header {
            label = ctx.unit.clone().unwrap_or_default();
        }
        if label.is_empty() {
            label = ctx.unit.clone().unwrap_or_else(|| ctx.raw_label());
        }
    }
    let label = finalize_label(&label, 0);

    NormalizedColumn {
        column_index: 0,
        period_code: None,
        category: ctx.category.clone(),
        display_label: label,
        is_static: true,
    }
}

/// Data columns: period code plus category, deduplicated
fn flatten_data_column(ctx: &ColumnContext) -> NormalizedColumn {
    let period = assemble(ctx);

    let category = ctx
        .category
        .as_deref()
        .filter(|c| !looks_like_date(c))
        .map(str::to_string);

    let mut label = String::new();
    if let Some(code) = &period {
        label.push_str(&code.to_string());
    }
    if let Some(cat) = &category {
        let period_display = period.as_ref().map(|c| c.to_string()).unwrap_or_default();
        // Skip a category the period display already contains
        // (prevents "Q3-2025 Q3-2025")
        if !period_display.to_lowercase().contains(&cat.to_lowercase()) {
            if !label.is_empty() {
                label.push(' ');
            }
            label.push_str(cat);
        }
    }
    if label.is_empty() {
        label = ctx.raw_label();
    }
    let label = finalize_label(&label, ctx.column);

    NormalizedColumn {
        column_index: ctx.column,
        period_code: period,
        category,
        display_label: label,
        is_static: ctx.is_static,
    }
}

/// Word dedup, footnote stripping, and the never-empty guarantee
fn finalize_label(label: &str, column: usize) -> String {
    let collapsed = collapse_duplicate_words(label);
    let stripped = strip_footnote_marker(&collapsed);
    if stripped.is_empty() {
        format!("Column {}", column)
    } else {
        stripped
    }
}

/// Remove one trailing bare-number footnote marker
///
/// "Revenues 1" → "Revenues", but numeric idioms survive: "Level 1",
/// "Tier 2", "Type 3". Four-digit trailers are years, not footnotes.
fn strip_footnote_marker(label: &str) -> String {
    let words: Vec<&str> = label.split_whitespace().collect();
    if words.len() < 2 {
        return label.to_string();
    }
    let last = words[words.len() - 1];
    let bare_number = (1..=2).contains(&last.len()) && last.chars().all(|c| c.is_ascii_digit());
    if bare_number && !keeps_trailing_number(words[words.len() - 2]) {
        return words[..words.len() - 1].join(" ");
    }
    label.to_string()
}
