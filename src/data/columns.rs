//! Static-column and unit-prefix tables
//!
//! Columns named here never receive a period code: they summarize across
//! periods ("Total", "% Change") or carry scale information ("$ in
//! millions"). Matching a *leading* keyword is a heuristic — a label that
//! merely contains "total" mid-phrase is not static, but an aggregation
//! column phrased unusually can slip through. Callers see a warning rather
//! than a silent reclassification.

use phf::phf_set;

/// Column labels that are summaries rather than reporting periods
pub static STATIC_COLUMNS: phf::Set<&'static str> = phf_set! {
    "total",
    "average",
    "high",
    "low",
    "period end",
    "% change",
    "change",
    "inflows",
    "outflows",
    "market impact",
};

/// Currency/scale prefixes that mark a unit row or a unit column
pub static UNIT_PREFIXES: &[&str] = &[
    "$ in millions",
    "$ in billions",
    "$ in thousands",
    "in millions",
    "in billions",
    "fee rate in bps",
];

/// Words that keep a trailing number attached ("Level 1", "Tier 2", "Type 3")
pub static PRESERVED_NUMBER_WORDS: phf::Set<&'static str> = phf_set! {
    "level",
    "tier",
    "type",
};

/// True if the label names a static (period-less) column
pub fn is_static_column(text: &str) -> bool {
    let t = text.trim().to_lowercase();
    if t.is_empty() {
        return false;
    }
    if STATIC_COLUMNS.contains(t.as_str()) {
        return true;
    }
    // Leading-keyword heuristic: "Total AUM" is static, "Subtotal" is not
    if let Some(first) = t.split_whitespace().next() {
        if STATIC_COLUMNS.contains(first) && first != t {
            return true;
        }
    }
    is_unit_text(&t)
}

/// True if the text starts with a recognized currency/scale prefix
pub fn is_unit_text(text: &str) -> bool {
    let t = text.trim().trim_start_matches('(').to_lowercase();
    UNIT_PREFIXES.iter().any(|p| t.starts_with(p))
}

/// True for words whose trailing number is part of the name, not a footnote
pub fn keeps_trailing_number(word: &str) -> bool {
    PRESERVED_NUMBER_WORDS.contains(word.to_lowercase().as_str())
}
