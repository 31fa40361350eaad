//! Month name tables and fiscal-quarter mapping
//!
//! Maps full month names and 3-letter abbreviations to `(month, quarter)`.
//! Lookups are case-insensitive via [`month_lookup`].

use phf::phf_map;

/// Month name → (month number 1-12, calendar quarter 1-4)
pub static MONTHS: phf::Map<&'static str, (u32, u8)> = phf_map! {
    "january" => (1, 1),
    "february" => (2, 1),
    "march" => (3, 1),
    "april" => (4, 2),
    "may" => (5, 2),
    "june" => (6, 2),
    "july" => (7, 3),
    "august" => (8, 3),
    "september" => (9, 3),
    "october" => (10, 4),
    "november" => (11, 4),
    "december" => (12, 4),

    // 3-letter abbreviations
    "jan" => (1, 1),
    "feb" => (2, 1),
    "mar" => (3, 1),
    "apr" => (4, 2),
    "jun" => (6, 2),
    "jul" => (7, 3),
    "aug" => (8, 3),
    "sep" => (9, 3),
    "oct" => (10, 4),
    "nov" => (11, 4),
    "dec" => (12, 4),
};

/// Look up a month token, tolerating case and a trailing period ("Sept.")
pub fn month_lookup(token: &str) -> Option<(u32, u8)> {
    let key = token.trim().trim_end_matches('.').to_lowercase();
    if let Some(&entry) = MONTHS.get(key.as_str()) {
        return Some(entry);
    }
    // "sept" is a common 4-letter variant not covered by the 3-letter forms
    if key == "sept" {
        return MONTHS.get("sep").copied();
    }
    None
}

/// Calendar quarter for a month number (1-12)
pub fn quarter_for_month(month: u32) -> Option<u8> {
    match month {
        1..=3 => Some(1),
        4..=6 => Some(2),
        7..=9 => Some(3),
        10..=12 => Some(4),
        _ => None,
    }
}
