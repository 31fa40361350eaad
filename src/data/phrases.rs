//! Period-phrase pattern tables
//!
//! The classifier and the period resolver never branch on ad-hoc string
//! tests; they consult these ordered (pattern, tag) tables so the matching
//! rules stay auditable in one place. Priority is the table order: the first
//! matching entry wins.

use lazy_static::lazy_static;
use regex::Regex;

use crate::utils::text::is_four_digit_number;

use super::months::month_lookup;

/// Years outside this window are treated as opaque numbers, not dates
pub const YEAR_MIN: i32 = 2000;
pub const YEAR_MAX: i32 = 2040;

/// Tag produced by the period-phrase tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodPhrase {
    /// Fiscal-quarter notation, e.g. "3Q 2024"
    FiscalQuarter,
    /// Two point-in-time dates joined by "and", e.g.
    /// "At June 30, 2024 and December 31, 2023"
    DualDate,
    /// "Three Months Ended ..."
    ThreeMonthsEnded,
    /// "Six Months Ended ..."
    SixMonthsEnded,
    /// "Nine Months Ended ..."
    NineMonthsEnded,
    /// "Year Ended ..." / "Fiscal Year Ended ..."
    YearEnded,
    /// "At ..." / "As of ..." balance-sheet style date
    PointInTime,
}

lazy_static! {
    static ref RE_FISCAL: Regex =
        Regex::new(r"^\s*([1-4])Q\s*[-\s]?\s*(\d{4})\s*$").unwrap();
    static ref RE_DUAL: Regex = Regex::new(
        r"(?i)^\s*(?:at|as\s+of)\s+([A-Za-z]+)\.?\s+(\d{1,2}),?\s+(\d{4})\s+and\s+([A-Za-z]+)\.?\s+(\d{1,2}),?\s+(\d{4})"
    )
    .unwrap();
    static ref RE_THREE: Regex = Regex::new(r"(?i)\bthree\s+months?\s+ended\b").unwrap();
    static ref RE_SIX: Regex = Regex::new(r"(?i)\bsix\s+months?\s+ended\b").unwrap();
    static ref RE_NINE: Regex = Regex::new(r"(?i)\bnine\s+months?\s+ended\b").unwrap();
    static ref RE_YEAR_ENDED: Regex =
        Regex::new(r"(?i)\b(?:fiscal\s+)?years?\s+ended\b").unwrap();
    static ref RE_POINT: Regex = Regex::new(r"(?i)^\s*(?:at|as\s+of)\b").unwrap();

    /// "March 31, 2024", "March 31," (year supplied by a later row), "Mar 31 2024"
    static ref RE_MONTH_DAY: Regex =
        Regex::new(r"(?i)\b([A-Za-z]{3,9})\.?\s+(\d{1,2})\s*,?\s*(\d{4})?").unwrap();
}

/// Detect the period phrase in a cell, first match wins
pub fn detect_period_phrase(text: &str) -> Option<PeriodPhrase> {
    // Priority order is load-bearing: dual dates start with "at"/"as of" and
    // must be tested before the bare point-in-time prefix.
    let table: [(&Regex, PeriodPhrase); 7] = [
        (&RE_FISCAL, PeriodPhrase::FiscalQuarter),
        (&RE_DUAL, PeriodPhrase::DualDate),
        (&RE_THREE, PeriodPhrase::ThreeMonthsEnded),
        (&RE_SIX, PeriodPhrase::SixMonthsEnded),
        (&RE_NINE, PeriodPhrase::NineMonthsEnded),
        (&RE_YEAR_ENDED, PeriodPhrase::YearEnded),
        (&RE_POINT, PeriodPhrase::PointInTime),
    ];
    for (re, tag) in table {
        if re.is_match(text) {
            return Some(tag);
        }
    }
    None
}

/// True if the cell carries any duration/point-in-time phrase
///
/// Used by the classifier's spanning-row test, which does not care which
/// phrase matched.
pub fn contains_period_phrase(text: &str) -> bool {
    detect_period_phrase(text).is_some()
}

/// A parsed calendar date fragment from a header cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFragment {
    pub month: u32,
    pub quarter: u8,
    pub day: Option<u32>,
    /// Missing when the cell reads "March 31," and the year lives elsewhere
    pub year: Option<i32>,
}

/// Extract "<month> <day>[, <year>]" from a cell, validating the month token
///
/// Scans every "<word> <digits>" candidate so a non-month word earlier in
/// the cell ("Quarter 3 ...") does not mask a real date after it.
pub fn parse_date_fragment(text: &str) -> Option<DateFragment> {
    for caps in RE_MONTH_DAY.captures_iter(text) {
        let Some((month, quarter)) = caps.get(1).and_then(|m| month_lookup(m.as_str())) else {
            continue;
        };
        let day = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
        let year = caps
            .get(3)
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .filter(|&y| is_plausible_year(y));
        return Some(DateFragment {
            month,
            quarter,
            day,
            year,
        });
    }
    None
}

/// Extract both dates of a dual point-in-time header
pub fn parse_dual_dates(text: &str) -> Option<(DateFragment, DateFragment)> {
    let caps = RE_DUAL.captures(text)?;
    let (m1, q1) = month_lookup(caps.get(1)?.as_str())?;
    let (m2, q2) = month_lookup(caps.get(4)?.as_str())?;
    let first = DateFragment {
        month: m1,
        quarter: q1,
        day: caps.get(2).and_then(|m| m.as_str().parse().ok()),
        year: caps.get(3).and_then(|m| m.as_str().parse().ok()),
    };
    let second = DateFragment {
        month: m2,
        quarter: q2,
        day: caps.get(5).and_then(|m| m.as_str().parse().ok()),
        year: caps.get(6).and_then(|m| m.as_str().parse().ok()),
    };
    Some((first, second))
}

/// Extract the fiscal-quarter notation "<digit>Q <year>"
pub fn parse_fiscal_quarter(text: &str) -> Option<(u8, i32)> {
    let caps = RE_FISCAL.captures(text)?;
    let q: u8 = caps.get(1)?.as_str().parse().ok()?;
    let year: i32 = caps.get(2)?.as_str().parse().ok()?;
    Some((q, year))
}

/// True for a 4-digit year within the plausible reporting window
pub fn is_year_cell(text: &str) -> bool {
    let t = text.trim();
    is_four_digit_number(t)
        && t.parse::<i32>()
            .map(is_plausible_year)
            .unwrap_or(false)
}

pub fn is_plausible_year(year: i32) -> bool {
    (YEAR_MIN..=YEAR_MAX).contains(&year)
}

/// True if the cell reads as a date or bare year rather than a value
pub fn looks_like_date(text: &str) -> bool {
    let t = text.trim();
    if t.is_empty() {
        return false;
    }
    is_year_cell(t) || parse_date_fragment(t).is_some() || detect_period_phrase(t).is_some()
}
