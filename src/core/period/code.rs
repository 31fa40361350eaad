//! Canonical period codes
//!
//! A [`PeriodCode`] is the short canonical form of a reporting period:
//! `Q2-2024` (point in time), `Q2-QTD-2024` (three months ended),
//! `Q2-YTD-2024` (six/nine months ended), `YTD-2024` (full year),
//! `3Q-2024` (verbatim fiscal notation), or a compound `"A & B"` for
//! dual-date headers. Two raw header phrasings that denote the same fiscal
//! period must produce an identical code; everything downstream (matching,
//! consolidation, chronological sorting) relies on that.

use std::cmp::Ordering;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::data::phrases::is_plausible_year;

/// A canonical reporting period
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PeriodCode {
    /// Balance-sheet style date: `Qn-YYYY`
    Point { quarter: u8, year: i32 },
    /// Three months ended: `Qn-QTD-YYYY`
    QuarterToDate { quarter: u8, year: i32 },
    /// Six/nine months ended, tagged by the end quarter: `Qn-YTD-YYYY`
    YearToDate { quarter: u8, year: i32 },
    /// Full year: `YTD-YYYY`
    Annual { year: i32 },
    /// Fiscal-quarter notation kept verbatim: `nQ-YYYY`
    Fiscal { quarter: u8, year: i32 },
    /// Two point-in-time codes joined by " & "
    Dual(Box<PeriodCode>, Box<PeriodCode>),
    /// Raw header text that could not be mapped; kept, flagged, sorted last
    Unresolved(String),
}

impl fmt::Display for PeriodCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodCode::Point { quarter, year } => write!(f, "Q{}-{}", quarter, year),
            PeriodCode::QuarterToDate { quarter, year } => {
                write!(f, "Q{}-QTD-{}", quarter, year)
            }
            PeriodCode::YearToDate { quarter, year } => write!(f, "Q{}-YTD-{}", quarter, year),
            PeriodCode::Annual { year } => write!(f, "YTD-{}", year),
            PeriodCode::Fiscal { quarter, year } => write!(f, "{}Q-{}", quarter, year),
            PeriodCode::Dual(a, b) => write!(f, "{} & {}", a, b),
            PeriodCode::Unresolved(raw) => write!(f, "{}", raw),
        }
    }
}

impl Serialize for PeriodCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

lazy_static! {
    static ref RE_CANONICAL_QUARTERED: Regex =
        Regex::new(r"^Q([1-4])(?:-(QTD|YTD))?-(\d{4})$").unwrap();
    static ref RE_CANONICAL_ANNUAL: Regex = Regex::new(r"^YTD-(\d{4})$").unwrap();
    static ref RE_CANONICAL_FISCAL: Regex = Regex::new(r"^([1-4])Q-(\d{4})$").unwrap();
}

impl PeriodCode {
    /// Parse a canonical code string; `None` for anything non-canonical
    ///
    /// Round-trips with `Display` for every resolved variant.
    pub fn parse_canonical(text: &str) -> Option<PeriodCode> {
        let t = text.trim();

        if let Some((a, b)) = t.split_once(" & ") {
            let first = Self::parse_canonical(a)?;
            let second = Self::parse_canonical(b)?;
            return Some(PeriodCode::Dual(Box::new(first), Box::new(second)));
        }

        if let Some(caps) = RE_CANONICAL_QUARTERED.captures(t) {
            let quarter: u8 = caps.get(1)?.as_str().parse().ok()?;
            let year: i32 = caps.get(3)?.as_str().parse().ok()?;
            return Some(match caps.get(2).map(|m| m.as_str()) {
                Some("QTD") => PeriodCode::QuarterToDate { quarter, year },
                Some("YTD") => PeriodCode::YearToDate { quarter, year },
                _ => PeriodCode::Point { quarter, year },
            });
        }

        if let Some(caps) = RE_CANONICAL_ANNUAL.captures(t) {
            let year: i32 = caps.get(1)?.as_str().parse().ok()?;
            return Some(PeriodCode::Annual { year });
        }

        if let Some(caps) = RE_CANONICAL_FISCAL.captures(t) {
            let quarter: u8 = caps.get(1)?.as_str().parse().ok()?;
            let year: i32 = caps.get(2)?.as_str().parse().ok()?;
            return Some(PeriodCode::Fiscal { quarter, year });
        }

        None
    }

    /// Parse any label into a code, falling back to `Unresolved`
    ///
    /// Bare in-window years become `Unresolved` too: a year without a
    /// period type is not a canonical period.
    pub fn from_label(text: &str) -> PeriodCode {
        Self::parse_canonical(text).unwrap_or_else(|| PeriodCode::Unresolved(text.trim().to_string()))
    }

    /// Reporting year, when resolved
    pub fn year(&self) -> Option<i32> {
        match self {
            PeriodCode::Point { year, .. }
            | PeriodCode::QuarterToDate { year, .. }
            | PeriodCode::YearToDate { year, .. }
            | PeriodCode::Annual { year }
            | PeriodCode::Fiscal { year, .. } => Some(*year),
            PeriodCode::Dual(a, _) => a.year(),
            PeriodCode::Unresolved(raw) => {
                let y: i32 = raw.trim().parse().ok()?;
                is_plausible_year(y).then_some(y)
            }
        }
    }

    /// Reporting quarter, when the code carries one
    pub fn quarter(&self) -> Option<u8> {
        match self {
            PeriodCode::Point { quarter, .. }
            | PeriodCode::QuarterToDate { quarter, .. }
            | PeriodCode::YearToDate { quarter, .. }
            | PeriodCode::Fiscal { quarter, .. } => Some(*quarter),
            PeriodCode::Annual { .. } => None,
            PeriodCode::Dual(a, _) => a.quarter(),
            PeriodCode::Unresolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, PeriodCode::Unresolved(_))
    }

    /// Chronological sort key: (year, quarter, duration rank)
    ///
    /// Within one (year, quarter): point-in-time < QTD < YTD. Annual codes
    /// take the year-end slot. Unresolved codes sort after everything.
    fn sort_key(&self) -> (i32, u8, u8) {
        match self {
            PeriodCode::Point { quarter, year } => (*year, *quarter, 0),
            PeriodCode::Fiscal { quarter, year } => (*year, *quarter, 0),
            PeriodCode::QuarterToDate { quarter, year } => (*year, *quarter, 1),
            PeriodCode::YearToDate { quarter, year } => (*year, *quarter, 2),
            PeriodCode::Annual { year } => (*year, 4, 3),
            PeriodCode::Dual(a, _) => a.sort_key(),
            PeriodCode::Unresolved(_) => match self.year() {
                // A bare year still sorts into its year bucket, after codes
                Some(y) => (y, 4, 4),
                None => (i32::MAX, u8::MAX, u8::MAX),
            },
        }
    }
}

impl PartialOrd for PeriodCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PeriodCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.to_string().cmp(&other.to_string()))
    }
}
