//! Title matching over a candidate pool
//!
//! Finds the tables to consolidate: scores title similarity against a
//! query, filters by requested years/quarters, and keeps one candidate per
//! (year, quarter) so overlapping filings do not double-contribute.

use std::collections::HashSet;

use fxhash::FxHashMap;

use crate::core::normalize::TableBlock;
use crate::core::period::code::PeriodCode;
use crate::utils::text::similarity_ratio;

/// A candidate in the matcher's pool: a normalized block plus the
/// reporting period of the filing it came from
#[derive(Debug, Clone)]
pub struct PeriodTable {
    pub block: TableBlock,
    pub period: PeriodCode,
}

impl PeriodTable {
    pub fn new(block: TableBlock, period: PeriodCode) -> Self {
        Self { block, period }
    }

    fn title(&self) -> &str {
        self.block.title().unwrap_or("")
    }
}

/// Options for table matching
#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// Minimum title similarity for a candidate to qualify
    /// Default: 0.6
    pub min_similarity: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            min_similarity: 0.6,
        }
    }
}

impl MatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_similarity(mut self, min_similarity: f64) -> Self {
        self.min_similarity = min_similarity;
        self
    }
}

/// Find candidates matching a title, optionally filtered by year/quarter
///
/// Among candidates sharing one (year, quarter) only the highest-scoring
/// survives. Results come back in chronological period order; quarter-less
/// and unresolved periods sort after dated ones.
pub fn find_matching<'a>(
    candidates: &'a [PeriodTable],
    query_title: &str,
    years: Option<&HashSet<i32>>,
    quarters: Option<&HashSet<u8>>,
    options: &MatchOptions,
) -> Vec<&'a PeriodTable> {
    let mut best: FxHashMap<(Option<i32>, Option<u8>), (f64, &PeriodTable)> =
        FxHashMap::default();

    for candidate in candidates {
        let score = similarity_ratio(candidate.title(), query_title);
        if score < options.min_similarity {
            continue;
        }
        let year = candidate.period.year();
        let quarter = candidate.period.quarter();
        if let Some(wanted) = years {
            match year {
                Some(y) if wanted.contains(&y) => {}
                _ => continue,
            }
        }
        if let Some(wanted) = quarters {
            match quarter {
                Some(q) if wanted.contains(&q) => {}
                _ => continue,
            }
        }

        let slot = best.entry((year, quarter)).or_insert((score, candidate));
        if score > slot.0 {
            *slot = (score, candidate);
        }
    }

    let mut result: Vec<&PeriodTable> = best.into_values().map(|(_, c)| c).collect();
    result.sort_by(|a, b| a.period.cmp(&b.period));
    result
}
