//! Cross-period consolidation
//!
//! Matching finds same-titled tables across filings; merging joins their
//! normalized columns into one time-ordered table with a validation block.

pub mod matcher;
pub mod merge;

pub use matcher::{find_matching, MatchOptions, PeriodTable};
pub use merge::{consolidate, ConsolidateOptions, ConsolidatedTable, MISSING, UNKNOWN_PREFIX};
