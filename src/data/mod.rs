//! Data layer - Static mappings and pattern tables
//!
//! This module contains all static data used for header classification and
//! period resolution:
//! - Month name tables and fiscal-quarter mapping
//! - Ordered period-phrase pattern tables
//! - Static-column names and unit prefixes

pub mod columns;
pub mod months;
pub mod phrases;

// Re-export commonly used items
pub use columns::{
    is_static_column, is_unit_text, keeps_trailing_number, STATIC_COLUMNS, UNIT_PREFIXES,
};
pub use months::{month_lookup, quarter_for_month, MONTHS};
pub use phrases::{
    contains_period_phrase, detect_period_phrase, is_plausible_year, is_year_cell,
    looks_like_date, parse_date_fragment, parse_dual_dates, parse_fiscal_quarter, DateFragment,
    PeriodPhrase, YEAR_MAX, YEAR_MIN,
};
