//! Core engines
//!
//! This module contains the main processing engines:
//! - `grid`: the immutable cell-grid input model
//! - `normalize`: header classification, period resolution, flattening,
//!   and stacked-table splitting
//! - `period`: canonical period codes and phrase resolution
//! - `consolidate`: cross-period matching and merging

pub mod consolidate;
pub mod grid;
pub mod normalize;
pub mod period;

// Re-export main types and functions from grid
pub use grid::{Cell, Grid, Provenance};

// Re-export main types and functions from normalize
pub use normalize::{
    classify, classify_with, normalize_grid, normalize_grid_with_options, Classification,
    ColumnContext, NormalizeOptions, NormalizeOutput, NormalizedColumn, RowKind, TableBlock,
};

// Re-export main types and functions from period
pub use period::{assemble, resolve_cell, PeriodCode};

// Re-export main types and functions from consolidate
pub use consolidate::{
    consolidate, find_matching, ConsolidateOptions, ConsolidatedTable, MatchOptions, PeriodTable,
};
