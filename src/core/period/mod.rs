//! Period engine
//!
//! Canonical period codes and the resolver that derives them from raw
//! header text accumulated per column.

pub mod code;
pub mod resolve;

pub use code::PeriodCode;
pub use resolve::{assemble, resolve_cell};
