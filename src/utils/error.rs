//! Error handling for Fintab table processing
//!
//! This module provides a unified error type and result type for all
//! normalization and consolidation operations. Recoverable conditions
//! (an undetectable header boundary, an unresolvable period column) are
//! reported as warnings on the output, never as errors.

use std::fmt;

use serde::Serialize;

/// Table processing error type
#[derive(Debug, Clone)]
pub enum TableError {
    /// The input grid is degenerate (fewer than one row or column)
    MalformedGrid { message: String },
    /// Invalid input
    InvalidInput { message: String },
    /// IO error (for CLI file operations)
    IoError { message: String },
    /// Internal error
    InternalError { message: String },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::MalformedGrid { message } => {
                write!(f, "Malformed grid: {}", message)
            }
            TableError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            TableError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
            TableError::InternalError { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for TableError {}

impl From<std::io::Error> for TableError {
    fn from(err: std::io::Error) -> Self {
        TableError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type for table processing operations
pub type TableResult<T> = Result<T, TableError>;

/// Processing warnings (non-fatal issues)
///
/// A warning always accompanies a best-effort result: the column or block it
/// refers to is still present in the output.
#[derive(Debug, Clone, Serialize)]
pub struct EngineWarning {
    pub message: String,
    /// Grid row the warning refers to, when known
    pub row: Option<usize>,
    /// Grid column the warning refers to, when known
    pub column: Option<usize>,
    pub suggestion: Option<String>,
}

impl EngineWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            row: None,
            column: None,
            suggestion: None,
        }
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn at_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for EngineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.row, self.column) {
            (Some(r), Some(c)) => {
                write!(f, "Warning at row {}, column {}: {}", r, c, self.message)?
            }
            (Some(r), None) => write!(f, "Warning at row {}: {}", r, self.message)?,
            (None, Some(c)) => write!(f, "Warning at column {}: {}", c, self.message)?,
            (None, None) => write!(f, "Warning: {}", self.message)?,
        }
        if let Some(ref sug) = self.suggestion {
            write!(f, " ({})", sug)?;
        }
        Ok(())
    }
}

// Convenience constructors for errors
impl TableError {
    pub fn malformed(message: impl Into<String>) -> Self {
        TableError::MalformedGrid {
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        TableError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        TableError::InternalError {
            message: message.into(),
        }
    }
}
