//! Structured diagnostics for normalization and consolidation
//!
//! Every engine output carries an enumerable report instead of writing to a
//! logger: consolidation attaches a [`Validation`] block with cell counts,
//! and the CLI's check mode renders [`Diagnostic`]s for a grid without
//! converting it.

use std::fmt;

use serde::Serialize;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - output is present but degraded
    Warning,
    /// Error - output is missing or provably inconsistent
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Human-readable message
    pub message: String,
    /// Grid row the diagnostic refers to (0-indexed)
    pub row: Option<usize>,
    /// Relevant cell text
    pub source_text: Option<String>,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            row: None,
            source_text: None,
            suggestion: None,
        }
    }

    /// Add row information
    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Add source text
    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    /// Add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)?;
        if let Some(row) = self.row {
            write!(f, "\n  --> row {}", row)?;
        }
        if let Some(ref source) = self.source_text {
            write!(f, "\n  |\n  | {}", source)?;
        }
        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }
        Ok(())
    }
}

/// Check result with summary
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// Number of errors
    pub errors: usize,
    /// Number of warnings
    pub warnings: usize,
    /// Number of info messages
    pub infos: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Check if there are any issues at all
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.errors > 0 {
            parts.push(format!(
                "{} error{}",
                self.errors,
                if self.errors == 1 { "" } else { "s" }
            ));
        }
        if self.warnings > 0 {
            parts.push(format!(
                "{} warning{}",
                self.warnings,
                if self.warnings == 1 { "" } else { "s" }
            ));
        }
        if self.infos > 0 {
            parts.push(format!(
                "{} note{}",
                self.infos,
                if self.infos == 1 { "" } else { "s" }
            ));
        }
        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Overall status of a consolidation or export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// Cell counts balance and every column resolved
    Valid,
    /// Output is usable but degraded (lost/leaked cells, unresolved periods)
    Warning,
    /// Output is structurally inconsistent
    Error,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Valid => write!(f, "valid"),
            ValidationStatus::Warning => write!(f, "warning"),
            ValidationStatus::Error => write!(f, "error"),
        }
    }
}

/// Cell-count accounting for a merge
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CellCounts {
    /// Data cells supplied by all input tables
    pub input: usize,
    /// Non-placeholder cells present in the merged output
    pub output: usize,
    /// Input cells that were identical duplicates across overlapping tables
    pub duplicates: usize,
}

/// Machine-readable validation block attached to consolidated output
///
/// The invariant checked is conservation: `output == input - duplicates`.
/// Any other delta is reported, never silently swallowed.
#[derive(Debug, Clone, Serialize)]
pub struct Validation {
    pub status: ValidationStatus,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub counts: CellCounts,
}

impl Validation {
    /// A passing validation with the given counts
    pub fn valid(counts: CellCounts) -> Self {
        Self {
            status: ValidationStatus::Valid,
            errors: Vec::new(),
            warnings: Vec::new(),
            counts,
        }
    }

    /// Record a warning, downgrading a `Valid` status
    pub fn warn(&mut self, message: impl Into<String>) {
        if self.status == ValidationStatus::Valid {
            self.status = ValidationStatus::Warning;
        }
        self.warnings.push(message.into());
    }

    /// Record an error, downgrading any status
    pub fn error(&mut self, message: impl Into<String>) {
        self.status = ValidationStatus::Error;
        self.errors.push(message.into());
    }

    /// Check the conservation invariant, recording a warning on imbalance
    pub fn check_conservation(&mut self) {
        let expected = self.counts.input.saturating_sub(self.counts.duplicates);
        if self.counts.output > expected {
            self.warn(format!(
                "consolidation leaked {} cell(s): {} in, {} out, {} duplicate(s)",
                self.counts.output - expected,
                self.counts.input,
                self.counts.output,
                self.counts.duplicates
            ));
        } else if self.counts.output < expected {
            self.warn(format!(
                "consolidation lost {} cell(s): {} in, {} out, {} duplicate(s)",
                expected - self.counts.output,
                self.counts.input,
                self.counts.output,
                self.counts.duplicates
            ));
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }
}

/// Format check results for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Error => "\x1b[31m",   // Red
                DiagnosticLevel::Warning => "\x1b[33m", // Yellow
                DiagnosticLevel::Info => "\x1b[34m",    // Blue
            };
            output.push_str(color);
            output.push_str(&format!("{}", diag));
            output.push_str("\x1b[0m\n\n");
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    if use_color {
        if result.has_errors() {
            output.push_str("\x1b[31m");
        } else if result.warnings > 0 {
            output.push_str("\x1b[33m");
        } else {
            output.push_str("\x1b[32m");
        }
    }

    output.push_str(&format!("Summary: {}", result.summary()));

    if use_color {
        output.push_str("\x1b[0m");
    }

    output
}
