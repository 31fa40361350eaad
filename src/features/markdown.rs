//! Markdown pipe-table reader
//!
//! The extraction layer most often hands tables over as GitHub-style pipe
//! tables. This reader turns one into a [`Grid`]: alignment separator rows
//! are dropped, escaped pipes are honored, and ragged rows are padded by
//! grid construction. Binary formats stay out of scope.

use crate::core::grid::{Grid, Provenance};

/// Parse a markdown pipe table into a grid
///
/// Lines without a pipe are skipped, so a table pasted with surrounding
/// prose still parses. An input with no table rows yields an empty grid.
pub fn parse_markdown_table(input: &str, provenance: Provenance) -> Grid {
    let rows: Vec<Vec<Option<String>>> = input
        .lines()
        .map(str::trim)
        .filter(|line| line.contains('|'))
        .filter(|line| !is_alignment_row(line))
        .map(split_row)
        .collect();

    Grid::from_rows(rows, provenance)
}

/// True for separator rows like `| --- | :---: |`
fn is_alignment_row(line: &str) -> bool {
    let mut saw_dash = false;
    for ch in line.chars() {
        match ch {
            '-' => saw_dash = true,
            '|' | ':' | ' ' | '\t' => {}
            _ => return false,
        }
    }
    saw_dash
}

/// Split one table row on unescaped pipes
fn split_row(line: &str) -> Vec<Option<String>> {
    let mut trimmed = line;
    if let Some(rest) = trimmed.strip_prefix('|') {
        trimmed = rest;
    }
    if let Some(rest) = trimmed.strip_suffix('|') {
        trimmed = rest;
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = trimmed.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => {
                cells.push(finish_cell(&mut current));
            }
            _ => current.push(ch),
        }
    }
    cells.push(finish_cell(&mut current));
    cells
}

fn finish_cell(current: &mut String) -> Option<String> {
    let text = current.trim().to_string();
    current.clear();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
