//! Pure text utilities shared across the pipeline
//!
//! These functions carry no state and no table semantics; anything that
//! consults the static pattern tables lives in `crate::data` instead.

/// Collapse runs of whitespace to single spaces and trim the ends
pub fn clean_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_was_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !last_was_space && !result.is_empty() {
                result.push(' ');
            }
            last_was_space = true;
        } else {
            result.push(ch);
            last_was_space = false;
        }
    }

    result.trim_end().to_string()
}

/// Collapse consecutive duplicate words, case-insensitively
///
/// "Q3-2025 Q3-2025 Revenue" becomes "Q3-2025 Revenue". Non-adjacent
/// repeats are kept: "Total Assets Total" is unchanged.
pub fn collapse_duplicate_words(text: &str) -> String {
    let mut result: Vec<&str> = Vec::new();
    for word in text.split_whitespace() {
        if let Some(last) = result.last() {
            if last.eq_ignore_ascii_case(word) {
                continue;
            }
        }
        result.push(word);
    }
    result.join(" ")
}

/// Lowercase a title and strip punctuation for comparison
pub fn normalize_for_match(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_was_space = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            result.extend(ch.to_lowercase());
            last_was_space = false;
        } else if !last_was_space && !result.is_empty() {
            result.push(' ');
            last_was_space = true;
        }
    }
    result.trim_end().to_string()
}

/// Normalized string similarity in [0.0, 1.0]
///
/// Dice coefficient over character bigrams of the match-normalized inputs.
/// Identical strings score 1.0; strings sharing no bigram score 0.0.
/// Single-character inputs fall back to exact comparison.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a = normalize_for_match(a);
    let b = normalize_for_match(b);

    if a == b {
        return if a.is_empty() { 0.0 } else { 1.0 };
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.len() < 2 || b_chars.len() < 2 {
        return 0.0;
    }

    let mut a_bigrams: Vec<(char, char)> = a_chars.windows(2).map(|w| (w[0], w[1])).collect();
    let b_bigrams: Vec<(char, char)> = b_chars.windows(2).map(|w| (w[0], w[1])).collect();

    let total = a_bigrams.len() + b_bigrams.len();
    let mut matches = 0usize;
    for bg in &b_bigrams {
        if let Some(pos) = a_bigrams.iter().position(|x| x == bg) {
            a_bigrams.swap_remove(pos);
            matches += 1;
        }
    }

    (2.0 * matches as f64) / total as f64
}

/// True if the token is a bare 4-digit number
pub fn is_four_digit_number(text: &str) -> bool {
    let t = text.trim();
    t.len() == 4 && t.chars().all(|c| c.is_ascii_digit())
}

/// True if the cell text reads as a numeric value rather than a label
///
/// Accepts currency symbols, thousands separators, parenthesized negatives,
/// percent signs, and dash placeholders.
pub fn is_numeric_value(text: &str) -> bool {
    let t = text.trim();
    if t.is_empty() {
        return false;
    }
    if matches!(t, "-" | "--" | "—" | "–" | "N/A" | "n/a" | "NM" | "nm") {
        return true;
    }
    let stripped: String = t
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '(' | ')' | '%' | ' '))
        .collect();
    if stripped.is_empty() {
        return false;
    }
    let mut digits = 0usize;
    for (i, c) in stripped.chars().enumerate() {
        match c {
            '0'..='9' => digits += 1,
            '.' => {}
            '-' | '+' if i == 0 => {}
            _ => return false,
        }
    }
    digits > 0
}
