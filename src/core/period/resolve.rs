//! Phrase-to-period resolution
//!
//! [`resolve_cell`] feeds one header cell into a column's context; phrase
//! detection follows the fixed priority of the pattern tables in
//! `crate::data::phrases`. [`assemble`] turns the finished context into a
//! canonical [`PeriodCode`] once a period type and a month/year are known —
//! the two may arrive from different header rows, since a spanning phrase
//! lives above the specific date that completes it.

use chrono::NaiveDate;

use crate::core::normalize::context::ColumnContext;
use crate::core::period::code::PeriodCode;
use crate::data::columns::{is_static_column, is_unit_text};
use crate::data::months::quarter_for_month;
use crate::data::phrases::{
    detect_period_phrase, is_year_cell, parse_date_fragment, parse_dual_dates,
    parse_fiscal_quarter, DateFragment, PeriodPhrase,
};
use crate::utils::text::clean_whitespace;

/// Feed one header cell into the column's accumulated state
pub fn resolve_cell(text: &str, ctx: &mut ColumnContext) {
    let t = clean_whitespace(text);
    if t.is_empty() {
        return;
    }
    ctx.raw.push(t.clone());

    if is_unit_text(&t) {
        if ctx.unit.is_none() {
            ctx.unit = Some(t);
        }
        return;
    }

    // Static names win over everything except an explicit period phrase:
    // "Total" under a "Three Months Ended" span stays static.
    if is_static_column(&t) && detect_period_phrase(&t).is_none() {
        ctx.is_static = true;
        if ctx.category.is_none() {
            ctx.category = Some(t);
        }
        return;
    }

    // Pre-normalized input: a header cell that already holds a canonical
    // code ("Q1-QTD-2024") resolves to that code unchanged.
    if let Some(code) = PeriodCode::parse_canonical(&t) {
        if ctx.preparsed.is_none() {
            ctx.preparsed = Some(code);
        }
        ctx.is_date_column = true;
        return;
    }

    match detect_period_phrase(&t) {
        Some(PeriodPhrase::FiscalQuarter) => {
            if ctx.fiscal.is_none() {
                ctx.fiscal = parse_fiscal_quarter(&t);
            }
            ctx.is_date_column = true;
        }
        Some(PeriodPhrase::DualDate) => {
            if ctx.dual.is_none() {
                ctx.dual = parse_dual_dates(&t);
            }
            ctx.phrase.get_or_insert(PeriodPhrase::DualDate);
            ctx.is_date_column = true;
        }
        Some(phrase) => {
            ctx.phrase.get_or_insert(phrase);
            // The phrase may carry its own date: "Three Months Ended June 30, 2024"
            if let Some(frag) = parse_date_fragment(&t) {
                merge_fragment(ctx, frag);
            }
            ctx.is_date_column = true;
        }
        None => {
            if is_year_cell(&t) {
                if ctx.year.is_none() {
                    ctx.year = t.trim().parse().ok();
                }
                ctx.is_date_column = true;
            } else if let Some(frag) = parse_date_fragment(&t) {
                merge_fragment(ctx, frag);
                ctx.is_date_column = true;
            } else if ctx.category.is_none() {
                ctx.category = Some(t);
            }
        }
    }
}

/// Fold a parsed date fragment into the context, first value wins per field
fn merge_fragment(ctx: &mut ColumnContext, frag: DateFragment) {
    if ctx.month.is_none() {
        ctx.month = Some(frag.month);
    }
    if ctx.day.is_none() {
        ctx.day = frag.day;
    }
    if ctx.year.is_none() {
        ctx.year = frag.year;
    }
    // An impossible calendar date (June 31) keeps its month/year but the
    // day is dropped rather than propagated downstream.
    if let (Some(m), Some(d), Some(y)) = (ctx.month, ctx.day, ctx.year) {
        if NaiveDate::from_ymd_opt(y, m, d).is_none() {
            ctx.day = None;
        }
    }
}

/// Assemble the canonical period code for a finished column context
///
/// Static columns get `None`. A column that saw date signals but cannot be
/// completed resolves to `Unresolved` with its raw header text — the column
/// is kept and flagged, never dropped.
pub fn assemble(ctx: &ColumnContext) -> Option<PeriodCode> {
    if ctx.is_static {
        return None;
    }

    if let Some(code) = &ctx.preparsed {
        return Some(code.clone());
    }

    if let Some((quarter, year)) = ctx.fiscal {
        return Some(PeriodCode::Fiscal { quarter, year });
    }

    if let Some((a, b)) = ctx.dual {
        if let (Some(ya), Some(yb)) = (a.year, b.year) {
            return Some(PeriodCode::Dual(
                Box::new(PeriodCode::Point {
                    quarter: a.quarter,
                    year: ya,
                }),
                Box::new(PeriodCode::Point {
                    quarter: b.quarter,
                    year: yb,
                }),
            ));
        }
        return Some(PeriodCode::Unresolved(ctx.raw_label()));
    }

    let quarter = ctx.month.and_then(quarter_for_month);

    match ctx.phrase {
        Some(PeriodPhrase::ThreeMonthsEnded) => match (quarter, ctx.year) {
            (Some(quarter), Some(year)) => Some(PeriodCode::QuarterToDate { quarter, year }),
            _ => Some(PeriodCode::Unresolved(ctx.raw_label())),
        },
        Some(PeriodPhrase::SixMonthsEnded) | Some(PeriodPhrase::NineMonthsEnded) => {
            // Quarter comes from the end month: June → Q2, September → Q3,
            // which also covers 52/53-week calendars ending off-quarter.
            match (quarter, ctx.year) {
                (Some(quarter), Some(year)) => Some(PeriodCode::YearToDate { quarter, year }),
                _ => Some(PeriodCode::Unresolved(ctx.raw_label())),
            }
        }
        Some(PeriodPhrase::YearEnded) => match ctx.year {
            Some(year) => Some(PeriodCode::Annual { year }),
            None => Some(PeriodCode::Unresolved(ctx.raw_label())),
        },
        Some(PeriodPhrase::PointInTime) => match (quarter, ctx.year) {
            (Some(quarter), Some(year)) => Some(PeriodCode::Point { quarter, year }),
            _ => Some(PeriodCode::Unresolved(ctx.raw_label())),
        },
        Some(PeriodPhrase::DualDate) | Some(PeriodPhrase::FiscalQuarter) => {
            Some(PeriodCode::Unresolved(ctx.raw_label()))
        }
        None => {
            if let Some(year) = ctx.year {
                match quarter {
                    Some(quarter) => Some(PeriodCode::Point { quarter, year }),
                    None => Some(PeriodCode::Unresolved(year.to_string())),
                }
            } else if ctx.is_date_column {
                Some(PeriodCode::Unresolved(ctx.raw_label()))
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with(texts: &[&str]) -> ColumnContext {
        let mut ctx = ColumnContext::new(1);
        for t in texts {
            resolve_cell(t, &mut ctx);
        }
        ctx
    }

    #[test]
    fn test_three_months_ended_split_rows() {
        let ctx = ctx_with(&["Three Months Ended", "March 31,", "2024"]);
        assert_eq!(assemble(&ctx).unwrap().to_string(), "Q1-QTD-2024");
    }

    #[test]
    fn test_three_months_ended_single_cell() {
        let ctx = ctx_with(&["Three Months Ended March 31, 2024"]);
        assert_eq!(assemble(&ctx).unwrap().to_string(), "Q1-QTD-2024");
    }

    #[test]
    fn test_six_months_quarter_from_end_month() {
        let ctx = ctx_with(&["Six Months Ended June 30, 2024"]);
        assert_eq!(assemble(&ctx).unwrap().to_string(), "Q2-YTD-2024");
    }

    #[test]
    fn test_nine_months() {
        let ctx = ctx_with(&["Nine Months Ended September 30, 2023"]);
        assert_eq!(assemble(&ctx).unwrap().to_string(), "Q3-YTD-2023");
    }

    #[test]
    fn test_year_ended() {
        let ctx = ctx_with(&["Fiscal Year Ended December 31, 2023"]);
        assert_eq!(assemble(&ctx).unwrap().to_string(), "YTD-2023");
    }

    #[test]
    fn test_point_in_time() {
        let ctx = ctx_with(&["At June 30, 2024"]);
        assert_eq!(assemble(&ctx).unwrap().to_string(), "Q2-2024");
    }

    #[test]
    fn test_fiscal_notation_verbatim() {
        let ctx = ctx_with(&["3Q 2024"]);
        assert_eq!(assemble(&ctx).unwrap().to_string(), "3Q-2024");
    }

    #[test]
    fn test_dual_date() {
        let ctx = ctx_with(&["At June 30, 2024 and December 31, 2023"]);
        assert_eq!(
            assemble(&ctx).unwrap().to_string(),
            "Q2-2024 & Q4-2023"
        );
    }

    #[test]
    fn test_year_only_with_month() {
        let ctx = ctx_with(&["March 31,", "2024"]);
        assert_eq!(assemble(&ctx).unwrap().to_string(), "Q1-2024");
    }

    #[test]
    fn test_bare_year_unresolved() {
        let ctx = ctx_with(&["2024"]);
        let code = assemble(&ctx).unwrap();
        assert!(!code.is_resolved());
        assert_eq!(code.to_string(), "2024");
    }

    #[test]
    fn test_static_column_no_code() {
        let ctx = ctx_with(&["Three Months Ended", "Total"]);
        assert!(ctx.is_static);
        assert_eq!(assemble(&ctx), None);
    }

    #[test]
    fn test_category_only_no_code() {
        let ctx = ctx_with(&["Institutional"]);
        assert_eq!(assemble(&ctx), None);
        assert_eq!(ctx.category.as_deref(), Some("Institutional"));
    }

    #[test]
    fn test_incomplete_phrase_unresolved() {
        let ctx = ctx_with(&["Three Months Ended"]);
        let code = assemble(&ctx).unwrap();
        assert!(!code.is_resolved());
    }

    #[test]
    fn test_equivalent_phrasings_identical_code() {
        let a = ctx_with(&["Three Months Ended March 31, 2024"]);
        let b = ctx_with(&["Three Months Ended", "March 31,", "2024"]);
        assert_eq!(assemble(&a), assemble(&b));
    }

    #[test]
    fn test_pre_normalized_input_identical_code() {
        let raw = ctx_with(&["Three Months Ended March 31, 2024"]);
        let canonical = ctx_with(&["Q1-QTD-2024"]);
        assert_eq!(assemble(&raw), assemble(&canonical));
        assert_eq!(assemble(&canonical).unwrap().to_string(), "Q1-QTD-2024");
    }

    #[test]
    fn test_impossible_date_drops_day() {
        let ctx = ctx_with(&["At June 31, 2024"]);
        assert_eq!(ctx.day, None);
        assert_eq!(ctx.month, Some(6));
        assert_eq!(assemble(&ctx).unwrap().to_string(), "Q2-2024");
    }
}
