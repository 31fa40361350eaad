//! Integration tests for Fintab end-to-end normalization and consolidation

use fintab::{
    check_grid, classify, consolidate_blocks,
    export::{block_to_delimited, block_to_embedding_text, consolidated_to_row_major},
    find_matching, normalize_grid, normalize_grid_with_options, normalize_markdown, Grid,
    MatchOptions, NormalizeOptions, PeriodCode, PeriodTable, Provenance, TableBlock,
    ValidationStatus,
};
use pretty_assertions::assert_eq;

fn grid(rows: Vec<Vec<&str>>) -> Grid {
    Grid::from_strings(rows, Provenance::new("10q").with_title("Test Table"))
}

fn titled_block(title: &str, rows: Vec<Vec<&str>>) -> TableBlock {
    let grid = Grid::from_strings(rows, Provenance::new("10q").with_title(title));
    normalize_grid(&grid).blocks.remove(0)
}

// ============================================================================
// Header Normalization
// ============================================================================

mod normalize {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_spanning_header_with_split_date_rows() {
        let out = normalize_grid(&grid(vec![
            vec!["", "Three Months Ended"],
            vec!["", "March 31,"],
            vec!["Revenue", "2024", "2023"],
            vec!["Net sales", "100", "90"],
        ]));
        assert_eq!(out.blocks.len(), 1);
        assert_eq!(
            out.blocks[0].header_labels(),
            vec!["Revenue", "Q1-QTD-2024", "Q1-QTD-2023"]
        );
    }

    #[test]
    fn test_point_in_time_spanning_applies_to_all_data_columns() {
        let out = normalize_grid(&grid(vec![
            vec!["At June 30, 2024", "", ""],
            vec!["Assets", "100", "200"],
        ]));
        let block = &out.blocks[0];
        assert_eq!(block.columns[1].display_label, "Q2-2024");
        assert_eq!(block.columns[2].display_label, "Q2-2024");
        assert_eq!(block.columns[1].category, None);
        assert_eq!(block.row_labels, vec!["Assets"]);
    }

    #[test]
    fn test_side_by_side_period_groups_stay_independent() {
        let out = normalize_grid(&grid(vec![
            vec!["", "Three Months Ended", "", "Six Months Ended", ""],
            vec!["", "June 30,", "", "June 30,", ""],
            vec!["Metric", "2024", "2023", "2024", "2023"],
            vec!["Revenues", "1", "2", "3", "4"],
        ]));
        let labels = out.blocks[0].header_labels();
        assert_eq!(
            labels,
            vec![
                "Metric",
                "Q2-QTD-2024",
                "Q2-QTD-2023",
                "Q2-YTD-2024",
                "Q2-YTD-2023"
            ]
        );
    }

    #[test]
    fn test_static_columns_get_no_period() {
        let out = normalize_grid(&grid(vec![
            vec!["", "2024", "2023", "% Change"],
            vec!["Revenues", "10", "9", "11%"],
        ]));
        let block = &out.blocks[0];
        assert!(block.columns[3].is_static);
        assert_eq!(block.columns[3].period_code, None);
        assert_eq!(block.columns[3].display_label, "% Change");
    }

    #[test]
    fn test_unresolved_column_kept_with_raw_label() {
        let out = normalize_grid(&grid(vec![
            vec!["", "2024", "Three Months Ended"],
            vec!["Revenues", "10", "20"],
        ]));
        let block = &out.blocks[0];
        assert_eq!(block.columns[2].display_label, "Three Months Ended");
        assert!(block.columns[2].is_unresolved());
        assert!(out.warnings.iter().any(|w| w.column == Some(2)));
    }

    #[test]
    fn test_empty_grid_degrades_with_warning() {
        let out = normalize_grid(&Grid::from_rows(vec![], Provenance::new("empty")));
        assert!(out.blocks.is_empty());
        assert!(out.has_warnings());
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let first = normalize_grid(&grid(vec![
            vec!["", "Three Months Ended March 31, 2024", "Three Months Ended March 31, 2023"],
            vec!["Revenues", "10", "20"],
        ]));
        let labels_once: Vec<String> = first.blocks[0]
            .header_labels()
            .iter()
            .map(|s| s.to_string())
            .collect();

        // Re-feed the flattened header as a new grid
        let refed: Vec<Vec<&str>> = vec![
            labels_once.iter().map(|s| s.as_str()).collect(),
            vec!["Revenues", "10", "20"],
        ];
        let second = normalize_grid(&grid(refed));
        let labels_twice: Vec<String> = second.blocks[0]
            .header_labels()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(labels_once, labels_twice);
    }

    #[test]
    fn test_markdown_round_trip() {
        let out = normalize_markdown(
            "| | Three Months Ended |\n\
             | --- | --- |\n\
             | | March 31, |\n\
             | Revenue | 2024 | 2023 |\n\
             | Net sales | 10 | 20 |",
        );
        assert_eq!(
            out.blocks[0].header_labels(),
            vec!["Revenue", "Q1-QTD-2024", "Q1-QTD-2023"]
        );
        assert_eq!(out.blocks[0].rows.len(), 1);
    }
}

// ============================================================================
// Period Codes
// ============================================================================

mod periods {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_equivalent_phrasings_resolve_identically() {
        let phrased = normalize_grid(&grid(vec![
            vec!["", "Three Months Ended March 31, 2024"],
            vec!["Revenues", "10"],
        ]));
        let canonical = normalize_grid(&grid(vec![
            vec!["", "Q1-QTD-2024"],
            vec!["Revenues", "10"],
        ]));
        assert_eq!(
            phrased.blocks[0].columns[1].period_code,
            canonical.blocks[0].columns[1].period_code,
        );
    }

    #[test]
    fn test_dual_date_header() {
        let out = normalize_grid(&grid(vec![
            vec!["At June 30, 2024 and December 31, 2023", ""],
            vec!["Goodwill", "500"],
        ]));
        assert_eq!(
            out.blocks[0].columns[1].display_label,
            "Q2-2024 & Q4-2023"
        );
    }

    #[test]
    fn test_fiscal_notation_kept_verbatim() {
        let out = normalize_grid(&grid(vec![
            vec!["", "3Q 2024", "2Q 2024"],
            vec!["EPS", "1.10", "1.05"],
        ]));
        let labels = out.blocks[0].header_labels();
        assert_eq!(labels[1], "3Q-2024");
        assert_eq!(labels[2], "2Q-2024");
    }

    #[test]
    fn test_canonical_round_trip() {
        for text in ["Q1-2024", "Q2-QTD-2024", "Q3-YTD-2023", "YTD-2022", "4Q-2021"] {
            let code = PeriodCode::parse_canonical(text).expect(text);
            assert_eq!(code.to_string(), text);
        }
    }

    #[test]
    fn test_sorting_shuffled_codes() {
        let mut codes: Vec<PeriodCode> = [
            "Q2-2024", "Q1-QTD-2023", "YTD-2023", "Q1-2023", "Q2-QTD-2024", "Q1-2024",
        ]
        .iter()
        .map(|t| PeriodCode::parse_canonical(t).unwrap())
        .collect();
        codes.reverse();
        codes.sort();
        let order: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            order,
            vec![
                "Q1-2023",
                "Q1-QTD-2023",
                "YTD-2023",
                "Q1-2024",
                "Q2-2024",
                "Q2-QTD-2024"
            ]
        );
    }
}

// ============================================================================
// Block Splitting
// ============================================================================

mod splitting {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stacked_tables_split_into_blocks() {
        let out = normalize_grid(&grid(vec![
            vec!["", "2024", "2023"],
            vec!["Revenue", "10", "20"],
            vec!["Expenses", "5", "8"],
            vec!["", "March 31, 2024", "March 31, 2023"],
            vec!["Assets", "100", "200"],
        ]));
        assert_eq!(out.blocks.len(), 2);
        assert_eq!(out.blocks[0].row_labels, vec!["Revenue", "Expenses"]);
        assert_eq!(out.blocks[1].row_labels, vec!["Assets"]);
        assert_eq!(out.blocks[1].row_start, 3);
    }

    #[test]
    fn test_continuation_does_not_inherit_provenance() {
        let g = Grid::from_strings(
            vec![
                vec!["", "2024"],
                vec!["Revenue", "10"],
                vec!["", "2023"],
                vec!["Assets", "100"],
            ],
            Provenance::new("10q").with_page("7").with_title("Income"),
        );
        let out = normalize_grid(&g);
        assert_eq!(out.blocks[0].title(), Some("Income"));
        assert_eq!(out.blocks[0].provenance.page.as_deref(), Some("7"));
        assert!(out.blocks[1].is_continuation);
        assert_eq!(out.blocks[1].title(), None);
        assert_eq!(out.blocks[1].provenance.page, None);
        assert_eq!(out.blocks[1].provenance.source_id, "10q");
    }

    #[test]
    fn test_second_block_has_own_column_semantics() {
        let out = normalize_grid(&grid(vec![
            vec!["", "Three Months Ended March 31, 2024"],
            vec!["Revenue", "10"],
            vec!["At December 31, 2023", ""],
            vec!["Assets", "100"],
        ]));
        assert_eq!(out.blocks[0].columns[1].display_label, "Q1-QTD-2024");
        assert_eq!(out.blocks[1].columns[1].display_label, "Q4-2023");
    }
}

// ============================================================================
// Matching & Consolidation
// ============================================================================

mod consolidation {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn pool() -> Vec<PeriodTable> {
        vec![
            PeriodTable::new(
                titled_block(
                    "Net Flows",
                    vec![vec!["", "Three Months Ended March 31, 2024"], vec!["Inflows", "100"]],
                ),
                PeriodCode::parse_canonical("Q1-2024").unwrap(),
            ),
            PeriodTable::new(
                titled_block(
                    "Net Flows",
                    vec![vec!["", "Three Months Ended June 30, 2024"], vec!["Inflows", "120"]],
                ),
                PeriodCode::parse_canonical("Q2-2024").unwrap(),
            ),
            PeriodTable::new(
                titled_block(
                    "Net Flows Summary",
                    vec![vec!["", "Three Months Ended June 30, 2024"], vec!["Inflows", "999"]],
                ),
                PeriodCode::parse_canonical("Q2-2024").unwrap(),
            ),
            PeriodTable::new(
                titled_block(
                    "Share Repurchases",
                    vec![vec!["", "Three Months Ended June 30, 2024"], vec!["Shares", "5"]],
                ),
                PeriodCode::parse_canonical("Q2-2024").unwrap(),
            ),
        ]
    }

    #[test]
    fn test_matcher_dedups_same_period() {
        let pool = pool();
        let found = find_matching(&pool, "Net Flows", None, None, &MatchOptions::default());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].period.to_string(), "Q1-2024");
        assert_eq!(found[1].period.to_string(), "Q2-2024");
        // The exact-title candidate wins over "Net Flows Summary"
        assert_eq!(found[1].block.title(), Some("Net Flows"));
    }

    #[test]
    fn test_matcher_year_quarter_filters() {
        let pool = pool();
        let years: HashSet<i32> = [2024].into_iter().collect();
        let quarters: HashSet<u8> = [2].into_iter().collect();
        let found = find_matching(
            &pool,
            "Net Flows",
            Some(&years),
            Some(&quarters),
            &MatchOptions::default(),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].period.to_string(), "Q2-2024");
    }

    #[test]
    fn test_lossless_consolidation_of_disjoint_tables() {
        let a = titled_block(
            "Net Flows",
            vec![
                vec!["", "Three Months Ended March 31, 2024"],
                vec!["Inflows", "100"],
                vec!["Outflows", "-40"],
            ],
        );
        let b = titled_block(
            "Net Flows",
            vec![
                vec!["", "Three Months Ended June 30, 2024"],
                vec!["Market gains", "15"],
                vec!["FX impact", "-3"],
            ],
        );
        let table = consolidate_blocks(&[a, b], false);
        assert_eq!(table.validation.counts.input, 4);
        assert_eq!(table.validation.counts.output, 4);
        assert_eq!(table.validation.status, ValidationStatus::Valid);
        assert_eq!(table.row_keys.len(), 4);
    }

    #[test]
    fn test_transpose_orders_periods_chronologically() {
        let blocks: Vec<TableBlock> = [
            ("Three Months Ended June 30, 2024", "120"),
            ("Three Months Ended March 31, 2023", "80"),
            ("Three Months Ended March 31, 2024", "100"),
        ]
        .iter()
        .map(|(header, value)| {
            titled_block(
                "Net Flows",
                vec![vec!["", header], vec!["Inflows", value]],
            )
        })
        .collect();

        let table = consolidate_blocks(&blocks, true);
        assert_eq!(
            table.row_keys,
            vec!["Q1-QTD-2023", "Q1-QTD-2024", "Q2-QTD-2024"]
        );
        assert_eq!(table.cell_or_missing("Q1-QTD-2024", "Inflows"), "100");
    }

    #[test]
    fn test_consolidation_mismatch_is_reported_not_swallowed() {
        let a = titled_block(
            "Net Flows",
            vec![vec!["", "Three Months Ended March 31, 2024"], vec!["Inflows", "100"]],
        );
        let conflicting = titled_block(
            "Net Flows",
            vec![vec!["", "Three Months Ended March 31, 2024"], vec!["Inflows", "999"]],
        );
        let table = consolidate_blocks(&[a, conflicting], false);
        assert_eq!(table.validation.status, ValidationStatus::Warning);
        assert!(!table.validation.warnings.is_empty());
        // The merged result is still returned
        assert_eq!(table.cell_or_missing("Inflows", "Q1-QTD-2024"), "100");
    }
}

// ============================================================================
// Exports & Diagnostics
// ============================================================================

mod exports {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_delimited_export() {
        let block = titled_block(
            "Net Flows",
            vec![vec!["", "At June 30, 2024"], vec!["Assets", "100"]],
        );
        let csv = block_to_delimited(&block, b',').unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].ends_with("Q2-2024"));
        assert_eq!(lines[1], "Assets,100");
    }

    #[test]
    fn test_embedding_text_has_stable_data_offset() {
        let block = titled_block(
            "Net Flows",
            vec![vec!["", "At June 30, 2024"], vec!["Assets", "100"]],
        );
        let text = block_to_embedding_text(&block);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Net Flows");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Assets | 100");
    }

    #[test]
    fn test_row_major_json_carries_validation() {
        let block = titled_block(
            "Net Flows",
            vec![vec!["", "At June 30, 2024"], vec!["Assets", "100"]],
        );
        let table = consolidate_blocks(&[block], false);
        let value = consolidated_to_row_major(&table);
        assert_eq!(value["validation"]["status"], "valid");
        assert_eq!(value["validation"]["counts"]["input"], 1);
        assert_eq!(value["validation"]["counts"]["output"], 1);
    }

    #[test]
    fn test_check_grid_structure_report() {
        let g = grid(vec![
            vec!["", "2024"],
            vec!["Revenue", "10"],
            vec!["", "2023"],
            vec!["Assets", "100"],
        ]);
        let result = check_grid(&g);
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.message.contains("2 sub-tables")));
    }
}

// ============================================================================
// Options
// ============================================================================

mod options {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strict_mode_keeps_ambiguous_rows_as_data() {
        let rows = vec![vec!["Alpha", "10"], vec!["Beta", "20"]];
        let strict = normalize_grid_with_options(&grid(rows.clone()), &NormalizeOptions::strict());
        assert_eq!(strict.blocks[0].row_labels, vec!["Alpha", "Beta"]);

        let lenient =
            normalize_grid_with_options(&grid(rows), &NormalizeOptions::lenient());
        assert_eq!(lenient.blocks[0].row_labels, vec!["Beta"]);
    }

    #[test]
    fn test_single_block_option_disables_splitting() {
        let g = grid(vec![
            vec!["", "2024"],
            vec!["Revenue", "10"],
            vec!["", "2023"],
            vec!["Assets", "100"],
        ]);
        let out = normalize_grid_with_options(&g, &NormalizeOptions::single_block());
        assert_eq!(out.blocks.len(), 1);
    }

    #[test]
    fn test_classifier_defaults_match_classify_with() {
        let g = grid(vec![vec!["", "2024"], vec!["Revenue", "10"]]);
        let a = classify(&g);
        let b = fintab::classify_with(&g, &NormalizeOptions::default());
        assert_eq!(a.data_start, b.data_start);
        assert_eq!(a.rows.len(), b.rows.len());
    }
}
