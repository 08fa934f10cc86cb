//! Randomized properties of the translation core

use kqlspl::confidence;
use kqlspl::mapping::TableMapping;
use kqlspl::translator::{kql_to_spl, spl_to_kql};
use kqlspl::{ValidationReport, Vocabulary};
use proptest::prelude::*;

fn report(errors: usize, warnings: usize) -> ValidationReport {
    ValidationReport {
        valid: errors == 0,
        errors: vec!["error".to_string(); errors],
        warnings: vec!["warning".to_string(); warnings],
    }
}

fn note() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Mapped index=\"main\" to table \"main\"".to_string()),
        Just("Unknown command: foo".to_string()),
        Just("rex requires manual adjustment".to_string()),
        Just("WARNING: Unknown table".to_string()),
        "[a-z ]{0,20}",
    ]
}

proptest! {
    #[test]
    fn resolve_is_total(table in any::<String>()) {
        let mapping = TableMapping::with_defaults();
        let resolved = mapping.resolve(&table);
        prop_assert!(!resolved.entry.index.is_empty());
    }

    #[test]
    fn confidence_stays_in_range(
        in_errors in 0usize..10,
        in_warnings in 0usize..30,
        out_errors in 0usize..10,
        out_warnings in 0usize..30,
        notes in prop::collection::vec(note(), 0..15),
    ) {
        let score = confidence::score(
            &report(in_errors, in_warnings),
            &report(out_errors, out_warnings),
            &notes,
        );
        prop_assert!(score <= 100);
    }

    #[test]
    fn confidence_is_monotone(
        errors in 0usize..6,
        warnings in 0usize..12,
        notes in prop::collection::vec(note(), 0..8),
        extra_note in note(),
        which in 0usize..4,
    ) {
        let base = confidence::score(&report(errors, warnings), &report(0, 0), &notes);

        let worse = match which {
            0 => confidence::score(&report(errors + 1, warnings), &report(0, 0), &notes),
            1 => confidence::score(&report(errors, warnings + 1), &report(0, 0), &notes),
            2 => confidence::score(&report(errors, warnings), &report(1, 1), &notes),
            _ => {
                let mut more = notes.clone();
                more.push(extra_note);
                confidence::score(&report(errors, warnings), &report(0, 0), &more)
            }
        };
        prop_assert!(worse <= base);
    }

    #[test]
    fn spl_translation_never_panics(query in any::<String>()) {
        let vocab = Vocabulary::builtin().unwrap();
        let result = spl_to_kql::translate(&query, &vocab);
        prop_assert!(result.confidence <= 100);
        prop_assert_eq!(result.original_query, query);
    }

    #[test]
    fn kql_translation_never_panics(query in any::<String>()) {
        let vocab = Vocabulary::builtin().unwrap();
        let result = kql_to_spl::translate(&query, &vocab, &TableMapping::with_defaults());
        prop_assert!(result.confidence <= 100);
        prop_assert!(result.translated_query.starts_with("index="));
    }

    #[test]
    fn pipe_heavy_queries_never_panic(query in r#"[a-z=|"() -]{0,40}"#) {
        let vocab = Vocabulary::builtin().unwrap();
        let spl = spl_to_kql::translate(&query, &vocab);
        let kql = kql_to_spl::translate(&query, &vocab, &TableMapping::with_defaults());
        prop_assert!(spl.confidence <= 100 && kql.confidence <= 100);
    }

    #[test]
    fn stats_count_by_field_is_confident(
        index in "[a-z][a-z0-9_]{0,10}",
        field in "[a-z][a-z0-9_]{0,10}",
    ) {
        let vocab = Vocabulary::builtin().unwrap();
        let query = format!("index={index} | stats count by {field}");
        let result = spl_to_kql::translate(&query, &vocab);
        prop_assert!(result.translated_query.contains("summarize"));
        prop_assert!(result.translated_query.contains("count"));
        prop_assert!(result.translated_query.contains(&field));
        prop_assert!(result.confidence >= 70);
    }

    #[test]
    fn kql_equality_becomes_single_equals(
        table in "[A-Z][A-Za-z]{0,12}",
        column in "[A-Z][A-Za-z]{0,12}",
        value in "[0-9]{1,5}",
    ) {
        let vocab = Vocabulary::builtin().unwrap();
        let query = format!("{table} | where {column} == {value}");
        let result = kql_to_spl::translate(&query, &vocab, &TableMapping::with_defaults());
        prop_assert!(result.translated_query.contains(&column));
        let expected = format!("{column} = {value}");
        prop_assert!(result.translated_query.contains(&expected));
        prop_assert!(!result.translated_query.contains("=="));
    }
}
