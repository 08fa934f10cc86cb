//! SPL to KQL rewriting

use tracing::debug;

use super::extract;
use super::verbs::SplVerb;
use super::TranslationResult;
use crate::stages::{split_stages, Stage};
use crate::validator::{validate_kql, validate_spl};
use crate::vocabulary::Vocabulary;

/// Table reference used when the search names no index
pub const PLACEHOLDER_TABLE: &str = "TableName";

/// Translate an SPL query to KQL
#[must_use]
pub fn translate(query: &str, vocabulary: &Vocabulary) -> TranslationResult {
    let input_validation = validate_spl(query, Some(vocabulary));
    let mut notes = Vec::new();

    let split = split_stages(query);
    let mut kql = translate_search(&split.head, &mut notes);

    for stage in &split.stages {
        kql.push_str("\n| ");
        kql.push_str(&translate_stage(stage, vocabulary, &mut notes));
    }

    let output_validation = validate_kql(&kql, Some(vocabulary));
    let result = TranslationResult::new(query, kql, input_validation, output_validation, notes);
    debug!(
        confidence = result.confidence,
        notes = result.translation_notes.len(),
        "SPL -> KQL"
    );
    result
}

/// Rewrite the search criteria into a table reference and a `where` clause
///
/// The time filter always leads the predicate list, followed by
/// sourcetype, source and free-text terms. Any other `key=value` filter
/// is dropped with a warning note.
pub fn translate_search(head: &str, notes: &mut Vec<String>) -> String {
    let mut table = PLACEHOLDER_TABLE.to_string();
    let mut predicates = Vec::new();

    if let Some(index) = extract::index_value(head) {
        table = extract::table_from_index(index);
        notes.push(format!("Mapped index=\"{index}\" to table \"{table}\""));
    }

    if let Some(sourcetype) = extract::sourcetype_value(head) {
        predicates.push(format!("SourceType == \"{sourcetype}\""));
    }

    if let Some(source) = extract::source_value(head) {
        predicates.push(format!("Source == \"{source}\""));
    }

    let terms = extract::free_text_terms(head);
    if !terms.is_empty() {
        predicates.push(
            terms
                .iter()
                .map(|term| format!("* contains \"{term}\""))
                .collect::<Vec<_>>()
                .join(" and "),
        );
    }

    if let Some(earliest) = extract::earliest_value(head) {
        let ago = extract::ago_argument(&earliest);
        predicates.insert(0, format!("TimeGenerated >= ago({ago})"));
        notes.push(format!("Translated earliest={earliest} to ago()"));
    }

    for filter in extract::unmapped_filters(head) {
        notes.push(format!("WARNING: Unmapped search filter {filter} dropped"));
    }

    if predicates.is_empty() {
        table
    } else {
        format!("{table}\n| where {}", predicates.join(" and "))
    }
}

/// Rewrite one command stage, recording anything lossy in `notes`
pub fn translate_stage(
    stage: &Stage,
    vocabulary: &Vocabulary,
    notes: &mut Vec<String>,
) -> String {
    let command = stage.verb();
    let args = stage.args();

    let Some(entry) = vocabulary.spl_command(command) else {
        notes.push(format!("Unknown command: {command}"));
        return format!("{} // WARNING: Unknown SPL command", stage.text());
    };

    match SplVerb::from(command) {
        SplVerb::Stats => format!("summarize {args}"),
        SplVerb::Eval => format!("extend {args}"),
        SplVerb::Where => format!("where {args}"),
        SplVerb::Fields => fields(args),
        SplVerb::Table => format!("project {args}"),
        SplVerb::Sort => sort(args, notes),
        SplVerb::Head => format!("take {args}"),
        SplVerb::Dedup => format!("distinct {args}"),
        SplVerb::Rename => rename(args),
        SplVerb::Mvexpand => format!("mv-expand {args}"),
        SplVerb::Spath => spath(args, notes),
        SplVerb::Rex => {
            notes.push(
                "rex: Regular expression extraction may require manual adjustment".to_string(),
            );
            format!("parse /* {args} - requires manual regex adjustment */")
        }
        SplVerb::Timechart => timechart(args),
        SplVerb::Other => {
            notes.push(format!(
                "No specific translation for {command}, using generic mapping"
            ));
            format!("{} /* {} */", entry.equivalent, stage.text())
        }
    }
}

fn fields(args: &str) -> String {
    if let Some(kept) = args.strip_prefix('+') {
        format!("project {}", kept.trim())
    } else if let Some(removed) = args.strip_prefix('-') {
        format!("project-away {}", removed.trim())
    } else {
        format!("project {args}")
    }
}

fn sort(args: &str, notes: &mut Vec<String>) -> String {
    if args.is_empty() {
        return "order by".to_string();
    }
    match extract::sort_keys(args) {
        Some(keys) => {
            let keys = keys
                .iter()
                .map(|(field, descending)| {
                    format!("{field} {}", if *descending { "desc" } else { "asc" })
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("order by {keys}")
        }
        None => {
            notes.push(format!("sort requires manual adjustment: {args}"));
            format!("order by /* {args} - requires manual adjustment */")
        }
    }
}

fn rename(args: &str) -> String {
    let pairs = extract::spl_rename_pairs(args);
    if pairs.is_empty() {
        return format!("project-rename {args}");
    }
    let renames = pairs
        .iter()
        .map(|(old, new)| format!("{new} = {old}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("project-rename {renames}")
}

fn spath(args: &str, notes: &mut Vec<String>) -> String {
    let path = extract::keyword_arg(args, "path");
    let output = extract::keyword_arg(args, "output");

    match (path, output) {
        (Some(path), Some(output)) => {
            let path = extract::json_path(path);
            let input = extract::keyword_arg(args, "input").unwrap_or("dynamic_field");
            notes.push(format!("spath: Extracting {path} from JSON"));
            format!("extend {output} = tostring({input}.{path})")
        }
        _ => {
            notes.push("spath requires manual adjustment for complex JSON parsing".to_string());
            format!("extend /* spath {args} - requires manual adjustment */")
        }
    }
}

fn timechart(args: &str) -> String {
    let (span, rest) = extract::span_and_rest(args);
    let bin = format!("bin(TimeGenerated, {})", span.unwrap_or("1h"));
    match rest.split_once(" by ") {
        Some((aggregation, groups)) => format!("summarize {aggregation} by {bin}, {groups}"),
        None => format!("summarize {rest} by {bin}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::builtin().unwrap()
    }

    fn stage(vocab: &Vocabulary, text: &str) -> (String, Vec<String>) {
        let mut notes = Vec::new();
        let split = split_stages(&format!("index=x | {text}"));
        let out = translate_stage(&split.stages[0], vocab, &mut notes);
        (out, notes)
    }

    #[test]
    fn test_search_index_and_terms() {
        let mut notes = Vec::new();
        let out = translate_search("index=main error timeout", &mut notes);
        assert_eq!(
            out,
            "main\n| where * contains \"error\" and * contains \"timeout\""
        );
        assert_eq!(notes, vec!["Mapped index=\"main\" to table \"main\"".to_string()]);
    }

    #[test]
    fn test_search_without_index_uses_placeholder() {
        let mut notes = Vec::new();
        assert_eq!(translate_search("", &mut notes), "TableName");
        assert!(notes.is_empty());
    }

    #[test]
    fn test_search_time_filter_first() {
        let mut notes = Vec::new();
        let out = translate_search(
            r#"index=web* sourcetype="access_combined" source=/var/log/app.log earliest=-24h fail"#,
            &mut notes,
        );
        assert_eq!(
            out,
            "web\n| where TimeGenerated >= ago(24h) and SourceType == \"access_combined\" \
             and Source == \"/var/log/app.log\" and * contains \"fail\""
        );
        assert_eq!(notes[1], "Translated earliest=-24h to ago()");
    }

    #[test]
    fn test_search_flags_dropped_filters() {
        let mut notes = Vec::new();
        let out = translate_search("index=windows EventCode=4625 status=failure", &mut notes);
        assert_eq!(out, "windows");
        assert_eq!(
            notes[1..],
            [
                "WARNING: Unmapped search filter EventCode=4625 dropped".to_string(),
                "WARNING: Unmapped search filter status=failure dropped".to_string(),
            ]
        );
    }

    #[test]
    fn test_dropped_filters_lower_confidence() {
        let result = translate(
            "index=windows EventCode=4625 status=failure | stats count by user",
            &vocab(),
        );
        assert_eq!(result.translated_query, "windows\n| summarize count by user");
        assert_eq!(result.translation_notes.len(), 3);
        assert_eq!(result.confidence, 80);
    }

    #[test]
    fn test_stats_and_eval() {
        let vocab = vocab();
        assert_eq!(stage(&vocab, "stats count by host").0, "summarize count by host");
        assert_eq!(stage(&vocab, "eval x=a+b").0, "extend x=a+b");
        assert_eq!(stage(&vocab, "where x > 5").0, "where x > 5");
    }

    #[test]
    fn test_fields_variants() {
        let vocab = vocab();
        assert_eq!(stage(&vocab, "fields + host, user").0, "project host, user");
        assert_eq!(stage(&vocab, "fields - _raw").0, "project-away _raw");
        assert_eq!(stage(&vocab, "fields host").0, "project host");
        assert_eq!(stage(&vocab, "table _time, host").0, "project _time, host");
    }

    #[test]
    fn test_sort_directions() {
        let vocab = vocab();
        assert_eq!(stage(&vocab, "sort -count").0, "order by count desc");
        assert_eq!(stage(&vocab, "sort +count").0, "order by count asc");
        assert_eq!(stage(&vocab, "sort count").0, "order by count asc");
    }

    #[test]
    fn test_sort_multiple_keys() {
        let vocab = vocab();
        let (out, notes) = stage(&vocab, "sort -count, host");
        assert_eq!(out, "order by count desc, host asc");
        assert!(notes.is_empty());
    }

    #[test]
    fn test_sort_limit_form_flags() {
        let vocab = vocab();
        let (out, notes) = stage(&vocab, "sort 10 -count");
        assert_eq!(out, "order by /* 10 -count - requires manual adjustment */");
        assert_eq!(notes, vec!["sort requires manual adjustment: 10 -count".to_string()]);
    }

    #[test]
    fn test_simple_swaps() {
        let vocab = vocab();
        assert_eq!(stage(&vocab, "head 10").0, "take 10");
        assert_eq!(stage(&vocab, "dedup user").0, "distinct user");
        assert_eq!(stage(&vocab, "mvexpand values").0, "mv-expand values");
    }

    #[test]
    fn test_rename() {
        let vocab = vocab();
        assert_eq!(stage(&vocab, "rename old as new").0, "project-rename new = old");
        assert_eq!(
            stage(&vocab, "rename a as b, c as d").0,
            "project-rename b = a, d = c"
        );
        assert_eq!(stage(&vocab, "rename weird").0, "project-rename weird");
    }

    #[test]
    fn test_spath() {
        let vocab = vocab();
        let (out, notes) = stage(&vocab, "spath input=payload path=user.roles{} output=roles");
        assert_eq!(out, "extend roles = tostring(payload.user.roles)");
        assert_eq!(notes, vec!["spath: Extracting user.roles from JSON".to_string()]);

        let (out, _) = stage(&vocab, "spath path=a.b output=c");
        assert_eq!(out, "extend c = tostring(dynamic_field.a.b)");

        let (out, notes) = stage(&vocab, "spath output=c");
        assert_eq!(out, "extend /* spath output=c - requires manual adjustment */");
        assert!(notes[0].contains("manual"));
    }

    #[test]
    fn test_rex_always_flags() {
        let vocab = vocab();
        let (out, notes) = stage(&vocab, r#"rex field=_raw "user=(?<user>\w+)""#);
        assert_eq!(
            out,
            r#"parse /* field=_raw "user=(?<user>\w+)" - requires manual regex adjustment */"#
        );
        assert!(notes[0].contains("manual"));
    }

    #[test]
    fn test_timechart() {
        let vocab = vocab();
        assert_eq!(
            stage(&vocab, "timechart span=5m count by host").0,
            "summarize count by bin(TimeGenerated, 5m), host"
        );
        assert_eq!(
            stage(&vocab, "timechart count").0,
            "summarize count by bin(TimeGenerated, 1h)"
        );
    }

    #[test]
    fn test_generic_fallback() {
        let vocab = vocab();
        let (out, notes) = stage(&vocab, "top limit=5 user");
        assert_eq!(out, "top /* top limit=5 user */");
        assert_eq!(
            notes,
            vec!["No specific translation for top, using generic mapping".to_string()]
        );
    }

    #[test]
    fn test_unknown_command() {
        let vocab = vocab();
        let (out, notes) = stage(&vocab, "frobnicate x y");
        assert_eq!(out, "frobnicate x y // WARNING: Unknown SPL command");
        assert_eq!(notes, vec!["Unknown command: frobnicate".to_string()]);
    }

    #[test]
    fn test_full_query() {
        let query = "index=main | stats count by host | sort -count | head 5";
        let result = translate(query, &vocab());
        assert_eq!(
            result.translated_query,
            "main\n| summarize count by host\n| order by count desc\n| take 5"
        );
        assert_eq!(result.confidence, 100);
        assert!(result.output_validation.valid);
    }
}
