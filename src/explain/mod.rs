//! Plain-language query explanations
//!
//! Purely descriptive: reads the vocabulary, never touches translator state.

use crate::language::QueryLanguage;
use crate::stages::{split_stages, Stage};
use crate::translator::extract;
use crate::vocabulary::{VerbEntry, Vocabulary};

/// Describe `query` as a numbered list of steps
///
/// Step 1 covers the head (search criteria or table), each later step one
/// pipeline stage.
#[must_use]
pub fn explain(query: &str, language: QueryLanguage, vocabulary: &Vocabulary) -> String {
    let split = split_stages(query);

    let head = match language {
        QueryLanguage::Spl => describe_search(&split.head),
        QueryLanguage::Kql => describe_table(&split.head),
    };

    let mut lines = vec![format!("This {} query:", language.label()), format!("1. {head}")];

    for (position, stage) in split.stages.iter().enumerate() {
        let entry = match language {
            QueryLanguage::Spl => vocabulary.spl_command(stage.verb()),
            QueryLanguage::Kql => vocabulary.kql_operator(stage.verb()),
        };
        lines.push(format!("{}. {}", position + 2, describe_stage(stage, entry, language)));
    }

    let mut explanation = lines.join("\n");
    explanation.push('\n');
    explanation
}

fn describe_search(head: &str) -> String {
    if head.is_empty() {
        return "Starts with a generating command instead of search criteria".to_string();
    }

    let mut sentence = match extract::index_value(head) {
        Some(index) => format!("Searches the \"{}\" index", index.replace('"', "")),
        None => "Searches all available events".to_string(),
    };

    let mut qualifiers = Vec::new();
    if let Some(sourcetype) = extract::sourcetype_value(head) {
        qualifiers.push(format!("sourcetype \"{sourcetype}\""));
    }
    if let Some(source) = extract::source_value(head) {
        qualifiers.push(format!("source \"{source}\""));
    }
    if !qualifiers.is_empty() {
        sentence.push_str(&format!(" ({})", qualifiers.join(", ")));
    }

    let terms = extract::free_text_terms(head);
    if !terms.is_empty() {
        sentence.push_str(&format!(" for events containing: \"{}\"", terms.join(" ")));
    }

    if let Some(earliest) = extract::earliest_value(head) {
        sentence.push_str(&format!(", starting from {earliest}"));
    }

    sentence
}

fn describe_table(head: &str) -> String {
    if head.is_empty() {
        "Starts without a table reference".to_string()
    } else {
        format!("Queries the \"{head}\" table")
    }
}

fn describe_stage(stage: &Stage, entry: Option<&VerbEntry>, language: QueryLanguage) -> String {
    match entry {
        Some(entry) => {
            let description = if entry.description.is_empty() {
                stage.verb()
            } else {
                entry.description.as_str()
            };
            if stage.args().is_empty() {
                description.to_string()
            } else {
                format!("{description}: {}", stage.args())
            }
        }
        None => match language {
            QueryLanguage::Spl => format!("Executes: {}", stage.text()),
            QueryLanguage::Kql => format!("Applies: {}", stage.text()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::builtin().unwrap()
    }

    #[test]
    fn test_explain_spl() {
        let text = explain(
            "index=main sourcetype=syslog error | stats count by host | frobnicate",
            QueryLanguage::Spl,
            &vocab(),
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "This SPL query:");
        assert_eq!(
            lines[1],
            "1. Searches the \"main\" index (sourcetype \"syslog\") \
             for events containing: \"error\""
        );
        assert_eq!(
            lines[2],
            "2. Calculates aggregate statistics, optionally grouped by fields: count by host"
        );
        assert_eq!(lines[3], "3. Executes: frobnicate");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_explain_spl_time_range() {
        let text = explain("index=web earliest=-7d", QueryLanguage::Spl, &vocab());
        assert!(text.contains("1. Searches the \"web\" index, starting from -7d"));
    }

    #[test]
    fn test_explain_generating_command() {
        let text = explain("| metadata type=sourcetypes", QueryLanguage::Spl, &vocab());
        assert!(text.contains("1. Starts with a generating command"));
        assert!(text.contains(
            "2. Returns metadata about sources, sourcetypes or hosts: type=sourcetypes"
        ));
    }

    #[test]
    fn test_explain_kql() {
        let text = explain(
            "SigninLogs\n| where ResultType != 0\n| count\n| bogus thing",
            QueryLanguage::Kql,
            &vocab(),
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "This KQL query:");
        assert_eq!(lines[1], "1. Queries the \"SigninLogs\" table");
        assert_eq!(lines[2], "2. Filters rows that satisfy a predicate: ResultType != 0");
        assert_eq!(lines[3], "3. Returns the number of rows in the input");
        assert_eq!(lines[4], "4. Applies: bogus thing");
    }

    #[test]
    fn test_explain_empty() {
        let text = explain("", QueryLanguage::Kql, &vocab());
        assert_eq!(text, "This KQL query:\n1. Starts without a table reference\n");
    }
}
