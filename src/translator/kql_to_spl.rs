//! KQL to SPL rewriting
//!
//! The table reference becomes an `index=`/`sourcetype=` search through the
//! [`TableMapping`]. Leading `where` clauses are folded into that search;
//! everything else becomes a piped command.

use tracing::{debug, warn};

use super::extract;
use super::verbs::KqlOperator;
use super::TranslationResult;
use crate::mapping::TableMapping;
use crate::stages::{split_stages, Stage};
use crate::validator::{validate_kql, validate_spl};
use crate::vocabulary::Vocabulary;

/// Translate a KQL query to SPL using `mapping` for the table reference
#[must_use]
pub fn translate(
    query: &str,
    vocabulary: &Vocabulary,
    mapping: &TableMapping,
) -> TranslationResult {
    let input_validation = validate_kql(query, Some(vocabulary));
    let mut notes = Vec::new();

    let split = split_stages(query);
    let mut spl = translate_table(&split.head, mapping, &mut notes);

    let mut piped = false;
    for stage in &split.stages {
        let operator = KqlOperator::from(stage.verb());
        spl.push_str(&translate_stage(stage, operator, piped, &mut notes));
        piped |= operator != KqlOperator::Where;
    }

    let output_validation = validate_spl(&spl, Some(vocabulary));
    let result = TranslationResult::new(query, spl, input_validation, output_validation, notes);
    debug!(
        confidence = result.confidence,
        mapping_version = mapping.version(),
        "KQL -> SPL"
    );
    result
}

/// Rewrite the table reference as an `index=` search
pub fn translate_table(table: &str, mapping: &TableMapping, notes: &mut Vec<String>) -> String {
    let resolved = mapping.resolve(table);
    let entry = resolved.entry;
    let note = if entry.note.is_empty() {
        String::new()
    } else {
        format!(" ({})", entry.note)
    };

    let search = match &entry.sourcetype {
        Some(sourcetype) => {
            notes.push(format!(
                "Mapped table \"{table}\" to index=\"{}\" sourcetype=\"{sourcetype}\"{note}",
                entry.index
            ));
            format!("index={} sourcetype=\"{sourcetype}\"", entry.index)
        }
        None => {
            notes.push(format!("Mapped table \"{table}\" to index=\"{}\"{note}", entry.index));
            format!("index={}", entry.index)
        }
    };

    if resolved.fallback {
        warn!(table, index = %entry.index, "No table mapping found, using default index");
        notes.push(format!(
            "WARNING: Unknown table \"{table}\" - using default index. \
             Please verify index/sourcetype in your Splunk environment!"
        ));
    }

    search
}

/// Rewrite one operator stage as SPL, including its leading separator
///
/// `piped` tells whether a command has already been emitted; a `where`
/// before that point extends the base search inline.
pub fn translate_stage(
    stage: &Stage,
    operator: KqlOperator,
    piped: bool,
    notes: &mut Vec<String>,
) -> String {
    let args = stage.args();

    match operator {
        KqlOperator::Where => {
            let condition = args.replace("==", "=");
            if piped {
                format!(" | where {condition}")
            } else {
                format!(" {condition}")
            }
        }
        KqlOperator::Summarize => format!(" | stats {args}"),
        KqlOperator::Extend => format!(" | eval {args}"),
        KqlOperator::Project => format!(" | fields {args}"),
        KqlOperator::ProjectAway => format!(" | fields - {args}"),
        KqlOperator::ProjectRename => project_rename(args),
        KqlOperator::Order => order(args),
        KqlOperator::Take => format!(" | head {args}"),
        KqlOperator::Distinct => format!(" | dedup {args}"),
        KqlOperator::MvExpand => format!(" | mvexpand {args}"),
        KqlOperator::Parse => {
            notes.push("parse requires manual adjustment for regex patterns".to_string());
            format!(" | rex {args}")
        }
        KqlOperator::Other => {
            notes.push(format!("Unknown KQL operator: {}", stage.verb()));
            format!(" | {} /* WARNING: Manual translation needed */", stage.text())
        }
    }
}

fn project_rename(args: &str) -> String {
    let pairs = extract::kql_rename_pairs(args);
    if pairs.is_empty() {
        return format!(" | rename {args}");
    }
    let renames = pairs
        .iter()
        .map(|(new, old)| format!("{old} as {new}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(" | rename {renames}")
}

fn order(args: &str) -> String {
    match extract::order_keys(args) {
        Some(keys) => {
            let keys = keys
                .iter()
                .map(|(column, descending)| {
                    format!("{}{column}", if *descending { '-' } else { '+' })
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!(" | sort {keys}")
        }
        None => format!(" | sort {args}"),
    }
}
