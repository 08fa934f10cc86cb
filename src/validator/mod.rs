//! Lightweight structural checks for SPL and KQL queries
//!
//! Findings are data, never failures. Errors make a report invalid; warnings
//! only lower the confidence score.

use serde::{Deserialize, Serialize};

use crate::stages::{leading_token, split_stages};
use crate::vocabulary::Vocabulary;

/// Prefixes that make a leading SPL token a search criterion rather than a command
pub const SEARCH_PREFIXES: [&str; 3] = ["index=", "source=", "sourcetype="];

/// Outcome of validating one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl ValidationReport {
    fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

fn is_search_criterion(token: &str) -> bool {
    SEARCH_PREFIXES.iter().any(|prefix| token.starts_with(prefix))
}

/// Validate an SPL query
///
/// Without a vocabulary the command recognition check is skipped.
#[must_use]
pub fn validate_spl(query: &str, vocabulary: Option<&Vocabulary>) -> ValidationReport {
    let mut warnings = Vec::new();

    if !query.contains('|') && !is_search_criterion(query.trim_start()) {
        warnings.push("Query may be missing pipe character for chaining commands".to_string());
    }

    if let Some(vocab) = vocabulary {
        for stage in split_stages(query).iter_text() {
            let command = leading_token(stage);
            if vocab.spl_command(command).is_none() && !is_search_criterion(command) {
                warnings.push(format!("Unknown SPL command: {command}"));
            }
        }
    }

    ValidationReport::new(Vec::new(), warnings)
}

/// Validate a KQL query
///
/// The head stage is the table reference and is never checked against the
/// operator list.
#[must_use]
pub fn validate_kql(query: &str, vocabulary: Option<&Vocabulary>) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !query.contains('|') {
        warnings.push("Query may be missing pipe character for chaining operators".to_string());
    }

    let first_line = query.lines().map(str::trim).find(|line| !line.is_empty());
    if first_line.is_some_and(|line| line.starts_with('|')) {
        errors.push("KQL query must start with a table name, not a pipe".to_string());
    }

    if let Some(vocab) = vocabulary {
        for stage in &split_stages(query).stages {
            let operator = stage.verb();
            if vocab.kql_operator(operator).is_none() {
                warnings.push(format!("Unknown KQL operator: {operator}"));
            }
        }
    }

    ValidationReport::new(errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::builtin().unwrap()
    }

    #[test]
    fn test_default_report_is_valid() {
        let report = ValidationReport::default();
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_valid_spl() {
        let report = validate_spl("index=main | stats count by host", Some(&vocab()));
        assert!(report.valid);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_spl_without_pipe() {
        let report = validate_spl("index=main error", Some(&vocab()));
        assert!(report.warnings.is_empty());

        let report = validate_spl("sourcetype=syslog", Some(&vocab()));
        assert!(report.warnings.is_empty());

        let report = validate_spl("error", Some(&vocab()));
        assert!(report.valid);
        assert_eq!(
            report.warnings,
            vec![
                "Query may be missing pipe character for chaining commands".to_string(),
                "Unknown SPL command: error".to_string(),
            ]
        );
    }

    #[test]
    fn test_spl_unknown_command() {
        let report = validate_spl("index=main | frobnicate x", Some(&vocab()));
        assert!(report.valid);
        assert_eq!(report.warnings, vec!["Unknown SPL command: frobnicate".to_string()]);
    }

    #[test]
    fn test_spl_without_vocabulary_skips_recognition() {
        let report = validate_spl("index=main | frobnicate x", None);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_valid_kql() {
        let query = "SecurityEvent\n| where EventID == 4624\n| take 10";
        let report = validate_kql(query, Some(&vocab()));
        assert!(report.valid);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_kql_starting_with_pipe() {
        let report = validate_kql("\n  | where x == 1", Some(&vocab()));
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec!["KQL query must start with a table name, not a pipe".to_string()]
        );
    }

    #[test]
    fn test_kql_table_not_checked() {
        let report = validate_kql("summarize | take 5", Some(&vocab()));
        assert!(report.warnings.is_empty());

        let report = validate_kql("MyTable", Some(&vocab()));
        assert_eq!(
            report.warnings,
            vec!["Query may be missing pipe character for chaining operators".to_string()]
        );
    }

    #[test]
    fn test_kql_unknown_operator() {
        let report = validate_kql("T | bogus x", Some(&vocab()));
        assert_eq!(report.warnings, vec!["Unknown KQL operator: bogus".to_string()]);
        assert!(validate_kql("T | bogus x", None).warnings.is_empty());
    }
}
