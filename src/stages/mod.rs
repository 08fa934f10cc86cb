//! Pipeline stage splitting
//!
//! A query is a head stage followed by verb stages, separated by `|`.
//! Quoting is not interpreted: a `|` inside a string literal splits the query
//! just like any other pipe.

/// One `verb args...` stage after the head
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    text: String,
}

impl Stage {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    /// Full trimmed stage text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Leading token naming the verb or operator
    #[must_use]
    pub fn verb(&self) -> &str {
        leading_token(&self.text)
    }

    /// Everything after the verb, trimmed
    #[must_use]
    pub fn args(&self) -> &str {
        self.text[self.verb().len()..].trim()
    }
}

/// A split query: head stage plus the verb stages that follow it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stages {
    /// Search criteria (SPL) or table reference (KQL); may be empty
    pub head: String,
    pub stages: Vec<Stage>,
}

impl Stages {
    /// Head followed by every verb stage, skipping an empty head
    pub fn iter_text(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.head.as_str())
            .filter(|head| !head.is_empty())
            .chain(self.stages.iter().map(Stage::text))
    }
}

/// Split `query` into its head and verb stages
///
/// Lines are trimmed and joined with a single space before splitting, empty
/// pieces are dropped, and the head is always kept even when empty.
#[must_use]
pub fn split_stages(query: &str) -> Stages {
    let joined = join_lines(query);
    let mut pieces = joined.split('|').map(str::trim);

    let head = pieces.next().unwrap_or_default().to_string();
    let stages = pieces
        .filter(|piece| !piece.is_empty())
        .map(Stage::new)
        .collect();

    Stages { head, stages }
}

/// Trim every line, drop blank ones and join the rest with a space
#[must_use]
pub fn join_lines(query: &str) -> String {
    query
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First whitespace-delimited token, or `""`
#[must_use]
pub fn leading_token(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        let split = split_stages("index=main error | stats count by host | sort -count");
        assert_eq!(split.head, "index=main error");
        assert_eq!(split.stages.len(), 2);
        assert_eq!(split.stages[0].verb(), "stats");
        assert_eq!(split.stages[0].args(), "count by host");
        assert_eq!(split.stages[1].text(), "sort -count");
    }

    #[test]
    fn test_multiline_query() {
        let split = split_stages("SecurityEvent\n| where EventID == 4624\n\n  | take 10\n");
        assert_eq!(split.head, "SecurityEvent");
        assert_eq!(split.stages[0].text(), "where EventID == 4624");
        assert_eq!(split.stages[1].args(), "10");
    }

    #[test]
    fn test_empty_pieces_dropped_head_kept() {
        let split = split_stages("index=main ||| stats count");
        assert_eq!(split.head, "index=main");
        assert_eq!(split.stages.len(), 1);

        let split = split_stages("| metadata type=sourcetypes");
        assert_eq!(split.head, "");
        assert_eq!(split.stages[0].verb(), "metadata");
    }

    #[test]
    fn test_empty_query() {
        let split = split_stages("");
        assert_eq!(split, Stages::default());
        assert_eq!(split.iter_text().count(), 0);

        let split = split_stages("|");
        assert_eq!(split.head, "");
        assert!(split.stages.is_empty());
    }

    #[test]
    fn test_verb_without_args() {
        let split = split_stages("T | count");
        assert_eq!(split.stages[0].verb(), "count");
        assert_eq!(split.stages[0].args(), "");
    }

    #[test]
    fn test_quoted_pipe_still_splits() {
        let split = split_stages(r#"index=main "a|b" | stats count"#);
        assert_eq!(split.head, r#"index=main "a"#);
        assert_eq!(split.stages[0].text(), r#"b""#);
    }
}
