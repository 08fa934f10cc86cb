//! Pattern extraction for structured predicates and verb arguments
//!
//! Each function pulls one construct out of a stage's text and returns it as
//! written (minus quoting where noted). None of them interpret nesting.

use once_cell::sync::Lazy;
use regex::Regex;

static INDEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bindex=(\S+)").unwrap());
static SOURCETYPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bsourcetype=(\S+)").unwrap());
static SOURCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bsource=(\S+)").unwrap());
static EARLIEST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bearliest=(-?\d+[smhd]|"[^"]+"|\S+)"#).unwrap());
static CRITERIA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:index|source|sourcetype)=\S+").unwrap());
static EARLIEST_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bearliest=(?:"[^"]+"|\S+)"#).unwrap());
static SPAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bspan=(\S+)").unwrap());
static SPL_RENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^\s,]+)\s+(?i:as)\s+([^\s,]+)").unwrap());
static KQL_RENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^\s,=]+)\s*=\s*([^\s,]+)").unwrap());
static ORDER_BY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^by\s+(.+)$").unwrap());

fn strip_quotes(value: &str) -> String {
    value.replace('"', "")
}

/// Raw value of `index=<value>` in an SPL head
#[must_use]
pub fn index_value(head: &str) -> Option<&str> {
    capture(&INDEX_RE, head)
}

/// KQL table name for an SPL index value: wildcards and quotes removed
#[must_use]
pub fn table_from_index(value: &str) -> String {
    value.replace(['*', '"'], "")
}

/// `sourcetype=<value>` with quotes removed
#[must_use]
pub fn sourcetype_value(head: &str) -> Option<String> {
    capture(&SOURCETYPE_RE, head).map(strip_quotes)
}

/// `source=<value>` with quotes removed; never matches `sourcetype=`
#[must_use]
pub fn source_value(head: &str) -> Option<String> {
    capture(&SOURCE_RE, head).map(strip_quotes)
}

/// `earliest=<value>` with quotes removed, e.g. `-24h`
#[must_use]
pub fn earliest_value(head: &str) -> Option<String> {
    capture(&EARLIEST_RE, head).map(strip_quotes)
}

/// Argument for KQL `ago()`: the earliest value without its leading `-`
#[must_use]
pub fn ago_argument(earliest: &str) -> &str {
    earliest.strip_prefix('-').unwrap_or(earliest)
}

/// Free-text search terms of an SPL head
///
/// Drops `index=`, `source=` and `sourcetype=` criteria and every other
/// `key=value` token, then strips quotes from what is left.
#[must_use]
pub fn free_text_terms(head: &str) -> Vec<String> {
    CRITERIA_RE
        .replace_all(head, "")
        .split_whitespace()
        .filter(|token| !token.contains('='))
        .map(strip_quotes)
        .filter(|term| !term.is_empty())
        .collect()
}

/// `key=value` tokens of an SPL head with no KQL rendering
///
/// Everything except `index=`, `source=`, `sourcetype=` and `earliest=`,
/// returned as written. Quoted values containing spaces are not rejoined.
#[must_use]
pub fn unmapped_filters(head: &str) -> Vec<String> {
    let head = EARLIEST_TOKEN_RE.replace_all(head, "");
    CRITERIA_RE
        .replace_all(&head, "")
        .split_whitespace()
        .filter(|token| token.contains('='))
        .map(str::to_string)
        .collect()
}

/// Value of a `key=value` token among whitespace-separated arguments
#[must_use]
pub fn keyword_arg<'a>(args: &'a str, key: &str) -> Option<&'a str> {
    args.split_whitespace().find_map(|token| {
        token
            .strip_prefix(key)
            .and_then(|rest| rest.strip_prefix('='))
            .filter(|value| !value.is_empty())
    })
}

/// JSON path of an `spath` call with `{}` array markers removed
#[must_use]
pub fn json_path(path: &str) -> String {
    path.replace(['{', '}'], "")
}

/// `span=<value>` of a timechart and the remaining arguments
#[must_use]
pub fn span_and_rest(args: &str) -> (Option<&str>, String) {
    let span = capture(&SPAN_RE, args);
    let rest = SPAN_RE
        .replace(args, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    (span, rest)
}

/// Sort keys of an SPL `sort`: `(field, descending)` per key
///
/// Keys are separated by commas or whitespace. `-field` sorts descending,
/// `+field` or a bare field ascending, and a lone `-`/`+` applies to the
/// next field. Returns `None` for anything else, including the leading
/// limit of `sort 10 -x` and function keys such as `num(x)`.
#[must_use]
pub fn sort_keys(args: &str) -> Option<Vec<(&str, bool)>> {
    let mut keys = Vec::new();
    let mut sign = None;

    for token in args.split(|c: char| c == ',' || c.is_whitespace()) {
        match token {
            "" => continue,
            "-" | "+" if sign.is_none() => {
                sign = Some(token == "-");
                continue;
            }
            _ => {}
        }

        let (field, descending) = match (token.strip_prefix('-'), token.strip_prefix('+')) {
            (Some(field), _) if sign.is_none() => (field, true),
            (_, Some(field)) if sign.is_none() => (field, false),
            _ => (token, sign.unwrap_or(false)),
        };
        sign = None;

        if !is_sort_field(field) {
            return None;
        }
        keys.push((field, descending));
    }

    (sign.is_none() && !keys.is_empty()).then_some(keys)
}

fn is_sort_field(field: &str) -> bool {
    !field.is_empty()
        && !field.chars().all(|c| c.is_ascii_digit())
        && field
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | ':' | '@'))
}

/// `old as new` pairs of an SPL `rename`, in order
#[must_use]
pub fn spl_rename_pairs(args: &str) -> Vec<(&str, &str)> {
    SPL_RENAME_RE
        .captures_iter(args)
        .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
        .collect()
}

/// `new = old` pairs of a KQL `project-rename`, in order
#[must_use]
pub fn kql_rename_pairs(args: &str) -> Vec<(&str, &str)> {
    KQL_RENAME_RE
        .captures_iter(args)
        .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
        .collect()
}

/// Columns of a KQL `order by`/`sort by`: `(column, descending)` per key
///
/// A key without a direction counts as ascending. Returns `None` when the
/// arguments do not start with `by`.
#[must_use]
pub fn order_keys(args: &str) -> Option<Vec<(&str, bool)>> {
    let list = capture(&ORDER_BY_RE, args.trim())?;
    let keys: Vec<(&str, bool)> = list
        .split(',')
        .filter_map(|key| {
            let mut parts = key.split_whitespace();
            let column = parts.next()?;
            let descending = parts.next().is_some_and(|dir| dir.eq_ignore_ascii_case("desc"));
            Some((column, descending))
        })
        .collect();
    (!keys.is_empty()).then_some(keys)
}

fn capture<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}
