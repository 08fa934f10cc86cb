//! Verbs and operators with a dedicated rewrite rule
//!
//! Anything not listed here goes through the `Other` arm: the generic
//! vocabulary mapping for SPL, a manual-translation marker for KQL.

/// SPL commands with a specific KQL rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplVerb {
    Stats,
    Eval,
    Where,
    Fields,
    Table,
    Sort,
    Head,
    Dedup,
    Rename,
    Mvexpand,
    Spath,
    Rex,
    Timechart,
    Other,
}

impl From<&str> for SplVerb {
    fn from(name: &str) -> Self {
        match name {
            "stats" => Self::Stats,
            "eval" => Self::Eval,
            "where" => Self::Where,
            "fields" => Self::Fields,
            "table" => Self::Table,
            "sort" => Self::Sort,
            "head" => Self::Head,
            "dedup" => Self::Dedup,
            "rename" => Self::Rename,
            "mvexpand" => Self::Mvexpand,
            "spath" => Self::Spath,
            "rex" => Self::Rex,
            "timechart" => Self::Timechart,
            _ => Self::Other,
        }
    }
}

/// KQL operators with a specific SPL rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KqlOperator {
    Where,
    Summarize,
    Extend,
    Project,
    ProjectAway,
    ProjectRename,
    /// `order` and its synonym `sort`
    Order,
    /// `take` and its synonym `limit`
    Take,
    Distinct,
    MvExpand,
    Parse,
    Other,
}

impl From<&str> for KqlOperator {
    fn from(name: &str) -> Self {
        match name {
            "where" => Self::Where,
            "summarize" => Self::Summarize,
            "extend" => Self::Extend,
            "project" => Self::Project,
            "project-away" => Self::ProjectAway,
            "project-rename" => Self::ProjectRename,
            "order" | "sort" => Self::Order,
            "take" | "limit" => Self::Take,
            "distinct" => Self::Distinct,
            "mv-expand" => Self::MvExpand,
            "parse" => Self::Parse,
            _ => Self::Other,
        }
    }
}
