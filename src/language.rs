use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TranslateError;

/// The two pipeline query languages the translator understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryLanguage {
    /// Splunk Processing Language
    Spl,
    /// Kusto Query Language
    Kql,
}

impl QueryLanguage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spl => "spl",
            Self::Kql => "kql",
        }
    }

    /// Display name used in explanations
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Spl => "SPL",
            Self::Kql => "KQL",
        }
    }
}

impl fmt::Display for QueryLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryLanguage {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spl" => Ok(Self::Spl),
            "kql" => Ok(Self::Kql),
            _ => Err(TranslateError::UnsupportedLanguage(s.to_string())),
        }
    }
}
