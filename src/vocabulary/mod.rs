//! Verb and operator reference data
//!
//! Two independent lookup tables: SPL commands with their nearest KQL
//! equivalent, and KQL operators with their nearest SPL equivalent. Both are
//! read from JSON documents once and never mutated afterwards.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, TranslateError};

/// File name of the SPL reference document
pub const SPL_REFERENCE_FILE: &str = "splunk-reference.json";
/// File name of the KQL reference document
pub const KQL_REFERENCE_FILE: &str = "kql-reference.json";

static BUILTIN_SPL: &str = include_str!("../../reference/splunk-reference.json");
static BUILTIN_KQL: &str = include_str!("../../reference/kql-reference.json");

/// One verb or operator: what it does and what it maps to on the other side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbEntry {
    pub equivalent: String,
    pub description: String,
}

/// Where reference documents come from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReferenceSource {
    /// Documents compiled into the binary
    #[default]
    Builtin,
    /// A directory holding `splunk-reference.json` and `kql-reference.json`
    Directory(PathBuf),
}

#[derive(Deserialize)]
struct SplReference {
    spl_commands: HashMap<String, SplCommandRef>,
}

#[derive(Deserialize)]
struct SplCommandRef {
    #[serde(default)]
    description: String,
    #[serde(default, alias = "equivalent")]
    kql_equivalent: String,
}

#[derive(Deserialize)]
struct KqlReference {
    kql_operators: HashMap<String, KqlOperatorRef>,
}

#[derive(Deserialize)]
struct KqlOperatorRef {
    #[serde(default)]
    description: String,
    #[serde(default, alias = "equivalent")]
    spl_equivalent: String,
}

/// Loaded SPL and KQL reference tables
#[derive(Debug, Clone)]
pub struct Vocabulary {
    spl: HashMap<String, VerbEntry>,
    kql: HashMap<String, VerbEntry>,
    loaded_at: DateTime<Utc>,
}

impl Vocabulary {
    /// Load both reference documents from `source`
    ///
    /// # Errors
    /// Returns an error if either document is missing or cannot be parsed.
    pub async fn load(source: &ReferenceSource) -> Result<Self> {
        let vocabulary = match source {
            ReferenceSource::Builtin => Self::builtin()?,
            ReferenceSource::Directory(dir) => {
                let spl_path = dir.join(SPL_REFERENCE_FILE);
                let kql_path = dir.join(KQL_REFERENCE_FILE);
                let spl_json = read_reference(&spl_path).await?;
                let kql_json = read_reference(&kql_path).await?;
                Self::from_json(&spl_json, &spl_path, &kql_json, &kql_path)?
            }
        };

        info!(
            spl_commands = vocabulary.spl.len(),
            kql_operators = vocabulary.kql.len(),
            "Reference data loaded"
        );
        Ok(vocabulary)
    }

    /// Parse the documents compiled into the crate
    ///
    /// # Errors
    /// Returns an error only if the built-in documents are malformed.
    pub fn builtin() -> Result<Self> {
        Self::from_json(
            BUILTIN_SPL,
            Path::new("<builtin>/splunk-reference.json"),
            BUILTIN_KQL,
            Path::new("<builtin>/kql-reference.json"),
        )
    }

    /// Build a vocabulary from the two JSON documents
    ///
    /// The paths only label parse errors.
    pub fn from_json(
        spl_json: &str,
        spl_path: &Path,
        kql_json: &str,
        kql_path: &Path,
    ) -> Result<Self> {
        let spl: SplReference =
            serde_json::from_str(spl_json).map_err(|source| TranslateError::ReferenceParse {
                path: spl_path.to_path_buf(),
                source,
            })?;
        let kql: KqlReference =
            serde_json::from_str(kql_json).map_err(|source| TranslateError::ReferenceParse {
                path: kql_path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            spl: spl
                .spl_commands
                .into_iter()
                .map(|(name, cmd)| {
                    (
                        name,
                        VerbEntry {
                            equivalent: cmd.kql_equivalent,
                            description: cmd.description,
                        },
                    )
                })
                .collect(),
            kql: kql
                .kql_operators
                .into_iter()
                .map(|(name, op)| {
                    (
                        name,
                        VerbEntry {
                            equivalent: op.spl_equivalent,
                            description: op.description,
                        },
                    )
                })
                .collect(),
            loaded_at: Utc::now(),
        })
    }

    /// Look up an SPL command (case-sensitive)
    #[must_use]
    pub fn spl_command(&self, name: &str) -> Option<&VerbEntry> {
        self.spl.get(name)
    }

    /// Look up a KQL operator (case-sensitive)
    #[must_use]
    pub fn kql_operator(&self, name: &str) -> Option<&VerbEntry> {
        self.kql.get(name)
    }

    #[must_use]
    pub fn spl_len(&self) -> usize {
        self.spl.len()
    }

    #[must_use]
    pub fn kql_len(&self) -> usize {
        self.kql.len()
    }

    #[must_use]
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Whether the data is older than `interval`
    #[must_use]
    pub fn is_stale(&self, interval: Duration) -> bool {
        Utc::now() - self.loaded_at > interval
    }
}

async fn read_reference(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TranslateError::ReferenceRead {
            path: path.to_path_buf(),
            source,
        })
}
