//! Query translator for SPL <-> KQL
//!
//! [`QueryTranslator`] owns the reference vocabulary (loaded on first use)
//! and the table mapping, and routes each request to the direction-specific
//! rewriter in [`spl_to_kql`] or [`kql_to_spl`].

pub mod extract;
pub mod kql_to_spl;
pub mod spl_to_kql;
pub mod verbs;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::OnceCell;
use tracing::info;

use crate::confidence;
use crate::error::{Result, TranslateError};
use crate::explain;
use crate::language::QueryLanguage;
use crate::mapping::{self, TableEntry, TableMapping};
use crate::validator::ValidationReport;
use crate::vocabulary::{ReferenceSource, Vocabulary};

/// Default age after which reference data counts as stale
pub const DEFAULT_REFRESH_DAYS: u32 = 7;

/// Outcome of one translation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub original_query: String,
    pub translated_query: String,
    pub input_validation: ValidationReport,
    pub output_validation: ValidationReport,
    /// Every non-trivial decision and unmapped construct, in order
    pub translation_notes: Vec<String>,
    /// 0-100
    pub confidence: u8,
}

impl TranslationResult {
    /// Assemble a result and score it
    #[must_use]
    pub fn new(
        original_query: &str,
        translated_query: String,
        input_validation: ValidationReport,
        output_validation: ValidationReport,
        translation_notes: Vec<String>,
    ) -> Self {
        let confidence =
            confidence::score(&input_validation, &output_validation, &translation_notes);
        Self {
            original_query: original_query.to_string(),
            translated_query,
            input_validation,
            output_validation,
            translation_notes,
            confidence,
        }
    }
}

/// Bidirectional SPL/KQL translator
#[derive(Debug)]
pub struct QueryTranslator {
    reference: ReferenceSource,
    refresh_interval: Duration,
    vocabulary: OnceCell<Vocabulary>,
    table_mapping: TableMapping,
}

impl Default for QueryTranslator {
    fn default() -> Self {
        Self::new(ReferenceSource::Builtin, TableMapping::with_defaults())
    }
}

impl QueryTranslator {
    /// Create a translator; reference data is read on first use
    #[must_use]
    pub fn new(reference: ReferenceSource, table_mapping: TableMapping) -> Self {
        Self {
            reference,
            refresh_interval: Duration::days(i64::from(DEFAULT_REFRESH_DAYS)),
            vocabulary: OnceCell::new(),
            table_mapping,
        }
    }

    /// Create a translator around an already loaded vocabulary
    #[must_use]
    pub fn with_vocabulary(vocabulary: Vocabulary, table_mapping: TableMapping) -> Self {
        let mut translator = Self::new(ReferenceSource::Builtin, table_mapping);
        translator.vocabulary = OnceCell::new_with(Some(vocabulary));
        translator
    }

    /// Set how old reference data may get before [`Self::needs_update`] reports it
    #[must_use]
    pub fn with_refresh_interval(mut self, days: u32) -> Self {
        self.refresh_interval = Duration::days(i64::from(days));
        self
    }

    /// Reference vocabulary, loading it on the first call
    ///
    /// # Errors
    /// Returns an error if the reference documents are missing or malformed.
    /// A failed load is not cached; the next call tries again.
    pub async fn vocabulary(&self) -> Result<&Vocabulary> {
        self.vocabulary
            .get_or_try_init(|| Vocabulary::load(&self.reference))
            .await
    }

    /// Whether reference data is missing or older than the refresh interval
    #[must_use]
    pub fn needs_update(&self) -> bool {
        self.vocabulary
            .get()
            .map_or(true, |vocab| vocab.is_stale(self.refresh_interval))
    }

    /// Translate `query` between two languages
    ///
    /// # Errors
    /// Returns [`TranslateError::UnsupportedPair`] unless the languages
    /// differ, or a load error if reference data is unavailable.
    pub async fn translate(
        &self,
        query: &str,
        from: QueryLanguage,
        to: QueryLanguage,
    ) -> Result<TranslationResult> {
        match (from, to) {
            (QueryLanguage::Spl, QueryLanguage::Kql) => self.translate_spl_to_kql(query).await,
            (QueryLanguage::Kql, QueryLanguage::Spl) => self.translate_kql_to_spl(query).await,
            _ => Err(TranslateError::UnsupportedPair {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }

    /// Translate with language names given as strings (case-insensitive)
    ///
    /// # Errors
    /// Returns [`TranslateError::UnsupportedPair`] naming both languages when
    /// either is unknown or they are the same.
    pub async fn translate_named(
        &self,
        query: &str,
        from: &str,
        to: &str,
    ) -> Result<TranslationResult> {
        let unsupported = || TranslateError::UnsupportedPair {
            from: from.to_lowercase(),
            to: to.to_lowercase(),
        };
        let source: QueryLanguage = from.parse().map_err(|_| unsupported())?;
        let target: QueryLanguage = to.parse().map_err(|_| unsupported())?;
        self.translate(query, source, target).await
    }

    /// Translate an SPL query to KQL
    ///
    /// # Errors
    /// Returns an error only if reference data cannot be loaded.
    pub async fn translate_spl_to_kql(&self, query: &str) -> Result<TranslationResult> {
        let vocabulary = self.vocabulary().await?;
        Ok(spl_to_kql::translate(query, vocabulary))
    }

    /// Translate a KQL query to SPL using the current table mapping
    ///
    /// # Errors
    /// Returns an error only if reference data cannot be loaded.
    pub async fn translate_kql_to_spl(&self, query: &str) -> Result<TranslationResult> {
        let vocabulary = self.vocabulary().await?;
        Ok(kql_to_spl::translate(query, vocabulary, &self.table_mapping))
    }

    /// Explain what a query does, one numbered line per stage
    ///
    /// # Errors
    /// Returns an error only if reference data cannot be loaded.
    pub async fn explain_query(&self, query: &str, language: QueryLanguage) -> Result<String> {
        let vocabulary = self.vocabulary().await?;
        Ok(explain::explain(query, language, vocabulary))
    }

    /// Overlay table mapping entries onto the current mapping
    pub fn set_table_mapping<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, TableEntry)>,
    {
        self.table_mapping = self.table_mapping.merged(entries);
        info!(
            version = self.table_mapping.version(),
            entries = self.table_mapping.len(),
            "Table mapping updated"
        );
    }

    #[must_use]
    pub fn table_mapping(&self) -> &TableMapping {
        &self.table_mapping
    }

    /// SPL queries for locating a table's data in Splunk
    #[must_use]
    pub fn generate_discovery_queries(&self, table: Option<&str>) -> BTreeMap<String, String> {
        mapping::discovery_queries(table)
    }
}
