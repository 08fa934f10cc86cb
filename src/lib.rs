//! kqlspl - SPL <-> KQL query translation
//!
//! A best-effort, stage-by-stage transpiler between Splunk's SPL and Kusto's
//! KQL. Every translation comes back with validation findings, notes on
//! anything it was unsure about, and a confidence score.
//!
//! # Modules
//!
//! - [`translator`]: The [`QueryTranslator`] facade and both rewrite directions
//! - [`vocabulary`]: SPL command / KQL operator reference data
//! - [`mapping`]: KQL table to Splunk index/sourcetype mapping and discovery queries
//! - [`stages`]: Pipeline stage splitting
//! - [`validator`]: Structural query checks
//! - [`confidence`]: Confidence scoring
//! - [`explain`]: Plain-language query explanations
//! - [`config`]: Configuration management and serialization

pub mod confidence;
pub mod config;
pub mod error;
pub mod explain;
pub mod language;
pub mod mapping;
pub mod stages;
pub mod translator;
pub mod validator;
pub mod vocabulary;

pub use error::TranslateError;
pub use language::QueryLanguage;
pub use mapping::{TableEntry, TableMapping};
pub use translator::{QueryTranslator, TranslationResult};
pub use validator::ValidationReport;
pub use vocabulary::{ReferenceSource, Vocabulary};
