//! Error types for the translation library
//!
//! Only load failures and unsupported language requests are errors. Anything
//! wrong with the query itself is reported through notes and validation
//! findings on the [`TranslationResult`](crate::translator::TranslationResult).

use std::path::PathBuf;

/// Errors surfaced by [`QueryTranslator`](crate::translator::QueryTranslator)
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Unsupported translation: {from} to {to}")]
    UnsupportedPair { from: String, to: String },

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Failed to read reference data from {path}: {source}")]
    ReferenceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse reference data from {path}: {source}")]
    ReferenceParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read table mapping from {path}: {source}")]
    MappingRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse table mapping from {path}: {source}")]
    MappingParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, TranslateError>;
