//! Error types for message catalogs

use thiserror::Error;

/// Errors raised while building or querying a [`Catalog`](crate::Catalog).
#[derive(Debug, Error)]
pub enum LangError {
    /// Tag is not a language code
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// No bundle exists for the requested language
    #[error("'{0}' language is not supported.")]
    BundleNotFound(String),

    /// Message file is not a flat JSON object of strings
    #[error("Failed to parse message file: {0}")]
    ParseError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parse error
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}
