//! Configuration errors.
//!
//! Bad user input is never an error here: it becomes a
//! [`FailureRecord`](crate::FailureRecord). These variants mean the rules,
//! registries or settings themselves are wrong, and they abort the call.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SieveError {
    #[error("'{0}' language is not supported.")]
    UnsupportedLanguage(String),

    #[error("'{0}' validator does not exist.")]
    UnknownValidator(String),

    #[error("'{0}' filter does not exist.")]
    UnknownFilter(String),

    #[error("'{0}' validator is already defined.")]
    DuplicateValidator(String),

    #[error("'{0}' filter is already defined.")]
    DuplicateFilter(String),

    #[error("'{0}' validator does not have an error message.")]
    MissingMessage(String),

    #[error("Invalid settings: {0}")]
    Settings(String),

    #[error("Catalog error: {0}")]
    Lang(#[from] sieve_lang::LangError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SieveError>;
