//! Error types shared across the library.

use thiserror::Error;

/// Failure to obtain target text from a provider.
///
/// Never surfaced past [`crate::provider::TextProvider::text`], which swaps in
/// the fallback sentence instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TextFetchError {
    #[error("quote request failed with status {0}")]
    Status(reqwest::StatusCode),
    #[error("quote response had no content")]
    EmptyContent,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while persisting the config file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Rejected settings values.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("expected a whole number, got {0:?}")]
    NotANumber(String),
    #[error("unsupported time limit {0}s (expected one of 15, 30, 60, 120)")]
    TimeLimit(u32),
    #[error("unsupported word count {0} (expected one of 10, 25, 50, 100)")]
    WordCount(u32),
}
