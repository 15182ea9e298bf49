use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::TextFetchError;

/// Served whenever a provider cannot produce text
pub const FALLBACK_TEXT: &str = "The quick brown fox jumps over the lazy dog. This is a fallback text in case the API fails to respond.";

pub const DEFAULT_QUOTE_ENDPOINT: &str = "https://api.quotable.io/random";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimum and maximum characters per requested word
const MIN_CHARS_PER_WORD: usize = 4;
const MAX_CHARS_PER_WORD: usize = 7;

/// Source of target text for a session
pub trait TextProvider {
    fn fetch(&self, word_count: usize) -> Result<String, TextFetchError>;

    /// Like [`TextProvider::fetch`], with failures and blank text replaced
    /// by [`FALLBACK_TEXT`]. Never returns an empty string.
    fn text(&self, word_count: usize) -> String {
        match self.fetch(word_count) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!(word_count, "Provider returned blank text, using fallback text");
                FALLBACK_TEXT.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, word_count, "Text fetch failed, using fallback text");
                FALLBACK_TEXT.to_string()
            }
        }
    }
}

impl<P: TextProvider + ?Sized> TextProvider for Box<P> {
    fn fetch(&self, word_count: usize) -> Result<String, TextFetchError> {
        (**self).fetch(word_count)
    }
}

/// Character length band for a quote of roughly `word_count` words
pub fn length_band(word_count: usize) -> (usize, usize) {
    (
        word_count * MIN_CHARS_PER_WORD,
        word_count * MAX_CHARS_PER_WORD,
    )
}

#[derive(Debug, Deserialize)]
struct Quote {
    content: String,
}

/// Fetches a random quote over HTTP
#[derive(Debug, Clone)]
pub struct QuoteProvider {
    client: Client,
    endpoint: String,
}

impl QuoteProvider {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TextFetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TextProvider for QuoteProvider {
    fn fetch(&self, word_count: usize) -> Result<String, TextFetchError> {
        let (min_length, max_length) = length_band(word_count);
        tracing::debug!(endpoint = %self.endpoint, min_length, max_length, "Requesting quote");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("minLength", min_length), ("maxLength", max_length)])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(TextFetchError::Status(status));
        }

        let quote: Quote = response.json()?;
        if quote.content.trim().is_empty() {
            return Err(TextFetchError::EmptyContent);
        }
        Ok(quote.content)
    }
}

/// Always yields the same text, e.g. a custom prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticText {
    text: String,
}

impl StaticText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TextProvider for StaticText {
    fn fetch(&self, _word_count: usize) -> Result<String, TextFetchError> {
        if self.text.is_empty() {
            Err(TextFetchError::EmptyContent)
        } else {
            Ok(self.text.clone())
        }
    }
}
