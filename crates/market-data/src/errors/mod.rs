//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all market data operations
//! - [`retry_transient`]: Bounded retry driven by [`MarketDataError::is_transient`]

mod retry;

pub use retry::{retry_transient, MAX_ATTEMPTS};

use thiserror::Error;

/// Errors that can occur while talking to the market data provider.
///
/// Each variant is classified by [`is_transient`](Self::is_transient), which
/// determines whether the client retries the request before giving up.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    /// This is a terminal error - retrying won't help.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider rate limited the request (HTTP 429) or the account
    /// exceeded its usage quota (HTTP 402).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred: an error status with a message
    /// body, a rejected token, or a payload that failed a sanity check.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider response body could not be deserialized.
    #[error("Failed to parse provider response: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A network error occurred while communicating with the provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Whether the request that produced this error is worth retrying.
    ///
    /// Rate limits and timeouts clear on their own; everything else is
    /// terminal for the current request.
    ///
    /// # Examples
    ///
    /// ```
    /// use paperfolio_market_data::MarketDataError;
    ///
    /// let error = MarketDataError::RateLimited { provider: "IEX".to_string() };
    /// assert!(error.is_transient());
    ///
    /// let error = MarketDataError::SymbolNotFound("INVALID".to_string());
    /// assert!(!error.is_transient());
    /// ```
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Timeout { .. })
    }
}
