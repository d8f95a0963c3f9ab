//! Rate source module
//!
//! Fetches exchange rates into the settlement currency from an external API.

mod http;

use async_trait::async_trait;

pub use http::{ExchangeRates, HttpRateSource};

/// Source of exchange rates
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Units of settlement currency per one unit of `currency`
    async fn get_rate(&self, currency: &str) -> Result<f64, RateSourceError>;
}

/// Rate source errors
#[derive(Debug, thiserror::Error)]
pub enum RateSourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(u16),

    #[error("Exchange rate not found for {0}")]
    MissingRate(String),

    #[error("Invalid exchange rate for {currency}: {rate}")]
    InvalidRate { currency: String, rate: f64 },
}
