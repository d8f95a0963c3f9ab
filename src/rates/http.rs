//! HTTP exchange-rate API client
//!
//! Queries `{base_url}?base=<currency>&symbols=EUR` and reads the settlement
//! rate out of a `{"rates": {...}}` document.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::domain::SETTLEMENT_CURRENCY;

use super::{RateSource, RateSourceError};

/// Per-request timeout for the rate API
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Response body of the rate API
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeRates {
    #[serde(default)]
    pub rates: HashMap<String, f64>,
}

impl ExchangeRates {
    /// Extract the settlement rate for `currency`, rejecting absent or nonsensical values
    pub fn settlement_rate(&self, currency: &str) -> Result<f64, RateSourceError> {
        let rate = *self
            .rates
            .get(SETTLEMENT_CURRENCY)
            .ok_or_else(|| RateSourceError::MissingRate(currency.to_string()))?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(RateSourceError::InvalidRate {
                currency: currency.to_string(),
                rate,
            });
        }

        Ok(rate)
    }
}

/// Rate source backed by an HTTP API
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRateSource {
    /// Create a client for the API at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self, RateSourceError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn get_rate(&self, currency: &str) -> Result<f64, RateSourceError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("base", currency), ("symbols", SETTLEMENT_CURRENCY)])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(RateSourceError::UnexpectedStatus(response.status().as_u16()));
        }

        let rates: ExchangeRates = response.json().await?;
        let rate = rates.settlement_rate(currency)?;

        tracing::debug!(currency = %currency, rate, "Fetched exchange rate");
        Ok(rate)
    }
}
