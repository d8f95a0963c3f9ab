//! Currency Converter
//!
//! Normalizes bet and deposit amounts into the settlement currency using a
//! cache-aside exchange-rate lookup.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{exchange_rate_key, ExchangeRateCache};
use crate::domain::{is_supported_currency, Event, SETTLEMENT_CURRENCY};
use crate::rates::RateSource;

/// How long a fetched rate stays in the cache
pub const DEFAULT_RATE_TTL: Duration = Duration::from_secs(60);

/// Convert a minor-unit amount with `rate`, rounding half away from zero.
///
/// Returns `None` if the rate is not representable or the result overflows.
pub fn settle(amount: i64, rate: f64) -> Option<i64> {
    let rate = Decimal::from_f64(rate)?;
    Decimal::from(amount)
        .checked_mul(rate)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Converts event amounts into the settlement currency
#[derive(Clone)]
pub struct CurrencyConverter {
    cache: Arc<dyn ExchangeRateCache>,
    rates: Arc<dyn RateSource>,
    ttl: Duration,
}

impl CurrencyConverter {
    /// Create a converter with the default rate TTL
    pub fn new(cache: Arc<dyn ExchangeRateCache>, rates: Arc<dyn RateSource>) -> Self {
        Self {
            cache,
            rates,
            ttl: DEFAULT_RATE_TTL,
        }
    }

    /// Override the cache TTL for fetched rates
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Populate `amount_settlement` for monetary events.
    ///
    /// Never fails: unsupported currencies and rate lookup failures leave
    /// the settlement amount untouched and are logged.
    pub async fn convert(&self, mut event: Event) -> Event {
        if !event.kind.is_monetary() {
            return event;
        }

        if !is_supported_currency(&event.currency) {
            tracing::warn!(
                player_id = event.player_id,
                currency = %event.currency,
                "Unsupported currency, skipping conversion"
            );
            return event;
        }

        if event.currency == SETTLEMENT_CURRENCY {
            event.amount_settlement = event.amount;
            return event;
        }

        let Some(rate) = self.lookup_rate(&event.currency).await else {
            return event;
        };

        match settle(event.amount, rate) {
            Some(settled) => event.amount_settlement = settled,
            None => tracing::error!(
                amount = event.amount,
                currency = %event.currency,
                rate,
                "Settlement amount out of range"
            ),
        }

        event
    }

    /// Cache-aside rate lookup. A freshly fetched rate is used immediately,
    /// even if storing it in the cache fails.
    async fn lookup_rate(&self, currency: &str) -> Option<f64> {
        let key = exchange_rate_key(currency);

        match self.cache.get(&key).await {
            Ok(Some(rate)) => return Some(rate),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache lookup failed, fetching rate");
            }
        }

        let rate = match self.rates.get_rate(currency).await {
            Ok(rate) => rate,
            Err(e) => {
                tracing::error!(currency = %currency, error = %e, "Failed to get exchange rate");
                return None;
            }
        };

        if let Err(e) = self.cache.set(&key, rate, self.ttl).await {
            tracing::warn!(key = %key, error = %e, "Failed to cache exchange rate");
        }

        Some(rate)
    }
}
