//! Cache module
//!
//! Exchange-rate cache used by the currency converter (cache-aside).
//! The pipeline only depends on the `ExchangeRateCache` trait; Redis is the
//! production backend.

mod error;
mod redis_cache;

use async_trait::async_trait;
use std::time::Duration;

pub use error::CacheError;
pub use redis_cache::RedisCache;

/// Key prefix for cached exchange rates
pub const EXCHANGE_RATE_KEY_PREFIX: &str = "exchange_rate_";

/// Build the cache key for a currency's exchange rate
pub fn exchange_rate_key(currency: &str) -> String {
    format!("{}{}", EXCHANGE_RATE_KEY_PREFIX, currency)
}

/// Key/value store for exchange rates with per-entry TTL
#[async_trait]
pub trait ExchangeRateCache: Send + Sync {
    /// Get a cached rate; `Ok(None)` on miss
    async fn get(&self, key: &str) -> Result<Option<f64>, CacheError>;

    /// Store a rate that expires after `ttl`
    async fn set(&self, key: &str, value: f64, ttl: Duration) -> Result<(), CacheError>;
}
