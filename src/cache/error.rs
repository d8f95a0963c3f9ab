//! Cache Errors

/// Errors that can occur talking to the cache
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Transport or protocol error from Redis
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}
