//! Enrichment module
//!
//! Per-event transform applied before publication:
//! currency normalization, player context, then a human-readable description.

mod currency;
mod description;
mod pipeline;
mod player;

pub use currency::{settle, CurrencyConverter, DEFAULT_RATE_TTL};
pub use description::{describe, format_timestamp, UNKNOWN_EVENT, UNKNOWN_GAME};
pub use pipeline::EnrichmentPipeline;
pub use player::PlayerContextResolver;
