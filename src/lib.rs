//! casino_events Library
//!
//! Re-exports modules for the binary and for integration testing.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod domain;
pub mod enrichment;
pub mod error;
pub mod players;
pub mod projection;
pub mod queue;
pub mod rates;
pub mod workers;

pub use config::Config;
pub use domain::{Event, EventKind, Player};
pub use enrichment::EnrichmentPipeline;
pub use error::{AppError, AppResult};
pub use projection::{AggregateSnapshot, Materializer};
