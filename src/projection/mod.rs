//! Projection module
//!
//! Live read model derived from the consumed event stream.
//! State is in-memory only and starts empty on every process start.

mod materializer;

pub use materializer::{AggregateSnapshot, Materializer, PlayerStat, PlayerTotals, WINDOW_SECS};
