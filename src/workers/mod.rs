//! Workers
//!
//! Long-lived loops on either side of the queue: the producer enriches and
//! publishes, the consumer aggregates. They share nothing but the queue and
//! the shutdown signal.

mod consumer;
mod producer;
mod shutdown;
mod source;

pub use consumer::run_consumer;
pub use producer::run_producer;
pub use shutdown::{shutdown_channel, Shutdown, ShutdownTrigger};
pub use source::read_events;

/// Outcome of a worker run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    /// Events handled successfully
    pub processed: u64,
    /// Events that were skipped after a failure
    pub failed: u64,
}
