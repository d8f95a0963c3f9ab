//! Queue module
//!
//! Durable hand-off between the enrichment (producer) side and the
//! aggregation (consumer) side. Events travel as JSON documents.

mod rabbitmq;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::{DomainError, Event};

pub use rabbitmq::RabbitQueue;

/// Stream of delivered events; an `Err` item affects only that delivery
pub type EventStream = BoxStream<'static, Result<Event, QueueError>>;

/// Publishing side of the queue
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, queue: &str, event: &Event) -> Result<(), QueueError>;
}

/// Consuming side of the queue
#[async_trait]
pub trait EventConsumer: Send + Sync {
    /// Start consuming; the stream runs until the transport goes away
    async fn consume(&self, queue: &str) -> Result<EventStream, QueueError>;
}

/// Queue errors
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("AMQP error: {0}")]
    Amqp(#[from] lapin::Error),

    #[error(transparent)]
    Payload(#[from] DomainError),

    #[error("Publish was not acknowledged by the broker")]
    NotAcknowledged,
}

impl QueueError {
    /// True when only the payload was bad and the transport is healthy
    pub fn is_payload_error(&self) -> bool {
        matches!(self, QueueError::Payload(_))
    }
}
