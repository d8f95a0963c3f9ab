//! RabbitMQ transport

use async_trait::async_trait;
use futures::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicPublishOptions, ConfirmSelectOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use std::future::Future;
use uuid::Uuid;

use crate::domain::Event;

use super::{EventConsumer, EventPublisher, EventStream, QueueError};

/// AMQP "persistent" delivery mode
const PERSISTENT: u8 = 2;

/// Event queue over a single AMQP connection and channel
pub struct RabbitQueue {
    connection: Connection,
    channel: Channel,
}

impl RabbitQueue {
    /// Connect to the broker and open a channel with publisher confirms
    pub async fn connect(amqp_url: &str) -> Result<Self, QueueError> {
        let connection = Connection::connect(amqp_url, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await?;

        tracing::info!("RabbitMQ connected");
        Ok(Self {
            connection,
            channel,
        })
    }

    async fn declare(&self, queue: &str) -> Result<(), QueueError> {
        self.channel
            .queue_declare(queue, QueueDeclareOptions::default(), FieldTable::default())
            .await?;
        Ok(())
    }

    /// Close the channel, then the connection
    pub async fn close(&self) {
        if let Err(e) = self.channel.close(200, "OK").await {
            tracing::warn!(error = %e, "Error closing RabbitMQ channel");
        }
        if let Err(e) = self.connection.close(200, "OK").await {
            tracing::warn!(error = %e, "Error closing RabbitMQ connection");
        }
        tracing::info!("RabbitMQ connection closed");
    }
}

#[async_trait]
impl EventPublisher for RabbitQueue {
    async fn publish(&self, queue: &str, event: &Event) -> Result<(), QueueError> {
        self.declare(queue).await?;

        let payload = event.to_json()?;
        let properties = BasicProperties::default()
            .with_content_type("application/json".into())
            .with_delivery_mode(PERSISTENT)
            .with_message_id(Uuid::new_v4().to_string().into());

        let confirmation = self
            .channel
            .basic_publish("", queue, BasicPublishOptions::default(), &payload, properties)
            .await?
            .await?;

        if confirmation.is_nack() {
            return Err(QueueError::NotAcknowledged);
        }

        Ok(())
    }
}

#[async_trait]
impl EventConsumer for RabbitQueue {
    async fn consume(&self, queue: &str) -> Result<EventStream, QueueError> {
        self.declare(queue).await?;

        let consumer_tag = format!("casino_events-{}", Uuid::new_v4());
        let consumer = self
            .channel
            .basic_consume(
                queue,
                &consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;

        tracing::info!(queue = %queue, consumer_tag = %consumer_tag, "Consuming events");

        let stream = consumer.then(|delivery| async move {
            let delivery = delivery?;
            decode_and_ack(&delivery.data, delivery.ack(BasicAckOptions::default())).await
        });

        Ok(stream.boxed())
    }
}

/// Decode a delivery, then acknowledge it.
///
/// Undecodable payloads are acked too so they are never redelivered. A
/// failed ack is logged and does not discard an event that decoded.
async fn decode_and_ack<A>(payload: &[u8], ack: A) -> Result<Event, QueueError>
where
    A: Future<Output = Result<(), lapin::Error>>,
{
    let decoded = Event::from_json(payload);

    if let Err(e) = ack.await {
        tracing::warn!(error = %e, "Failed to acknowledge delivery");
    }

    Ok(decoded?)
}
