//! Consumer worker: aggregate events delivered by the queue

use futures::StreamExt;
use std::sync::Arc;

use crate::projection::Materializer;
use crate::queue::{EventConsumer, QueueError};

use super::{Shutdown, WorkerReport};

/// Feed delivered events into the materializer until shutdown or stream end.
///
/// # Errors
/// Fails only if consumption cannot be started; per-delivery errors are
/// logged and counted.
pub async fn run_consumer(
    consumer: Arc<dyn EventConsumer>,
    queue: String,
    materializer: Arc<Materializer>,
    mut shutdown: Shutdown,
) -> Result<WorkerReport, QueueError> {
    let mut stream = consumer.consume(&queue).await?;
    let mut report = WorkerReport::default();
    tracing::info!(queue = %queue, "Consumer started");

    loop {
        let delivery = tokio::select! {
            biased;
            _ = shutdown.wait() => {
                tracing::info!("Consumer received shutdown signal");
                break;
            }
            next = stream.next() => match next {
                Some(delivery) => delivery,
                None => {
                    tracing::warn!("Event stream ended");
                    break;
                }
            },
        };

        match delivery {
            Ok(event) => {
                materializer.observe(&event);
                report.processed += 1;
                tracing::debug!(
                    player_id = event.player_id,
                    kind = %event.kind,
                    description = %event.description,
                    "Event consumed"
                );
            }
            Err(e) if e.is_payload_error() => {
                report.failed += 1;
                tracing::warn!(error = %e, "Skipping undecodable event");
            }
            Err(e) => {
                report.failed += 1;
                tracing::error!(error = %e, "Failed to receive event");
            }
        }
    }

    tracing::info!(
        processed = report.processed,
        failed = report.failed,
        "Consumer stopped"
    );
    Ok(report)
}
