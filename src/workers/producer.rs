//! Producer worker: enrich raw events and publish them

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::domain::Event;
use crate::enrichment::EnrichmentPipeline;
use crate::queue::EventPublisher;

use super::{Shutdown, WorkerReport};

/// Enrich and publish events until the source is exhausted or shutdown fires.
///
/// A failed publish skips that event only; there is no retry here.
pub async fn run_producer(
    mut source: mpsc::Receiver<Event>,
    pipeline: EnrichmentPipeline,
    publisher: Arc<dyn EventPublisher>,
    queue: String,
    mut shutdown: Shutdown,
) -> WorkerReport {
    let mut report = WorkerReport::default();
    tracing::info!(queue = %queue, "Producer started");

    loop {
        let event = tokio::select! {
            biased;
            _ = shutdown.wait() => {
                tracing::info!("Producer received shutdown signal");
                break;
            }
            next = source.recv() => match next {
                Some(event) => event,
                None => {
                    tracing::info!("Event source exhausted");
                    break;
                }
            },
        };

        let event = pipeline.enrich(event).await;

        match publisher.publish(&queue, &event).await {
            Ok(()) => {
                report.processed += 1;
                tracing::debug!(player_id = event.player_id, kind = %event.kind, "Published event");
            }
            Err(e) => {
                report.failed += 1;
                tracing::error!(player_id = event.player_id, error = %e, "Failed to publish event");
            }
        }
    }

    tracing::info!(
        processed = report.processed,
        failed = report.failed,
        "Producer stopped"
    );
    report
}
