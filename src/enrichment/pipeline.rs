//! Enrichment Pipeline
//!
//! Composes the enrichment steps in their mandatory order:
//! currency -> player -> description.

use crate::domain::Event;

use super::{describe, CurrencyConverter, PlayerContextResolver};

/// Per-event enrichment applied before publication
#[derive(Clone)]
pub struct EnrichmentPipeline {
    converter: CurrencyConverter,
    players: PlayerContextResolver,
}

impl EnrichmentPipeline {
    pub fn new(converter: CurrencyConverter, players: PlayerContextResolver) -> Self {
        Self { converter, players }
    }

    /// Enrich a single event.
    ///
    /// Never drops the event: failing steps degrade their own field only.
    pub async fn enrich(&self, event: Event) -> Event {
        let mut event = self.converter.convert(event).await;
        event.player = self.players.resolve(event.player_id).await;
        event.description = describe(&event);

        tracing::debug!(
            player_id = event.player_id,
            kind = %event.kind,
            amount_settlement = event.amount_settlement,
            "Event enriched"
        );

        event
    }

    /// Release resources held by the enrichment steps
    pub async fn close(&self) {
        self.players.close().await;
    }
}
