//! Common test utilities
//!
//! In-memory stand-ins for the external collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use casino_events::cache::{CacheError, ExchangeRateCache};
use casino_events::domain::{Event, Player};
use casino_events::enrichment::{CurrencyConverter, EnrichmentPipeline, PlayerContextResolver};
use casino_events::players::{PlayerRepository, PlayerRepositoryError};
use casino_events::queue::{EventConsumer, EventPublisher, EventStream, QueueError};
use casino_events::rates::{RateSource, RateSourceError};

/// Fixed timestamp used across tests
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 2, 15, 4, 0).unwrap()
}

fn redis_down() -> CacheError {
    CacheError::Redis(redis::RedisError::from((
        redis::ErrorKind::IoError,
        "connection refused",
    )))
}

// =========================================================================
// Cache
// =========================================================================

#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (f64, Duration)>>,
    gets: AtomicUsize,
    sets: AtomicUsize,
    fail_get: bool,
    fail_set: bool,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(self, currency: &str, rate: f64) -> Self {
        self.entries.lock().unwrap().insert(
            format!("exchange_rate_{}", currency),
            (rate, Duration::from_secs(60)),
        );
        self
    }

    pub fn failing_get(mut self) -> Self {
        self.fail_get = true;
        self
    }

    pub fn failing_set(mut self) -> Self {
        self.fail_set = true;
        self
    }

    pub fn entry(&self, key: &str) -> Option<(f64, Duration)> {
        self.entries.lock().unwrap().get(key).copied()
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn accesses(&self) -> usize {
        self.gets() + self.sets()
    }
}

#[async_trait]
impl ExchangeRateCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<f64>, CacheError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_get {
            return Err(redis_down());
        }
        Ok(self.entries.lock().unwrap().get(key).map(|(rate, _)| *rate))
    }

    async fn set(&self, key: &str, value: f64, ttl: Duration) -> Result<(), CacheError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_set {
            return Err(redis_down());
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value, ttl));
        Ok(())
    }
}

// =========================================================================
// Rate source
// =========================================================================

#[derive(Default)]
pub struct StaticRateSource {
    rates: HashMap<String, f64>,
    calls: AtomicUsize,
}

impl StaticRateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, currency: &str, rate: f64) -> Self {
        self.rates.insert(currency.to_string(), rate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateSource for StaticRateSource {
    async fn get_rate(&self, currency: &str) -> Result<f64, RateSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rates
            .get(currency)
            .copied()
            .ok_or_else(|| RateSourceError::UnexpectedStatus(503))
    }
}

// =========================================================================
// Player repository
// =========================================================================

#[derive(Default)]
pub struct InMemoryPlayers {
    players: HashMap<i64, Player>,
    fail: bool,
    closed: AtomicBool,
}

impl InMemoryPlayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(mut self, id: i64, email: &str) -> Self {
        self.players.insert(
            id,
            Player {
                email: email.to_string(),
                last_signed_in_at: t0(),
            },
        );
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayers {
    async fn get_player(&self, player_id: i64) -> Result<Option<Player>, PlayerRepositoryError> {
        if self.fail {
            return Err(PlayerRepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.players.get(&player_id).cloned())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

// =========================================================================
// Queue
// =========================================================================

/// Single-queue broker; the queue name is ignored
pub struct InMemoryQueue {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<Vec<u8>>>>,
    published: AtomicUsize,
    fail_publish: bool,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(Some(rx)),
            published: AtomicUsize::new(0),
            fail_publish: false,
        }
    }

    pub fn failing_publish(mut self) -> Self {
        self.fail_publish = true;
        self
    }

    /// Deliver raw bytes as if another producer had published them
    pub fn push_raw(&self, payload: &[u8]) {
        self.tx.send(payload.to_vec()).unwrap();
    }

    pub fn published(&self) -> usize {
        self.published.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventPublisher for InMemoryQueue {
    async fn publish(&self, _queue: &str, event: &Event) -> Result<(), QueueError> {
        if self.fail_publish {
            return Err(QueueError::NotAcknowledged);
        }
        self.tx.send(event.to_json()?).unwrap();
        self.published.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl EventConsumer for InMemoryQueue {
    async fn consume(&self, _queue: &str) -> Result<EventStream, QueueError> {
        let rx = self
            .rx
            .lock()
            .unwrap()
            .take()
            .expect("InMemoryQueue supports a single consumer");

        let stream = futures::stream::unfold(rx, |mut rx| async move {
            let raw = rx.recv().await?;
            Some((Event::from_json(&raw).map_err(QueueError::from), rx))
        });

        Ok(stream.boxed())
    }
}

// =========================================================================
// Wiring
// =========================================================================

pub struct Fixture {
    pub cache: Arc<InMemoryCache>,
    pub rates: Arc<StaticRateSource>,
    pub players: Arc<InMemoryPlayers>,
}

impl Fixture {
    pub fn new(cache: InMemoryCache, rates: StaticRateSource, players: InMemoryPlayers) -> Self {
        Self {
            cache: Arc::new(cache),
            rates: Arc::new(rates),
            players: Arc::new(players),
        }
    }

    pub fn converter(&self) -> CurrencyConverter {
        CurrencyConverter::new(self.cache.clone(), self.rates.clone())
    }

    pub fn resolver(&self) -> PlayerContextResolver {
        PlayerContextResolver::new(self.players.clone())
    }

    pub fn pipeline(&self) -> EnrichmentPipeline {
        EnrichmentPipeline::new(self.converter(), self.resolver())
    }
}
