//! Materializer
//!
//! Maintains rolling throughput statistics and all-time per-player totals.
//! All reads and writes go through one mutex; updates are cheap and the
//! lock is never held across I/O.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::{Event, EventKind};

/// Length of the occurrence window in seconds
pub const WINDOW_SECS: i64 = 60;

/// A player id paired with a counter value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStat {
    pub id: i64,
    pub count: i64,
}

/// Point-in-time copy of the derived statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateSnapshot {
    pub events_total: u64,
    pub events_per_minute: f64,
    pub events_per_second_moving_average: f64,
    pub top_player_bets: PlayerStat,
    pub top_player_wins: PlayerStat,
    pub top_player_deposits: PlayerStat,
}

/// All-time totals for a single player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlayerTotals {
    pub bets: i64,
    pub wins: i64,
    pub deposits: i64,
}

/// Per-player counters in first-seen order.
///
/// Entries are never evicted, so memory grows with the number of distinct
/// players for the lifetime of the process.
#[derive(Debug, Default)]
struct PlayerCounters {
    entries: Vec<PlayerStat>,
    index: HashMap<i64, usize>,
}

impl PlayerCounters {
    fn add(&mut self, player_id: i64, delta: i64) {
        if let Some(entry) = self
            .index
            .get(&player_id)
            .and_then(|&i| self.entries.get_mut(i))
        {
            entry.count = entry.count.saturating_add(delta);
            return;
        }

        self.index.insert(player_id, self.entries.len());
        self.entries.push(PlayerStat {
            id: player_id,
            count: delta,
        });
    }

    fn get(&self, player_id: i64) -> Option<i64> {
        self.index
            .get(&player_id)
            .and_then(|&i| self.entries.get(i))
            .map(|entry| entry.count)
    }

    /// Strictly greatest positive entry; ties keep the first-seen player.
    /// Yields the zero pair when no count exceeds zero.
    fn top(&self) -> PlayerStat {
        self.entries
            .iter()
            .fold(PlayerStat::default(), |top, entry| {
                if entry.count > top.count {
                    *entry
                } else {
                    top
                }
            })
    }
}

#[derive(Debug, Default)]
struct MaterializedState {
    events_total: u64,
    occurrences: VecDeque<DateTime<Utc>>,
    events_per_minute: f64,
    events_per_second_moving_average: f64,
    bets: PlayerCounters,
    wins: PlayerCounters,
    deposits: PlayerCounters,
    top_player_bets: PlayerStat,
    top_player_wins: PlayerStat,
    top_player_deposits: PlayerStat,
}

impl MaterializedState {
    fn apply(&mut self, event: &Event, observed_at: DateTime<Utc>) {
        self.events_total += 1;

        self.occurrences.push_back(observed_at);
        let cutoff = observed_at - Duration::seconds(WINDOW_SECS);
        while self.occurrences.front().is_some_and(|t| *t < cutoff) {
            self.occurrences.pop_front();
        }

        let in_window = self.occurrences.len() as f64;
        self.events_per_minute = in_window;
        self.events_per_second_moving_average = in_window / WINDOW_SECS as f64;

        match &event.kind {
            EventKind::Bet => self.bets.add(event.player_id, 1),
            EventKind::GameStop if event.has_won => self.wins.add(event.player_id, 1),
            EventKind::Deposit => self.deposits.add(event.player_id, event.amount_settlement),
            EventKind::GameStart | EventKind::GameStop | EventKind::Unknown(_) => {}
        }

        self.top_player_bets = self.bets.top();
        self.top_player_wins = self.wins.top();
        self.top_player_deposits = self.deposits.top();
    }

    fn snapshot(&self) -> AggregateSnapshot {
        AggregateSnapshot {
            events_total: self.events_total,
            events_per_minute: self.events_per_minute,
            events_per_second_moving_average: self.events_per_second_moving_average,
            top_player_bets: self.top_player_bets,
            top_player_wins: self.top_player_wins,
            top_player_deposits: self.top_player_deposits,
        }
    }
}

/// Thread-safe materialized statistics over consumed events
#[derive(Debug, Default)]
pub struct Materializer {
    state: Mutex<MaterializedState>,
}

impl Materializer {
    /// Create an empty materializer
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MaterializedState> {
        // State is updated field-by-field with no invariant spanning a panic point
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Aggregate an event observed now
    pub fn observe(&self, event: &Event) {
        // Clock is read under the lock so the window stays in arrival order
        let mut state = self.lock();
        state.apply(event, Utc::now());
    }

    /// Aggregate an event observed at `observed_at`
    pub fn observe_at(&self, event: &Event, observed_at: DateTime<Utc>) {
        self.lock().apply(event, observed_at);
    }

    /// Copy of the current statistics
    pub fn snapshot(&self) -> AggregateSnapshot {
        self.lock().snapshot()
    }

    /// All-time totals for one player; `None` if no bet, win or deposit was seen
    pub fn player_totals(&self, player_id: i64) -> Option<PlayerTotals> {
        let state = self.lock();
        let bets = state.bets.get(player_id);
        let wins = state.wins.get(player_id);
        let deposits = state.deposits.get(player_id);

        if bets.is_none() && wins.is_none() && deposits.is_none() {
            return None;
        }

        Some(PlayerTotals {
            bets: bets.unwrap_or_default(),
            wins: wins.unwrap_or_default(),
            deposits: deposits.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 15, 4, 0).unwrap()
    }

    fn bet(player_id: i64) -> Event {
        Event::new(EventKind::Bet, player_id, t0()).with_amount(100, "EUR")
    }

    #[test]
    fn test_empty_snapshot() {
        let materializer = Materializer::new();
        assert_eq!(materializer.snapshot(), AggregateSnapshot::default());
        assert!(materializer.player_totals(1).is_none());
    }

    #[test]
    fn test_events_total_counts_every_kind() {
        let materializer = Materializer::new();
        let events = [
            Event::new(EventKind::GameStart, 1, t0()),
            Event::new(EventKind::GameStop, 1, t0()),
            bet(1),
            Event::new(EventKind::Deposit, 1, t0()),
            Event::new(EventKind::Unknown("jackpot".to_string()), 1, t0()),
        ];
        for event in &events {
            materializer.observe_at(event, t0());
        }

        assert_eq!(materializer.snapshot().events_total, 5);
    }

    #[test]
    fn test_window_rates() {
        let materializer = Materializer::new();
        for i in 0..30 {
            materializer.observe_at(&bet(1), t0() + Duration::seconds(i));
        }

        let snapshot = materializer.snapshot();
        assert_eq!(snapshot.events_per_minute, 30.0);
        assert_eq!(snapshot.events_per_second_moving_average, 30.0 / 60.0);
    }

    #[test]
    fn test_window_evicts_old_occurrences() {
        let materializer = Materializer::new();
        materializer.observe_at(&bet(1), t0());
        materializer.observe_at(&bet(1), t0() + Duration::seconds(30));
        // Exactly 60s later the first entry is still inside the window
        materializer.observe_at(&bet(1), t0() + Duration::seconds(60));
        assert_eq!(materializer.snapshot().events_per_minute, 3.0);

        materializer.observe_at(&bet(1), t0() + Duration::seconds(91));
        let snapshot = materializer.snapshot();
        assert_eq!(snapshot.events_per_minute, 2.0);
        assert_eq!(snapshot.events_total, 4);
    }

    #[test]
    fn test_concurrent_observe_keeps_window_ordered() {
        let materializer = Arc::new(Materializer::new());

        let writers: Vec<_> = (0..8)
            .map(|player_id| {
                let materializer = materializer.clone();
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        materializer.observe(&bet(player_id));
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let state = materializer.lock();
        assert_eq!(state.events_total, 1600);
        assert!(state
            .occurrences
            .iter()
            .zip(state.occurrences.iter().skip(1))
            .all(|(earlier, later)| earlier <= later));
    }

    #[test]
    fn test_top_player_bets() {
        let materializer = Materializer::new();
        for _ in 0..3 {
            materializer.observe_at(&bet(1), t0());
        }
        for _ in 0..5 {
            materializer.observe_at(&bet(2), t0());
        }

        assert_eq!(
            materializer.snapshot().top_player_bets,
            PlayerStat { id: 2, count: 5 }
        );
    }

    #[test]
    fn test_top_player_tie_keeps_first_seen() {
        let materializer = Materializer::new();
        materializer.observe_at(&bet(9), t0());
        materializer.observe_at(&bet(3), t0());

        assert_eq!(
            materializer.snapshot().top_player_bets,
            PlayerStat { id: 9, count: 1 }
        );
    }

    #[test]
    fn test_top_player_ignores_zero_counts() {
        let materializer = Materializer::new();
        // Settlement amount was never set, e.g. an unsupported currency
        let unsettled = Event::new(EventKind::Deposit, 42, t0()).with_amount(1000, "JPY");
        materializer.observe_at(&unsettled, t0());

        assert_eq!(
            materializer.snapshot().top_player_deposits,
            PlayerStat::default()
        );
        assert_eq!(materializer.player_totals(42).map(|t| t.deposits), Some(0));

        let mut settled = Event::new(EventKind::Deposit, 7, t0()).with_amount(500, "EUR");
        settled.amount_settlement = 500;
        materializer.observe_at(&settled, t0());

        assert_eq!(
            materializer.snapshot().top_player_deposits,
            PlayerStat { id: 7, count: 500 }
        );
    }

    #[test]
    fn test_wins_only_count_won_game_stops() {
        let materializer = Materializer::new();
        let lost = Event::new(EventKind::GameStop, 4, t0()).with_win(false);
        let won = Event::new(EventKind::GameStop, 5, t0()).with_win(true);
        materializer.observe_at(&lost, t0());
        materializer.observe_at(&won, t0());
        materializer.observe_at(&won, t0());

        assert_eq!(
            materializer.snapshot().top_player_wins,
            PlayerStat { id: 5, count: 2 }
        );
        assert!(materializer.player_totals(4).is_none());
        assert_eq!(materializer.player_totals(5).map(|t| t.wins), Some(2));
    }

    #[test]
    fn test_deposits_sum_settlement_amounts() {
        let materializer = Materializer::new();
        let mut deposit = Event::new(EventKind::Deposit, 42, t0()).with_amount(1000, "USD");
        deposit.amount_settlement = 920;
        materializer.observe_at(&deposit, t0());
        materializer.observe_at(&deposit, t0());

        assert_eq!(
            materializer.player_totals(42),
            Some(PlayerTotals {
                bets: 0,
                wins: 0,
                deposits: 1840,
            })
        );
        assert_eq!(
            materializer.snapshot().top_player_deposits,
            PlayerStat { id: 42, count: 1840 }
        );
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let materializer = Materializer::new();
        materializer.observe_at(&bet(1), t0());
        let before = materializer.snapshot();
        materializer.observe_at(&bet(1), t0());

        assert_eq!(before.events_total, 1);
        assert_eq!(materializer.snapshot().events_total, 2);
    }

    #[test]
    fn test_concurrent_observe_and_snapshot() {
        let materializer = Arc::new(Materializer::new());
        let writers: Vec<_> = (0..4)
            .map(|player| {
                let materializer = Arc::clone(&materializer);
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        materializer.observe(&bet(player));
                    }
                })
            })
            .collect();

        let reader = {
            let materializer = Arc::clone(&materializer);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let snapshot = materializer.snapshot();
                    let top = snapshot.top_player_bets;
                    assert!(top.count as u64 <= snapshot.events_total);
                }
            })
        };

        for writer in writers {
            writer.join().unwrap();
        }
        reader.join().unwrap();

        let snapshot = materializer.snapshot();
        assert_eq!(snapshot.events_total, 1000);
        assert_eq!(snapshot.top_player_bets.count, 250);
    }

    #[test]
    fn test_snapshot_serializes_flat() {
        let materializer = Materializer::new();
        materializer.observe_at(&bet(7), t0());

        let json = serde_json::to_value(materializer.snapshot()).unwrap();
        assert_eq!(json["events_total"], 1);
        assert_eq!(json["top_player_bets"]["id"], 7);
        assert_eq!(json["top_player_bets"]["count"], 1);
    }
}
