//! Description Formatter
//!
//! Human-readable narrative for each event kind.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;

use crate::domain::{game_by_id, Event, EventKind, SETTLEMENT_CURRENCY};

/// Description used for kinds the formatter does not know
pub const UNKNOWN_EVENT: &str = "Unknown event";

/// Title used for game ids missing from the catalog
pub const UNKNOWN_GAME: &str = "Unknown Game";

/// Describe an event.
///
/// For bets this reads the settlement amount and player email, so it must
/// run after currency conversion and player resolution.
pub fn describe(event: &Event) -> String {
    match &event.kind {
        EventKind::GameStart => format!(
            "Player #{} started playing a game \"{}\" on {}.",
            event.player_id,
            game_title(event.game_id),
            format_timestamp(&event.created_at),
        ),
        EventKind::GameStop => format!(
            "Player #{} stopped playing a game \"{}\" on {}.",
            event.player_id,
            game_title(event.game_id),
            format_timestamp(&event.created_at),
        ),
        EventKind::Bet => format!(
            "Player #{} ({}) placed a bet of {} {} ({} {}) on a game \"{}\" on {}.",
            event.player_id,
            event.player.email,
            minor_units(event.amount),
            event.currency,
            minor_units(event.amount_settlement),
            SETTLEMENT_CURRENCY,
            game_title(event.game_id),
            format_timestamp(&event.created_at),
        ),
        EventKind::Deposit => format!(
            "Player #{} made a deposit of {} {} on {}.",
            event.player_id,
            minor_units(event.amount),
            SETTLEMENT_CURRENCY,
            format_timestamp(&event.created_at),
        ),
        EventKind::Unknown(kind) => {
            tracing::error!(kind = %kind, player_id = event.player_id, "Unknown event type");
            UNKNOWN_EVENT.to_string()
        }
    }
}

/// Format a timestamp as e.g. "January 2nd, 2006 at 15:04 UTC"
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    let day = timestamp.day();
    format!(
        "{} {}{}, {} at {} UTC",
        timestamp.format("%B"),
        day,
        ordinal_suffix(day),
        timestamp.year(),
        timestamp.format("%H:%M"),
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Render minor units with two decimals
fn minor_units(amount: i64) -> String {
    format!("{:.2}", Decimal::new(amount, 2))
}

fn game_title(game_id: i64) -> &'static str {
    match game_by_id(game_id) {
        Some(game) => game.title,
        None => {
            tracing::warn!(game_id, "Game not found in catalog");
            UNKNOWN_GAME
        }
    }
}
