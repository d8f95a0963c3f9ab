//! Casino Events
//!
//! Player-activity events as they travel through the pipeline.
//! The raw fields are set by the producer; `amount_settlement`, `player`
//! and `description` are filled in by enrichment before publication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::DomainError;

/// Kind of player activity.
///
/// Unrecognized kinds survive a decode/encode cycle as `Unknown` so that
/// events from newer producers are tolerated rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    GameStart,
    GameStop,
    Bet,
    Deposit,
    Unknown(String),
}

impl EventKind {
    /// Get the wire name of this kind
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::GameStart => "game_start",
            EventKind::GameStop => "game_stop",
            EventKind::Bet => "bet",
            EventKind::Deposit => "deposit",
            EventKind::Unknown(raw) => raw,
        }
    }

    /// Whether events of this kind carry a monetary amount
    pub fn is_monetary(&self) -> bool {
        matches!(self, EventKind::Bet | EventKind::Deposit)
    }
}

impl From<String> for EventKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "game_start" => EventKind::GameStart,
            "game_stop" => EventKind::GameStop,
            "bet" => EventKind::Bet,
            "deposit" => EventKind::Deposit,
            _ => EventKind::Unknown(raw),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Denormalized player snapshot attached during enrichment.
///
/// The default value is the placeholder used when a player cannot be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub last_signed_in_at: DateTime<Utc>,
}

impl Player {
    /// True for the zero-value placeholder
    pub fn is_placeholder(&self) -> bool {
        *self == Player::default()
    }
}

/// A single casino event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: i64,

    pub player_id: i64,

    /// Only meaningful for game_start, game_stop and bet
    #[serde(default)]
    pub game_id: i64,

    #[serde(rename = "type")]
    pub kind: EventKind,

    /// Minor units (cents) in `currency`
    #[serde(default)]
    pub amount: i64,

    #[serde(default)]
    pub currency: String,

    /// Only meaningful for game_stop
    #[serde(default)]
    pub has_won: bool,

    pub created_at: DateTime<Utc>,

    /// Minor units in the settlement currency
    #[serde(rename = "amount_eur", default)]
    pub amount_settlement: i64,

    #[serde(default)]
    pub player: Player,

    #[serde(default)]
    pub description: String,
}

impl Event {
    /// Create a bare event of the given kind; remaining fields start at zero values
    pub fn new(kind: EventKind, player_id: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            player_id,
            game_id: 0,
            kind,
            amount: 0,
            currency: String::new(),
            has_won: false,
            created_at,
            amount_settlement: 0,
            player: Player::default(),
            description: String::new(),
        }
    }

    /// Set the game this event refers to
    pub fn with_game(mut self, game_id: i64) -> Self {
        self.game_id = game_id;
        self
    }

    /// Set the monetary amount (minor units) and its currency
    pub fn with_amount(mut self, amount: i64, currency: impl Into<String>) -> Self {
        self.amount = amount;
        self.currency = currency.into();
        self
    }

    /// Mark a game_stop event as won
    pub fn with_win(mut self, has_won: bool) -> Self {
        self.has_won = has_won;
        self
    }

    /// Decode an event from its JSON wire form
    pub fn from_json(raw: &[u8]) -> Result<Self, DomainError> {
        serde_json::from_slice(raw).map_err(DomainError::MalformedEvent)
    }

    /// Encode the event into its JSON wire form
    pub fn to_json(&self) -> Result<Vec<u8>, DomainError> {
        serde_json::to_vec(self).map_err(DomainError::MalformedEvent)
    }
}
