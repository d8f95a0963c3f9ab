//! Domain module
//!
//! Core domain types: casino events, player snapshots and the static catalogs.

pub mod catalog;
pub mod error;
pub mod events;

pub use catalog::{game_by_id, is_supported_currency, Game, CURRENCIES, GAMES, SETTLEMENT_CURRENCY};
pub use error::DomainError;
pub use events::{Event, EventKind, Player};
