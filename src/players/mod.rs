//! Players module
//!
//! Read access to player identity records in the relational store.

mod repository;

use async_trait::async_trait;

use crate::domain::Player;

pub use repository::PgPlayerRepository;

/// Lookup of players by id
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Fetch a player; `Ok(None)` when no such player exists
    async fn get_player(&self, player_id: i64) -> Result<Option<Player>, PlayerRepositoryError>;

    /// Release the underlying connection(s)
    async fn close(&self) {}
}

/// Player repository errors (not-found is not an error)
#[derive(Debug, thiserror::Error)]
pub enum PlayerRepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
