//! Player Context Resolver
//!
//! Attaches the player snapshot to an event. A missing player is a valid
//! outcome and yields the zero-value placeholder.

use std::sync::Arc;

use crate::domain::Player;
use crate::players::{PlayerRepository, PlayerRepositoryError};

/// Resolves player ids into player snapshots
#[derive(Clone)]
pub struct PlayerContextResolver {
    repository: Arc<dyn PlayerRepository>,
}

impl PlayerContextResolver {
    pub fn new(repository: Arc<dyn PlayerRepository>) -> Self {
        Self { repository }
    }

    /// Look up a player, mapping "not found" to the placeholder.
    ///
    /// # Errors
    /// Returns the repository error on storage or transport failure.
    pub async fn try_resolve(&self, player_id: i64) -> Result<Player, PlayerRepositoryError> {
        match self.repository.get_player(player_id).await? {
            Some(player) => Ok(player),
            None => {
                tracing::debug!(player_id, "Player not found, using placeholder");
                Ok(Player::default())
            }
        }
    }

    /// Look up a player, falling back to the placeholder on any failure
    pub async fn resolve(&self, player_id: i64) -> Player {
        match self.try_resolve(player_id).await {
            Ok(player) => player,
            Err(e) => {
                tracing::error!(player_id, error = %e, "Failed to resolve player");
                Player::default()
            }
        }
    }

    /// Release the repository connection
    pub async fn close(&self) {
        self.repository.close().await;
    }
}
