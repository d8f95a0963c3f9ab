//! Postgres player repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::Player;

use super::{PlayerRepository, PlayerRepositoryError};

/// Player repository backed by the `players` table
#[derive(Debug, Clone)]
pub struct PgPlayerRepository {
    pool: PgPool,
}

impl PgPlayerRepository {
    /// Create a new repository over a connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerRepository for PgPlayerRepository {
    async fn get_player(&self, player_id: i64) -> Result<Option<Player>, PlayerRepositoryError> {
        let row: Option<(String, Option<DateTime<Utc>>)> = sqlx::query_as(
            r#"
            SELECT email, last_signed_in_at
            FROM players
            WHERE id = $1
            "#,
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(email, last_signed_in_at)| Player {
            email,
            last_signed_in_at: last_signed_in_at.unwrap_or_default(),
        }))
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Player repository connections closed");
    }
}
