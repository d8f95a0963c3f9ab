//! Database module
//!
//! Connection pool construction and schema verification for the player store.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Tables the pipeline reads from
const REQUIRED_TABLES: &[&str] = &["players"];

/// Open a connection pool and verify connectivity
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    verify_connection(&pool).await?;
    Ok(pool)
}

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Return the first required table that does not exist, if any
pub async fn missing_table(pool: &PgPool) -> Result<Option<&'static str>, sqlx::Error> {
    for &table in REQUIRED_TABLES {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables 
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(Some(table));
        }
    }

    Ok(None)
}
