use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the idea store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_IDEAS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS ideas (
        id          UUID PRIMARY KEY,
        title       TEXT NOT NULL,
        description TEXT NOT NULL,
        summary     TEXT NOT NULL,
        tags        TEXT[] NOT NULL DEFAULT '{}',
        owner       TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

const CREATE_IDEAS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS ideas_created_at_idx ON ideas (created_at DESC)";

/// Owns the PostgreSQL pool for the lifetime of the process
#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// Open the pool described by `config` and make sure the schema exists
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        let manager = Self { pool };
        manager.ensure_schema().await?;

        info!("Connected database pool (max {} connections)", config.max_connections);
        Ok(manager)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_IDEAS_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_IDEAS_INDEX).execute(&self.pool).await?;
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
