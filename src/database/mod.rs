use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Process-wide connection pool, created lazily from `DATABASE_URL`.
pub async fn pool() -> Result<&'static PgPool, DatabaseError> {
    POOL.get_or_try_init(|| async {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let db = &config::config().database;

        let pool = PgPoolOptions::new()
            .max_connections(db.max_connections)
            .acquire_timeout(Duration::from_secs(db.connect_timeout_secs))
            .connect(&url)
            .await?;

        info!("database pool ready (max_connections={})", db.max_connections);
        Ok(pool)
    })
    .await
}

/// Apply pending migrations; called once at startup.
pub async fn run_migrations() -> Result<(), DatabaseError> {
    let pool = pool().await?;
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Cheap liveness probe for the health endpoint.
pub async fn health_check() -> Result<(), DatabaseError> {
    let pool = pool().await?;
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

impl From<DatabaseError> for crate::error::ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Sqlx(e) => e.into(),
            other => {
                tracing::error!("database unavailable: {}", other);
                crate::error::ApiError::internal("Something went wrong")
            }
        }
    }
}
