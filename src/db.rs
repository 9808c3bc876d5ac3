use crate::config::DatabaseConfig;
use rocket::fairing::AdHoc;
use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn init_pool(db_config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections.min(db_config.max_connections))
        .acquire_timeout(Duration::from_secs(db_config.acquire_timeout))
        .idle_timeout(Duration::from_secs(db_config.idle_timeout))
        .max_lifetime(Duration::from_secs(db_config.max_lifetime))
        .connect(&db_config.url)
        .await
}

pub fn stage_db(db_config: DatabaseConfig) -> AdHoc {
    AdHoc::try_on_ignite("Postgres (sqlx)", |rocket| async move {
        match init_pool(&db_config).await {
            Ok(pool) => {
                tracing::info!(
                    max_connections = db_config.max_connections,
                    min_connections = db_config.min_connections,
                    "Database pool initialized successfully"
                );
                Ok(rocket.manage(pool))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize database pool");
                Err(rocket)
            }
        }
    })
}

/// Applies every pending migration.
pub async fn migrate_up(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Reverts the most recently applied migration. Does nothing when the schema is empty.
pub async fn migrate_down(pool: &PgPool) -> Result<Option<i64>, MigrateError> {
    let applied: Vec<i64> = match sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success ORDER BY version DESC LIMIT 2")
        .fetch_all(pool)
        .await
    {
        Ok(versions) => versions,
        // The bookkeeping table only exists once a migration has run.
        Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some("42P01") => Vec::new(),
        Err(e) => return Err(MigrateError::Execute(e)),
    };

    let Some(latest) = applied.first().copied() else {
        return Ok(None);
    };
    let target = applied.get(1).copied().unwrap_or(0);

    MIGRATOR.undo(pool, target).await?;
    Ok(Some(latest))
}
