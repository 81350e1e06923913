use crate::{config::Settings, error::ApiError};
use sqlx::{
    migrate::MigrateDatabase, Connection, PgConnection, Pool, Postgres,
};
use std::sync::OnceLock;

pub type DatabasePool = Pool<Postgres>;

pub async fn create_connection_pool(database_url: &str) -> Result<DatabasePool, ApiError> {
    let pool = sqlx::PgPool::connect(database_url).await?;

    // Run database migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Create the application database if it does not exist yet. Uses the
/// elevated maintenance connection when one is configured, otherwise lets
/// the driver derive a maintenance connection from the application URL.
pub async fn ensure_database(settings: &Settings) -> Result<(), ApiError> {
    if let Some(maintenance_url) = &settings.maintenance_database_url {
        let name = settings
            .database_name()
            .ok_or_else(|| ApiError::internal("database_url does not name a database"))?;

        let mut conn = PgConnection::connect(maintenance_url).await?;

        let exists: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
                .bind(name)
                .fetch_optional(&mut conn)
                .await?;

        if exists.is_none() {
            // CREATE DATABASE cannot take bind parameters
            let quoted = name.replace('"', "\"\"");
            sqlx::query(&format!("CREATE DATABASE \"{quoted}\""))
                .execute(&mut conn)
                .await?;
            tracing::info!(database = %name, "created application database");
        }

        conn.close().await?;
    } else if !Postgres::database_exists(&settings.database_url).await? {
        Postgres::create_database(&settings.database_url).await?;
        tracing::info!("created application database");
    }

    Ok(())
}

pub async fn health_check(pool: &DatabasePool) -> Result<(), ApiError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Run database migrations
static MIGRATIONS_RAN: OnceLock<()> = OnceLock::new();

pub async fn run_migrations(pool: &DatabasePool) -> Result<(), ApiError> {
    if MIGRATIONS_RAN.get().is_some() {
        return Ok(());
    }
    tracing::info!("Running database migrations...");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            tracing::info!("Database migrations completed successfully");
            let _ = MIGRATIONS_RAN.set(());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Database migration failed: {}", e);
            Err(ApiError::Migration(e))
        }
    }
}
