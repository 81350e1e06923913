use std::sync::Arc;

use crate::{
    config::Settings,
    database::DatabasePool,
    repositories::{company_repo::SqlxCompanyRepository, CompanyRepository},
};

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db_pool: DatabasePool,
    pub company_repository: Arc<dyn CompanyRepository>,
}

impl AppState {
    /// Create new application state: ensure the database exists, connect,
    /// run migrations, wire the repository.
    pub async fn new(config: Settings) -> Result<Self, crate::error::ApiError> {
        database::ensure_database(&config).await?;
        let db_pool = database::create_connection_pool(&config.database_url).await?;
        Ok(Self::new_with_pool(config, db_pool))
    }

    /// Create new application state with an existing database pool
    pub fn new_with_pool(config: Settings, db_pool: DatabasePool) -> Self {
        let company_repository: Arc<dyn CompanyRepository> =
            Arc::new(SqlxCompanyRepository::new(db_pool.clone()));

        Self {
            config: Arc::new(config),
            db_pool,
            company_repository,
        }
    }
}
