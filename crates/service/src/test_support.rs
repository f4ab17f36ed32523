#![cfg(test)]
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::fractal::repository::SeaOrmFractalRepository;

/// Migrated in-memory database, private to the calling test.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    models::db::connect_memory().await
}

pub async fn seaorm_repo() -> Result<Arc<SeaOrmFractalRepository>, anyhow::Error> {
    Ok(Arc::new(SeaOrmFractalRepository::new(get_db().await?)))
}
