use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::fractal::{FractalRepository, FractalService, SeaOrmFractalRepository};

#[derive(Clone)]
pub struct AppState {
    pub fractals: FractalService,
}

impl AppState {
    pub fn new(repo: Arc<dyn FractalRepository>) -> Self {
        Self { fractals: FractalService::new(repo) }
    }

    pub fn from_db(db: DatabaseConnection) -> Self {
        Self::new(Arc::new(SeaOrmFractalRepository::new(db)))
    }
}
