use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;
use tracing::warn;

use models::fractal::{self, FractalJob};

use crate::errors::ServiceError;

/// Record store for fractal jobs, keyed by the caller-supplied id.
#[async_trait]
pub trait FractalRepository: Send + Sync {
    /// Look a job up. Storage faults are logged and reported as absent.
    async fn get(&self, id: &str) -> Option<FractalJob>;
    /// Insert a new job; an existing id is a `Conflict`.
    async fn put(&self, job: &FractalJob) -> Result<(), ServiceError>;
    /// Persist a changed job; an unknown id is `NotFound`.
    async fn update(&self, job: &FractalJob) -> Result<(), ServiceError>;
}

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmFractalRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmFractalRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FractalRepository for SeaOrmFractalRepository {
    async fn get(&self, id: &str) -> Option<FractalJob> {
        match fractal::find(&self.db, id).await {
            Ok(found) => found,
            Err(e) => {
                warn!(
                    event = "fractal_lookup_failed",
                    fractal_id = %id,
                    error = %e,
                    "treating unreadable fractal as absent"
                );
                None
            }
        }
    }

    async fn put(&self, job: &FractalJob) -> Result<(), ServiceError> {
        Ok(fractal::insert(&self.db, job).await?)
    }

    async fn update(&self, job: &FractalJob) -> Result<(), ServiceError> {
        Ok(fractal::update(&self.db, job).await?)
    }
}

/// Map-backed store for tests and embedding without a database.
#[derive(Default)]
pub struct InMemoryFractalRepository {
    jobs: Mutex<HashMap<String, FractalJob>>,
}

impl InMemoryFractalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.jobs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.lock().await.is_empty()
    }
}

#[async_trait]
impl FractalRepository for InMemoryFractalRepository {
    async fn get(&self, id: &str) -> Option<FractalJob> {
        self.jobs.lock().await.get(id).cloned()
    }

    async fn put(&self, job: &FractalJob) -> Result<(), ServiceError> {
        let mut jobs = self.jobs.lock().await;
        if jobs.contains_key(&job.id) {
            return Err(ServiceError::conflict(&job.id));
        }
        jobs.insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn update(&self, job: &FractalJob) -> Result<(), ServiceError> {
        let mut jobs = self.jobs.lock().await;
        match jobs.get_mut(&job.id) {
            Some(slot) => {
                *slot = job.clone();
                Ok(())
            }
            None => Err(ServiceError::not_found(&job.id)),
        }
    }
}
