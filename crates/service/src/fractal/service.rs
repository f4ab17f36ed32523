use std::sync::Arc;

use tracing::{info, instrument};

use models::fractal::{FractalData, FractalJob};

use crate::errors::ServiceError;
use crate::fractal::repository::FractalRepository;
use crate::fractal::validation::{CreateJobRequest, PublishResultRequest};

/// Application service for fractal jobs.
/// Requests arrive already validated; this layer owns the store rules.
#[derive(Clone)]
pub struct FractalService {
    repo: Arc<dyn FractalRepository>,
}

impl FractalService {
    pub fn new(repo: Arc<dyn FractalRepository>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: &str) -> Option<FractalJob> {
        self.repo.get(id).await
    }

    /// Register a new job with an empty result.
    #[instrument(skip(self, req), fields(fractal_id = %req.id))]
    pub async fn create_job(&self, req: CreateJobRequest) -> Result<FractalJob, ServiceError> {
        if self.repo.get(&req.id).await.is_some() {
            return Err(ServiceError::conflict(&req.id));
        }
        let job = FractalJob::new(req.id, FractalData::pending(req.parameter, req.dimension));
        self.repo.put(&job).await?;
        info!(
            event = "fractal_created",
            iterations = job.data.parameter.iterations,
            width = job.data.dimension.width,
            height = job.data.dimension.height,
            "fractal job registered"
        );
        Ok(job)
    }

    /// Store a worker's checksum and duration for an existing job.
    #[instrument(skip(self, req), fields(fractal_id = %id))]
    pub async fn publish_result(
        &self,
        id: &str,
        req: PublishResultRequest,
    ) -> Result<FractalJob, ServiceError> {
        let mut job = self
            .repo
            .get(id)
            .await
            .ok_or_else(|| ServiceError::not_found(id))?;
        job.record_result(req.checksum, req.duration);
        self.repo.update(&job).await?;
        info!(
            event = "fractal_result_published",
            checksum = %job.data.checksum,
            duration = job.data.duration,
            "fractal result stored"
        );
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractal::repository::InMemoryFractalRepository;
    use crate::test_support::seaorm_repo;
    use models::fractal::{Dimension, Parameter};

    fn create_req(id: &str) -> CreateJobRequest {
        CreateJobRequest {
            id: id.to_string(),
            parameter: Parameter { xa: -2.0, xb: 1.0, ya: -1.0, yb: 1.0, iterations: 100 },
            dimension: Dimension { width: 800, height: 600 },
        }
    }

    fn result_req() -> PublishResultRequest {
        PublishResultRequest { checksum: "deadbeef".into(), duration: 12.5 }
    }

    fn memory_service() -> (FractalService, Arc<InMemoryFractalRepository>) {
        let repo = Arc::new(InMemoryFractalRepository::new());
        (FractalService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn create_starts_with_empty_result() {
        let (svc, _) = memory_service();
        let job = svc.create_job(create_req("abc")).await.unwrap();
        assert_eq!(job.id, "abc");
        assert_eq!(job.data.checksum, "");
        assert_eq!(job.data.duration, 0.0);
        assert_eq!(svc.get("abc").await, Some(job));
    }

    #[tokio::test]
    async fn duplicate_create_is_conflict_and_keeps_original() {
        let (svc, repo) = memory_service();
        svc.create_job(create_req("abc")).await.unwrap();

        let mut again = create_req("abc");
        again.parameter.iterations = 5;
        assert!(matches!(svc.create_job(again).await, Err(ServiceError::Conflict(_))));

        assert_eq!(repo.len().await, 1);
        assert_eq!(svc.get("abc").await.unwrap().data.parameter.iterations, 100);
    }

    #[tokio::test]
    async fn publish_for_unknown_job_creates_nothing() {
        let (svc, repo) = memory_service();
        let res = svc.publish_result("ghost", result_req()).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn publish_is_idempotent() {
        let (svc, _) = memory_service();
        svc.create_job(create_req("abc")).await.unwrap();

        let first = svc.publish_result("abc", result_req()).await.unwrap();
        let stored_first = svc.get("abc").await.unwrap();
        let second = svc.publish_result("abc", result_req()).await.unwrap();
        let stored_second = svc.get("abc").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(stored_first, stored_second);
        assert_eq!(stored_second.data.checksum, "deadbeef");
        assert_eq!(stored_second.data.duration, 12.5);
    }

    #[tokio::test]
    async fn publish_leaves_parameters_untouched() {
        let (svc, _) = memory_service();
        let created = svc.create_job(create_req("abc")).await.unwrap();
        let updated = svc.publish_result("abc", result_req()).await.unwrap();
        assert_eq!(updated.data.parameter, created.data.parameter);
        assert_eq!(updated.data.dimension, created.data.dimension);
    }

    #[tokio::test]
    async fn full_flow_against_database() -> Result<(), anyhow::Error> {
        let svc = FractalService::new(seaorm_repo().await?);
        svc.create_job(create_req("db-flow")).await?;
        svc.publish_result("db-flow", result_req()).await?;

        let stored = svc.get("db-flow").await.expect("stored");
        assert_eq!(stored.data.checksum, "deadbeef");
        assert_eq!(stored.data.parameter.xa, -2.0);
        let again = svc.create_job(create_req("db-flow")).await;
        assert!(matches!(again, Err(ServiceError::Conflict(_))));
        Ok(())
    }
}
