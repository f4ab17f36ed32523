use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use models::fractal::FractalJob;
use service::errors::ServiceError;
use service::fractal::validation::{parse_create_job, parse_publish_result};

use crate::{errors::ApiError, metrics, state::AppState};

/// Decode a request body; anything that is not JSON is a bad request.
fn json_body(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("request body must be valid JSON: {e}")))
}

#[utoipa::path(
    post, path = "/v1/fractals", tag = "fractals",
    request_body = crate::openapi::CreateFractalDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::FractalJobDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Duplicate id", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<FractalJob>), ApiError> {
    let value = json_body(&body)?;
    let req = parse_create_job(&value).map_err(ServiceError::Validation)?;
    let job = state.fractals.create_job(req).await?;
    metrics::JOBS_CREATED_TOTAL.inc();
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    post, path = "/v1/fractals/{id}/result", tag = "fractals",
    params(("id" = String, Path, description = "Fractal job id")),
    request_body = crate::openapi::PublishResultDoc,
    responses(
        (status = 201, description = "Result stored", body = crate::openapi::FractalJobDoc),
        (
            status = 400,
            description = "Validation Error or unknown job",
            body = crate::openapi::ErrorDoc
        ),
        (status = 500, description = "Storage Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn publish_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<FractalJob>), ApiError> {
    let value = json_body(&body)?;
    let req = parse_publish_result(&value).map_err(ServiceError::Validation)?;
    let job = state.fractals.publish_result(&id, req).await?;
    metrics::RESULTS_PUBLISHED_TOTAL.inc();
    Ok((StatusCode::CREATED, Json(job)))
}
