use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use crate::errors::ApiError;
use crate::{metrics, openapi::ApiDoc, state::AppState};

pub mod fractals;

/// Liveness probe.
#[utoipa::path(
    get, path = "/", tag = "health",
    responses((status = 200, description = "Empty JSON object"))
)]
pub async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({}))
}

pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn metrics_text() -> Result<impl IntoResponse, ApiError> {
    let body = metrics::render()
        .map_err(|e| ApiError::Internal(format!("metrics encode error: {e}")))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/", get(index).fallback(method_not_allowed))
        .route("/v1/fractals", post(fractals::create).fallback(method_not_allowed))
        .route(
            "/v1/fractals/:id/result",
            post(fractals::publish_result).fallback(method_not_allowed),
        )
        .with_state(state);

    let ops = Router::new()
        .route("/metrics", get(metrics_text).fallback(method_not_allowed))
        .route(
            "/api-docs/openapi.json",
            get(openapi_json).fallback(method_not_allowed),
        );

    api.merge(ops)
        .fallback(not_found)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses are logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
