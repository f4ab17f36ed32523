use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use service::errors::{FieldError, ServiceError};

use crate::metrics;

/// Every error leaves the server as `{"error": "..."}`; validation failures
/// add `"details"` with one entry per offending field.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { message: String, details: Vec<FieldError> },
    #[error("{0}")]
    Conflict(String),
    #[error("Not found")]
    RouteNotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into(), details: Vec::new() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::Conflict(_) => "conflict",
            ApiError::RouteNotFound => "route_not_found",
            ApiError::MethodNotAllowed => "method_not_allowed",
            ApiError::Internal(_) => "internal",
        }
    }
}

/// An unknown job on the result route is a bad request, not a 404.
impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(details) => ApiError::BadRequest {
                message: "invalid request".into(),
                details,
            },
            ServiceError::NotFound(msg) => ApiError::bad_request(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Db(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        metrics::reject(self.reason());

        let body = match &self {
            ApiError::Internal(detail) => {
                error!(status = status.as_u16(), error = %detail, "request failed");
                json!({"error": "Internal server error"})
            }
            ApiError::BadRequest { message, details } if !details.is_empty() => {
                warn!(status = status.as_u16(), error = %message, ?details, "request rejected");
                json!({"error": message, "details": details})
            }
            other => {
                warn!(status = status.as_u16(), error = %other, "request rejected");
                json!({"error": other.to_string()})
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (
                ServiceError::Validation(vec![FieldError::new("uuid", "is required")]),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::not_found("abc"), StatusCode::BAD_REQUEST),
            (ServiceError::conflict("abc"), StatusCode::CONFLICT),
            (ServiceError::Db("disk full".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn route_not_found_message() {
        assert_eq!(ApiError::RouteNotFound.to_string(), "Not found");
    }
}
