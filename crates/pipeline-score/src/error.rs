use std::any::Any;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;
use tracing::error;

use crate::config::ConfigError;
use crate::scoring::router::AVAILABLE_ENDPOINTS;
use crate::scoring::ServiceError;
use crate::telemetry::TelemetryError;

/// Process-level failure surfaced from `run()`.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Payload(serde_json::Error),
    Rejected(ApiError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Payload(err) => write!(f, "payload error: {}", err),
            AppError::Rejected(err) => write!(f, "prediction rejected: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Payload(err) => Some(err),
            AppError::Rejected(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Payload(value)
    }
}

impl From<ApiError> for AppError {
    fn from(value: ApiError) -> Self {
        Self::Rejected(value)
    }
}

/// Client-facing error taxonomy. Server-side variants never carry internal detail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("content type must be a structured record")]
    InputShape,
    #[error("{0}")]
    Validation(String),
    #[error("internal server error")]
    Computation,
    #[error("endpoint not found")]
    RouteNotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InputShape | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Computation | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> serde_json::Value {
        let mut body = json!({
            "status": "error",
            "error": self.to_string(),
            "timestamp": Utc::now(),
        });
        if matches!(self, ApiError::RouteNotFound | ApiError::MethodNotAllowed) {
            body["available_endpoints"] = json!(AVAILABLE_ENDPOINTS);
        }
        body
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::InputShape => ApiError::InputShape,
            ServiceError::Validation(failure) => ApiError::Validation(failure.to_string()),
            ServiceError::Computation(_) => ApiError::Computation,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// Response for a handler that panicked. The panic payload is logged, not returned.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(detail, "request handler panicked");
    ApiError::Internal.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_hide_internal_detail() {
        let err = ApiError::from(ServiceError::Computation(
            crate::scoring::ComputationError::NonNumericValue {
                raw: "\"abc\"".to_string(),
            },
        ));
        assert_eq!(err, ApiError::Computation);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.body();
        assert_eq!(body["error"], "internal server error");
        assert!(!body.to_string().contains("abc"));
    }

    #[test]
    fn not_found_lists_available_endpoints() {
        let body = ApiError::RouteNotFound.body();
        assert_eq!(body["status"], "error");
        assert_eq!(
            body["available_endpoints"],
            json!(["/", "/health", "/predict", "/metrics"])
        );
    }

    #[test]
    fn validation_errors_carry_the_rule_message() {
        let err = ApiError::from(ServiceError::Validation(
            crate::scoring::ValidationFailure::ValueOutOfRange,
        ));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body()["error"], "value must be between 0 and 100");
        assert!(err.body().get("timestamp").is_some());
    }
}
