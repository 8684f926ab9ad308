use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::responder::OutputRecord;
use super::service::{HealthView, MetricsView, PredictionService, ServiceDescriptor};
use crate::error::ApiError;

/// Routes advertised in 404 responses.
pub const AVAILABLE_ENDPOINTS: [&str; 4] = ["/", "/health", "/predict", "/metrics"];

/// Public prediction endpoints plus the JSON 404 fallback.
pub fn prediction_router(service: Arc<PredictionService>) -> Router {
    Router::new()
        .route("/", get(descriptor_handler).fallback(method_not_allowed_handler))
        .route("/health", get(health_handler).fallback(method_not_allowed_handler))
        .route("/predict", post(predict_handler).fallback(method_not_allowed_handler))
        .route("/metrics", get(metrics_handler).fallback(method_not_allowed_handler))
        .fallback(not_found_handler)
        .with_state(service)
}

/// Operator routes that drive the scorer's test hooks.
pub fn admin_router(service: Arc<PredictionService>) -> Router {
    Router::new()
        .route("/admin/reset", post(reset_handler).fallback(method_not_allowed_handler))
        .route("/admin/fail", post(fail_handler).fallback(method_not_allowed_handler))
        .route("/admin/recover", post(recover_handler).fallback(method_not_allowed_handler))
        .with_state(service)
}

pub(crate) async fn descriptor_handler() -> Json<ServiceDescriptor> {
    Json(PredictionService::descriptor())
}

pub(crate) async fn health_handler(State(service): State<Arc<PredictionService>>) -> Response {
    health_response(service.health())
}

pub(crate) async fn predict_handler(
    State(service): State<Arc<PredictionService>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<OutputRecord>, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let output = service.predict_payload(content_type, &body)?;
    Ok(Json(output))
}

pub(crate) async fn metrics_handler(
    State(service): State<Arc<PredictionService>>,
) -> Json<MetricsView> {
    Json(service.metrics())
}

pub(crate) async fn not_found_handler() -> ApiError {
    ApiError::RouteNotFound
}

pub(crate) async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}

pub(crate) async fn reset_handler(
    State(service): State<Arc<PredictionService>>,
) -> Json<MetricsView> {
    service.scorer().reset();
    Json(service.metrics())
}

pub(crate) async fn fail_handler(State(service): State<Arc<PredictionService>>) -> Response {
    service.scorer().simulate_failure();
    health_response(service.health())
}

pub(crate) async fn recover_handler(State(service): State<Arc<PredictionService>>) -> Response {
    service.scorer().recover();
    health_response(service.health())
}

fn health_response(view: HealthView) -> Response {
    let status = if view.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(view)).into_response()
}
