use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use pipeline_score::scoring::{admin_router, prediction_router, PredictionService};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub(crate) fn with_prediction_routes(
    service: Arc<PredictionService>,
    admin_routes: bool,
) -> Router {
    let router = prediction_router(service.clone())
        .route("/ready", get(readiness_endpoint))
        .route("/metrics/prometheus", get(prometheus_endpoint));

    if admin_routes {
        router.merge(admin_router(service))
    } else {
        router
    }
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn prometheus_endpoint(
    Extension(state): Extension<AppState>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::default_prediction_service;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use pipeline_score::error::panic_response;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    fn app_state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn app(admin_routes: bool, ready: bool) -> Router {
        with_prediction_routes(default_prediction_service(), admin_routes)
            .layer(Extension(app_state(ready)))
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request builds")
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = app(false, false)
            .oneshot(get_request("/ready"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(false, true)
            .oneshot(get_request("/ready"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn prometheus_endpoint_serves_text_exposition() {
        let response = app(false, true)
            .oneshot(get_request("/metrics/prometheus"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).expect("content type"),
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn admin_routes_are_opt_in() {
        let request = || {
            Request::post("/admin/reset")
                .body(Body::empty())
                .expect("request builds")
        };

        let response = app(false, true)
            .oneshot(request())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app(true, true)
            .oneshot(request())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn core_routes_are_mounted() {
        let response = app(false, true)
            .oneshot(get_request("/metrics"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(false, true)
            .oneshot(get_request("/health"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    async fn exploding_handler() -> &'static str {
        panic!("scorer exploded: secret detail")
    }

    #[tokio::test]
    async fn handler_panics_become_generic_server_errors() {
        let router = with_prediction_routes(default_prediction_service(), false)
            .route("/explode", get(exploding_handler))
            .layer(Extension(app_state(true)))
            .layer(CatchPanicLayer::custom(panic_response));

        let response = router
            .oneshot(get_request("/explode"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .expect("read body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error"], "internal server error");
        assert!(payload["timestamp"].is_string());
        assert!(!String::from_utf8_lossy(&body).contains("secret detail"));
    }
}
