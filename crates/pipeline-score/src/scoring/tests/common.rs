use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::scoring::{
    admin_router, prediction_router, FixedSequence, PredictionService, RandomSource, ScoreResult,
    Scorer, SCORER_VERSION,
};

/// Scorer whose fallback and confidence draws always come from `draws`.
pub(super) fn scorer_with(draws: Vec<f64>) -> Arc<Scorer> {
    let random: Arc<dyn RandomSource> = Arc::new(FixedSequence::new(draws));
    Arc::new(Scorer::new(random))
}

pub(super) fn fixed_scorer() -> Arc<Scorer> {
    scorer_with(vec![0.5])
}

pub(super) fn build_service() -> (Arc<PredictionService>, Arc<Scorer>) {
    let scorer = fixed_scorer();
    let service = Arc::new(PredictionService::new(scorer.clone()));
    (service, scorer)
}

pub(super) fn router_with_admin(service: Arc<PredictionService>) -> axum::Router {
    prediction_router(service.clone()).merge(admin_router(service))
}

pub(super) fn score_result(score: f64) -> ScoreResult {
    ScoreResult {
        score,
        confidence: 0.8,
        scorer_version: SCORER_VERSION.to_string(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn json_request(
    method: &str,
    uri: &str,
    body: &Value,
) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serialize body"),
        ))
        .expect("request builds")
}

pub(super) fn empty_request(method: &str, uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .expect("request builds")
}
