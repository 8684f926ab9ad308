use metrics_exporter_prometheus::PrometheusHandle;
use pipeline_score::scoring::{PredictionService, Scorer};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn default_prediction_service() -> Arc<PredictionService> {
    Arc::new(PredictionService::new(Arc::new(Scorer::default())))
}
