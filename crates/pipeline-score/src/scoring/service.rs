use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::record::InputRecord;
use super::responder::{self, OutputRecord};
use super::scorer::{ComputationError, Scorer, SCORER_VERSION};
use super::stats::ScoreSummary;
use super::validator::{self, ValidationFailure};

pub const SERVICE_NAME: &str = "CI/CD Example API";
pub const SERVICE_VERSION: &str = "1.0.0";

/// Facade sequencing validation, scoring and response shaping.
pub struct PredictionService {
    scorer: Arc<Scorer>,
}

impl PredictionService {
    pub fn new(scorer: Arc<Scorer>) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Accept a raw request body, rejecting anything that is not a JSON document.
    pub fn predict_payload(
        &self,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<OutputRecord, ServiceError> {
        if !content_type.is_some_and(is_json_content_type) {
            warn!(?content_type, "rejected non-json prediction request");
            return Err(ServiceError::InputShape);
        }

        let input: Value = serde_json::from_slice(body).map_err(|err| {
            warn!(%err, "rejected malformed json body");
            ServiceError::InputShape
        })?;

        self.predict(input)
    }

    /// Validate, score and format a parsed payload.
    pub fn predict(&self, input: Value) -> Result<OutputRecord, ServiceError> {
        if let Err(failure) = validator::check(&input) {
            warn!(%failure, "prediction input rejected");
            return Err(failure.into());
        }

        let record = InputRecord::from_value(input).ok_or(ValidationFailure::NotARecord)?;

        let score = self.scorer.score(&record).map_err(|err| {
            error!(%err, "scoring failed");
            ServiceError::from(err)
        })?;

        let output = responder::format(&score, &record);
        info!(
            score = output.score,
            category = output.category.label(),
            "prediction made"
        );
        Ok(output)
    }

    pub fn health(&self) -> HealthView {
        let healthy = self.scorer.is_healthy();
        HealthView {
            status: if healthy {
                HealthStatus::Healthy
            } else {
                HealthStatus::Unhealthy
            },
            model_loaded: healthy,
            version: SERVICE_VERSION,
            timestamp: Utc::now(),
        }
    }

    pub fn metrics(&self) -> MetricsView {
        let snapshot = self.scorer.snapshot();
        MetricsView {
            total_predictions: snapshot.invocation_count,
            uptime_seconds: self.scorer.uptime(),
            last_prediction: snapshot.last_invocation_time,
            model_version: SCORER_VERSION,
            score_summary: snapshot.summary,
            timestamp: Utc::now(),
        }
    }

    pub fn descriptor() -> ServiceDescriptor {
        let endpoints = BTreeMap::from([
            ("GET /", "service information"),
            ("GET /health", "health check"),
            ("POST /predict", "score a record"),
            ("GET /metrics", "service metrics"),
        ]);

        ServiceDescriptor {
            service: SERVICE_NAME,
            version: SERVICE_VERSION,
            status: "running",
            endpoints,
            timestamp: Utc::now(),
        }
    }
}

/// `application/json` or any `application/*+json` media type.
pub fn is_json_content_type(content_type: &str) -> bool {
    let Ok(parsed) = content_type.parse::<mime::Mime>() else {
        return false;
    };

    parsed.type_() == mime::APPLICATION
        && (parsed.subtype() == mime::JSON || parsed.suffix() == Some(mime::JSON))
}

/// Error raised by the prediction facade.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("content type must be a structured record")]
    InputShape,
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Computation(#[from] ComputationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthView {
    pub status: HealthStatus,
    pub model_loaded: bool,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl HealthView {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsView {
    pub total_predictions: u64,
    pub uptime_seconds: u64,
    pub last_prediction: Option<DateTime<Utc>>,
    pub model_version: &'static str,
    pub score_summary: ScoreSummary,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceDescriptor {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
    pub timestamp: DateTime<Utc>,
}
