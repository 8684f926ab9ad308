//! Request validation, scoring, and response shaping for the prediction endpoint.
//!
//! Requests flow through [`validator::validate`], then [`Scorer::score`], then
//! [`responder::format`]. [`PredictionService`] sequences the three stages and owns the
//! health and metrics views; [`prediction_router`] exposes it over HTTP.

pub mod random;
pub mod record;
pub mod responder;
pub mod router;
pub mod scorer;
pub mod service;
pub mod stats;
pub mod validator;

#[cfg(test)]
mod tests;

pub use random::{FixedSequence, RandomSource, SeededRandom, ThreadRandom};
pub use record::InputRecord;
pub use responder::{Category, OutputRecord};
pub use router::{admin_router, prediction_router, AVAILABLE_ENDPOINTS};
pub use scorer::{ComputationError, ScoreResult, Scorer, ScorerSnapshot, SCORER_VERSION};
pub use service::{
    HealthStatus, HealthView, MetricsView, PredictionService, ServiceDescriptor, ServiceError,
};
pub use stats::{summarize, ScoreSummary};
pub use validator::{validate, ValidationFailure, ValidationResult};
