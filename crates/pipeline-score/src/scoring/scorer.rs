use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

use super::random::{RandomSource, ThreadRandom};
use super::record::{as_number, InputRecord};
use super::stats::{round_to, summarize, ScoreSummary};

/// Revision of the scoring formula.
pub const SCORER_VERSION: &str = "1.0.0";

const MIDPOINT: f64 = 50.0;
const CONFIDENCE_LOW: f64 = 0.70;
const CONFIDENCE_HIGH: f64 = 0.95;
const SCORE_WINDOW: usize = 1000;

/// Raised when `value` is present but cannot be read as a number.
#[derive(Debug, thiserror::Error)]
pub enum ComputationError {
    #[error("value {raw} is not numeric")]
    NonNumericValue { raw: String },
}

/// Score produced for a single request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub score: f64,
    pub confidence: f64,
    pub scorer_version: String,
}

/// Consistent copy of the scorer counters taken under a single lock.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorerSnapshot {
    pub invocation_count: u64,
    pub last_invocation_time: Option<DateTime<Utc>>,
    pub healthy: bool,
    pub started_at: DateTime<Utc>,
    pub summary: ScoreSummary,
}

#[derive(Debug)]
struct ScorerState {
    invocation_count: u64,
    last_invocation_time: Option<DateTime<Utc>>,
    healthy: bool,
    recent_scores: VecDeque<f64>,
}

/// Deterministic proximity-to-midpoint scorer with a random fallback.
///
/// Counters, the health flag and the recent-score window share one mutex so a score
/// call updates them as a unit and readers never see a partial update.
pub struct Scorer {
    state: Mutex<ScorerState>,
    started_at: DateTime<Utc>,
    random: Arc<dyn RandomSource>,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(Arc::new(ThreadRandom))
    }
}

impl Scorer {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        info!(version = SCORER_VERSION, "scorer initialized");
        Self {
            state: Mutex::new(ScorerState {
                invocation_count: 0,
                last_invocation_time: None,
                healthy: true,
                recent_scores: VecDeque::with_capacity(SCORE_WINDOW),
            }),
            started_at: Utc::now(),
            random,
        }
    }

    /// Score a record and record the invocation.
    pub fn score(&self, input: &InputRecord) -> Result<ScoreResult, ComputationError> {
        let score = match input.value() {
            Some(raw) => {
                let value = as_number(raw).ok_or_else(|| ComputationError::NonNumericValue {
                    raw: raw.to_string(),
                })?;
                proximity_score(value)
            }
            None => round_to(self.random.uniform(0.0, 1.0), 4),
        };
        let confidence = round_to(self.random.uniform(CONFIDENCE_LOW, CONFIDENCE_HIGH), 3);

        let count = {
            let mut state = self.state.lock();
            state.invocation_count += 1;
            state.last_invocation_time = Some(Utc::now());
            if state.recent_scores.len() == SCORE_WINDOW {
                state.recent_scores.pop_front();
            }
            state.recent_scores.push_back(score);
            state.invocation_count
        };

        info!(score, confidence, count, "score computed");

        Ok(ScoreResult {
            score,
            confidence,
            scorer_version: SCORER_VERSION.to_string(),
        })
    }

    pub fn is_healthy(&self) -> bool {
        self.state.lock().healthy
    }

    pub fn simulate_failure(&self) {
        self.state.lock().healthy = false;
        warn!("scorer failure simulated");
    }

    pub fn recover(&self) {
        self.state.lock().healthy = true;
        info!("scorer recovered");
    }

    /// Zero the counters and forget the recent-score window.
    pub fn reset(&self) {
        {
            let mut state = self.state.lock();
            state.invocation_count = 0;
            state.last_invocation_time = None;
            state.recent_scores.clear();
        }
        info!("scorer stats reset");
    }

    pub fn invocation_count(&self) -> u64 {
        self.state.lock().invocation_count
    }

    pub fn last_invocation_time(&self) -> Option<DateTime<Utc>> {
        self.state.lock().last_invocation_time
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whole seconds since construction.
    pub fn uptime(&self) -> u64 {
        let elapsed = Utc::now().signed_duration_since(self.started_at);
        u64::try_from(elapsed.num_seconds()).unwrap_or(0)
    }

    pub fn version(&self) -> &'static str {
        SCORER_VERSION
    }

    pub fn snapshot(&self) -> ScorerSnapshot {
        let state = self.state.lock();
        let window: Vec<f64> = state.recent_scores.iter().copied().collect();
        ScorerSnapshot {
            invocation_count: state.invocation_count,
            last_invocation_time: state.last_invocation_time,
            healthy: state.healthy,
            started_at: self.started_at,
            summary: summarize(&window),
        }
    }
}

/// `1 / (1 + |v - 50| / 50)` rounded to 4 decimals: 1.0 at the midpoint, 0.5 at 0 and 100.
pub fn proximity_score(value: f64) -> f64 {
    round_to(1.0 / (1.0 + (value - MIDPOINT).abs() / MIDPOINT), 4)
}
