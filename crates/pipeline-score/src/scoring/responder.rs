use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::record::InputRecord;
use super::scorer::ScoreResult;

const HIGH_THRESHOLD: f64 = 0.7;
const MEDIUM_THRESHOLD: f64 = 0.4;

/// Three-valued bucket derived from the score. Boundaries belong to the higher bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Low,
    Medium,
    High,
}

impl Category {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            Self::High
        } else if score >= MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Successful prediction payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    pub score: f64,
    pub confidence: f64,
    pub scorer_version: String,
    pub status: &'static str,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_value: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

/// Shape a score into the response record, echoing the caller's `value` verbatim.
pub fn format(score: &ScoreResult, original: &InputRecord) -> OutputRecord {
    OutputRecord {
        score: score.score,
        confidence: score.confidence,
        scorer_version: score.scorer_version.clone(),
        status: "success",
        category: Category::from_score(score.score),
        input_value: original.value().cloned(),
        timestamp: Utc::now(),
    }
}
