use serde::Serialize;

/// Descriptive statistics over a window of recent scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
}

/// Summarise scores; mean and sample standard deviation are rounded to 4 decimals.
pub fn summarize(scores: &[f64]) -> ScoreSummary {
    if scores.is_empty() {
        return ScoreSummary::default();
    }

    let count = scores.len();
    let mean = scores.iter().sum::<f64>() / count as f64;
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let std = if count > 1 {
        let variance = scores
            .iter()
            .map(|score| (score - mean).powi(2))
            .sum::<f64>()
            / (count - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };

    ScoreSummary {
        count,
        mean: round_to(mean, 4),
        min,
        max,
        std: round_to(std, 4),
    }
}

/// Round to `decimals` places from the exact binary value, ties to even.
pub(crate) fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_is_all_zero() {
        assert_eq!(summarize(&[]), ScoreSummary::default());
    }

    #[test]
    fn single_score_has_no_spread() {
        let summary = summarize(&[0.42]);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.mean, 0.42);
        assert_eq!(summary.std, 0.0);
    }

    #[test]
    fn summary_uses_sample_deviation() {
        let summary = summarize(&[0.1, 0.5, 0.8, 0.3, 0.9]);
        assert_eq!(summary.count, 5);
        assert_eq!(summary.mean, 0.52);
        assert_eq!(summary.min, 0.1);
        assert_eq!(summary.max, 0.9);
        assert_eq!(summary.std, 0.3347);
    }

    #[test]
    fn round_to_truncates_to_requested_places() {
        assert_eq!(round_to(0.666_666, 4), 0.6667);
        assert_eq!(round_to(0.81234, 3), 0.812);
    }

    #[test]
    fn round_to_breaks_exact_ties_to_even() {
        assert_eq!(round_to(0.78125, 4), 0.7812);
        assert_eq!(round_to(0.78135, 4), 0.7813);
    }
}
