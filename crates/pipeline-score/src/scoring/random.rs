use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws used for the fallback score and the confidence value.
pub trait RandomSource: Send + Sync {
    /// Next draw in `[0, 1]`.
    fn next_unit(&self) -> f64;

    fn uniform(&self, low: f64, high: f64) -> f64 {
        let unit = self.next_unit().clamp(0.0, 1.0);
        low + (high - low) * unit
    }
}

/// Thread-local OS-seeded generator used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Reproducible generator for demos and tests.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&self) -> f64 {
        self.rng.lock().gen::<f64>()
    }
}

/// Replays a fixed list of draws, wrapping around at the end.
#[derive(Debug)]
pub struct FixedSequence {
    draws: Vec<f64>,
    cursor: AtomicUsize,
}

impl FixedSequence {
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        Self {
            draws: draws.into(),
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn constant(draw: f64) -> Self {
        Self::new(vec![draw])
    }
}

impl RandomSource for FixedSequence {
    fn next_unit(&self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.draws.len();
        self.draws.get(index).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_sequence_wraps_around() {
        let source = FixedSequence::new(vec![0.1, 0.2]);
        assert_eq!(source.next_unit(), 0.1);
        assert_eq!(source.next_unit(), 0.2);
        assert_eq!(source.next_unit(), 0.1);
    }

    #[test]
    fn uniform_maps_unit_draws_onto_the_range() {
        assert_eq!(FixedSequence::constant(0.0).uniform(0.7, 0.95), 0.7);
        assert_eq!(FixedSequence::constant(1.0).uniform(0.7, 0.95), 0.95);
        assert_eq!(FixedSequence::constant(4.0).uniform(0.0, 1.0), 1.0);
    }

    #[test]
    fn seeded_sources_agree() {
        let left = SeededRandom::new(7);
        let right = SeededRandom::new(7);
        for _ in 0..5 {
            let draw = left.next_unit();
            assert_eq!(draw, right.next_unit());
            assert!((0.0..1.0).contains(&draw));
        }
    }
}
