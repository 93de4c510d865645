//! Trailing-stop ladder with ratchet enforcement
//!
//! **Core Rule:** the stop may rise, never fall.
//!
//! Every ladder threshold reached by unrealized profit proposes a stop of
//! `entry + (threshold - TRAIL_STEP_OFFSET)`; a proposal replaces the current
//! stop only when strictly greater.

use super::config::TRAIL_STEP_OFFSET;

/// Ratchet on a long option stop-loss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratchet {
    level: f64,
}

impl Ratchet {
    pub fn new(initial_level: f64) -> Self {
        Self { level: initial_level }
    }

    /// Offer a new level. Returns `true` if the stop moved.
    pub fn apply(&mut self, proposed: f64) -> bool {
        if proposed > self.level {
            self.level = proposed;
            true
        } else {
            false
        }
    }

    pub fn level(&self) -> f64 {
        self.level
    }
}

/// Fixed schedule of profit thresholds (points above entry).
#[derive(Debug, Clone, PartialEq)]
pub struct TrailingLadder {
    steps: Vec<f64>,
}

impl TrailingLadder {
    /// `steps` must already be validated as ascending.
    pub fn new(steps: Vec<f64>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[f64] {
        &self.steps
    }

    /// Highest stop the ladder allows at `profit` points, if any threshold is reached.
    pub fn candidate(&self, entry_price: f64, profit: f64) -> Option<f64> {
        self.steps
            .iter()
            .filter(|&&threshold| profit >= threshold)
            .map(|threshold| entry_price + (threshold - TRAIL_STEP_OFFSET))
            .fold(None, |best: Option<f64>, c| Some(best.map_or(c, |b| b.max(c))))
    }

    /// Walk the ladder at `price` and ratchet `stop`. Returns the new stop if it moved.
    pub fn advance(&self, entry_price: f64, price: f64, stop: &mut Ratchet) -> Option<f64> {
        let candidate = self.candidate(entry_price, price - entry_price)?;
        stop.apply(candidate).then(|| stop.level())
    }
}
