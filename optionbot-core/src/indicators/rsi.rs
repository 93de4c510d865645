//! Relative Strength Index (RSI) over the underlying price history.
//!
//! Simple averages over the most recent `period` deltas, walking back from the
//! newest sample:
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Edge cases: fewer than `period + 1` samples → 50.0 (neutral);
//! a zero average gain or loss is replaced by `RSI_EPSILON`.

/// Value returned when there is not enough history.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Substitute for a zero average gain or loss.
pub const RSI_EPSILON: f64 = 1e-4;

pub fn rsi(prices: &[f64], period: usize) -> f64 {
    let n = prices.len();
    if period == 0 || n < period + 1 {
        return NEUTRAL_RSI;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=period {
        let change = prices[n - i] - prices[n - i - 1];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    let mut avg_gain = gains / period as f64;
    let mut avg_loss = losses / period as f64;
    if avg_gain == 0.0 {
        avg_gain = RSI_EPSILON;
    }
    if avg_loss == 0.0 {
        avg_loss = RSI_EPSILON;
    }

    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

/// RSI with a fixed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Samples needed before the value stops being neutral.
    pub fn lookback(&self) -> usize {
        self.period + 1
    }

    pub fn compute(&self, prices: &[f64]) -> f64 {
        rsi(prices, self.period)
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}
