//! Indicators computed from the underlying price history.
//!
//! Indicators are pure functions of their input: no state is kept between
//! calls, so the same history always yields the same value.

pub mod rsi;

pub use rsi::{rsi, Rsi, NEUTRAL_RSI, RSI_EPSILON};

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
