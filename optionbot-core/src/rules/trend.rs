//! Trend structure — the direction gate.
//!
//! Over the last `lookback` candles:
//! - CALL: closes strictly rising and lows never falling (higher highs, higher lows).
//! - PUT: closes strictly falling and highs never rising.
//!
//! Anything else is "no direction".

use crate::domain::{Candle, OptionSide};

pub fn detect_trend(candles: &[Candle], lookback: usize) -> Option<OptionSide> {
    if lookback < 2 || candles.len() < lookback {
        return None;
    }
    let window = &candles[candles.len() - lookback..];

    let rising_closes = window.windows(2).all(|w| w[0].close < w[1].close);
    let rising_lows = window.windows(2).all(|w| w[0].low <= w[1].low);
    if rising_closes && rising_lows {
        return Some(OptionSide::Call);
    }

    let falling_closes = window.windows(2).all(|w| w[0].close > w[1].close);
    let falling_highs = window.windows(2).all(|w| w[0].high >= w[1].high);
    if falling_closes && falling_highs {
        return Some(OptionSide::Put);
    }

    None
}
