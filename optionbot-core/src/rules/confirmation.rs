//! Confirmation checks — the five independent rules counted toward entry.
//!
//! Each check returns `false` when there is not enough history; none of them
//! can fail. Numeric edge cases (zero averages, zero reference levels) yield a
//! neutral result instead of an error.

use super::config::RuleConfig;
use crate::domain::{Candle, OptionSide};

/// Smallest candle range used as a denominator in wick ratios, in price points.
const MIN_CANDLE_RANGE: f64 = 1.0;

/// A hammer / shooting star needs its wick at least this many bodies long.
const WICK_TO_BODY: f64 = 2.0;

/// ...and covering more than this share of the candle range.
const WICK_TO_RANGE: f64 = 0.6;

/// Percentage change from `old` to `new`; zero when `old` is zero.
pub fn pct_change(old: f64, new: f64) -> f64 {
    if old == 0.0 {
        return 0.0;
    }
    (new - old) / old * 100.0
}

/// Arithmetic mean; zero for an empty slice.
pub fn average(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

/// Current candle volume ≥ multiplier × mean volume of the preceding `volume_lookback` candles.
pub fn volume_spike(candles: &[Candle], cfg: &RuleConfig) -> bool {
    let needed = cfg.volume_lookback + 1;
    if candles.len() < needed {
        return false;
    }
    let window = &candles[candles.len() - needed..];
    let (current, previous) = match window.split_last() {
        Some(split) => split,
        None => return false,
    };
    let avg = average(previous.iter().map(|c| c.volume));
    if avg <= 0.0 {
        return false;
    }
    current.volume >= cfg.volume_spike_multiplier * avg
}

/// Price and OI moves over the last `oi_lookback` steps agree with the direction.
///
/// CALL: price up while call OI falls (short covering).
/// PUT: price down while put OI falls.
pub fn oi_trend(candles: &[Candle], oi_series: &[i64], direction: OptionSide, cfg: &RuleConfig) -> bool {
    let needed = cfg.oi_lookback + 1;
    if candles.len() < needed || oi_series.len() < needed {
        return false;
    }
    let closes = &candles[candles.len() - needed..];
    let price_change = pct_change(closes[0].close, closes[needed - 1].close);

    let oi = &oi_series[oi_series.len() - needed..];
    let oi_change = pct_change(oi[0] as f64, oi[needed - 1] as f64);

    match direction {
        OptionSide::Call => price_change > 0.0 && oi_change < 0.0,
        OptionSide::Put => price_change < 0.0 && oi_change < 0.0,
    }
}

/// Current candle closes beyond the prior range by the tolerance and its wick
/// comes back to the broken level, after the previous candle closed inside it.
///
/// The range spans the `breakout_lookback + 1` candles before the current one.
pub fn breakout_retest(candles: &[Candle], direction: OptionSide, cfg: &RuleConfig) -> bool {
    let needed = cfg.breakout_lookback + 2;
    if candles.len() < needed {
        return false;
    }
    let window = &candles[candles.len() - needed..];
    let (current, prior) = match window.split_last() {
        Some(split) => split,
        None => return false,
    };
    let previous = match prior.last() {
        Some(c) => c,
        None => return false,
    };
    let tol = cfg.breakout_tolerance_pct / 100.0;

    match direction {
        OptionSide::Call => {
            let level = range_high(prior) * (1.0 + tol);
            previous.close <= level && current.close > level && current.low <= level
        }
        OptionSide::Put => {
            let level = range_low(prior) * (1.0 - tol);
            previous.close >= level && current.close < level && current.high >= level
        }
    }
}

/// Engulfing or hammer (CALL) / shooting star (PUT) on the last two candles.
pub fn reversal_candle(candles: &[Candle], direction: OptionSide) -> bool {
    if candles.len() < 3 {
        return false;
    }
    let prev = &candles[candles.len() - 2];
    let curr = &candles[candles.len() - 1];
    let body = curr.body();
    let range = curr.range().max(MIN_CANDLE_RANGE);

    match direction {
        OptionSide::Call => {
            let engulfing = curr.is_bullish()
                && prev.is_bearish()
                && curr.close >= prev.open.max(prev.close)
                && curr.open <= prev.open.min(prev.close);
            let wick = curr.lower_wick();
            let hammer = curr.is_bullish() && wick >= WICK_TO_BODY * body && wick / range > WICK_TO_RANGE;
            engulfing || hammer
        }
        OptionSide::Put => {
            let engulfing = curr.is_bearish()
                && prev.is_bullish()
                && curr.close <= prev.open.min(prev.close)
                && curr.open >= prev.open.max(prev.close);
            let wick = curr.upper_wick();
            let shooting_star = curr.is_bearish() && wick >= WICK_TO_BODY * body && wick / range > WICK_TO_RANGE;
            engulfing || shooting_star
        }
    }
}

/// The prior `consolidation_lookback` candles form a tight band (width under
/// `consolidation_max_range_pct` of current price) and the current close breaks it.
pub fn consolidation_breakout(candles: &[Candle], direction: OptionSide, cfg: &RuleConfig) -> bool {
    let needed = cfg.consolidation_lookback + 1;
    if candles.len() < needed {
        return false;
    }
    let window = &candles[candles.len() - needed..];
    let (current, prior) = match window.split_last() {
        Some(split) => split,
        None => return false,
    };
    if current.close <= 0.0 {
        return false;
    }
    let high = range_high(prior);
    let low = range_low(prior);
    let band_pct = (high - low) / current.close * 100.0;
    if band_pct > cfg.consolidation_max_range_pct {
        return false;
    }
    let tol = cfg.breakout_tolerance_pct / 100.0;
    match direction {
        OptionSide::Call => current.close > high * (1.0 + tol),
        OptionSide::Put => current.close < low * (1.0 - tol),
    }
}

fn range_high(candles: &[Candle]) -> f64 {
    candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max)
}

fn range_low(candles: &[Candle]) -> f64 {
    candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min)
}
