//! Market snapshot — the immutable input to rule evaluation.
//!
//! The builder copies candles and OI series out of the aggregator, so the
//! evaluator can never observe (or cause) later mutation of the live buffers.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::aggregator::CandleAggregator;
use crate::domain::{Candle, OptionSide};
use crate::indicators::Rsi;

/// Closed candles required before a snapshot is built.
pub const MIN_CANDLES: usize = 3;

/// OI samples required on each side before a snapshot is built.
pub const MIN_OI_SAMPLES: usize = 5;

/// Immutable view of the market at one evaluation instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    symbol: String,
    candles: Vec<Candle>,
    call_oi: Vec<i64>,
    put_oi: Vec<i64>,
    rsi: f64,
    evaluated_at: NaiveDateTime,
    timeframe_minutes: u32,
}

impl MarketSnapshot {
    pub fn new(
        symbol: impl Into<String>,
        candles: Vec<Candle>,
        call_oi: Vec<i64>,
        put_oi: Vec<i64>,
        rsi: f64,
        evaluated_at: NaiveDateTime,
        timeframe_minutes: u32,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            candles,
            call_oi,
            put_oi,
            rsi,
            evaluated_at,
            timeframe_minutes,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Closed candles, oldest first.
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn open_interest(&self, side: OptionSide) -> &[i64] {
        match side {
            OptionSide::Call => &self.call_oi,
            OptionSide::Put => &self.put_oi,
        }
    }

    pub fn rsi(&self) -> f64 {
        self.rsi
    }

    /// Wall-clock time the snapshot was taken (drives the time filter).
    pub fn evaluated_at(&self) -> NaiveDateTime {
        self.evaluated_at
    }

    pub fn timeframe_minutes(&self) -> u32 {
        self.timeframe_minutes
    }

    /// Close of the newest closed candle.
    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }
}

/// Why a snapshot could not be built yet. A normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotReady {
    pub candles: usize,
    pub call_oi: usize,
    pub put_oi: usize,
}

impl fmt::Display for NotReady {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "not ready: candles {}/{MIN_CANDLES}, call OI {}/{MIN_OI_SAMPLES}, put OI {}/{MIN_OI_SAMPLES}",
            self.candles, self.call_oi, self.put_oi
        )
    }
}

/// Assembles snapshots once the minimum history is available.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotBuilder {
    rsi: Rsi,
}

impl SnapshotBuilder {
    pub fn new(rsi_period: usize) -> Self {
        Self {
            rsi: Rsi::new(rsi_period),
        }
    }

    /// Build a snapshot stamped with the current local time.
    pub fn build(&self, aggregator: &CandleAggregator, symbol: &str) -> Result<MarketSnapshot, NotReady> {
        self.build_at(aggregator, symbol, Local::now().naive_local())
    }

    /// Build a snapshot stamped with `now`.
    pub fn build_at(
        &self,
        aggregator: &CandleAggregator,
        symbol: &str,
        now: NaiveDateTime,
    ) -> Result<MarketSnapshot, NotReady> {
        let candles = aggregator.candles();
        let call_oi = aggregator.open_interest(OptionSide::Call);
        let put_oi = aggregator.open_interest(OptionSide::Put);

        if candles.len() < MIN_CANDLES || call_oi.len() < MIN_OI_SAMPLES || put_oi.len() < MIN_OI_SAMPLES {
            return Err(NotReady {
                candles: candles.len(),
                call_oi: call_oi.len(),
                put_oi: put_oi.len(),
            });
        }

        let prices = aggregator.underlying_prices().to_vec();
        Ok(MarketSnapshot::new(
            symbol,
            candles.to_vec(),
            call_oi.to_vec(),
            put_oi.to_vec(),
            self.rsi.compute(&prices),
            now,
            aggregator.timeframe_minutes(),
        ))
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self { rsi: Rsi::default() }
    }
}
