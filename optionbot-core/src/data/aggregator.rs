//! Candle aggregator — folds ticks into fixed-width OHLCV candles.
//!
//! A bucket opens at the timestamp of the tick that starts it and covers
//! `[start, start + timeframe)`. A tick at or past the boundary closes the
//! bucket and opens a new one at its own timestamp; gaps are never back-filled.
//! Timestamps are taken literally: a rewound timestamp simply lands in the
//! current bucket because it is still before the boundary.
//!
//! Alongside candles the aggregator keeps bounded call/put open-interest
//! series and the underlying price history that feeds RSI.

use tracing::{debug, warn};

use super::series::BoundedSeries;
use crate::config::ConfigError;
use crate::domain::{Candle, OptionSide, Tick};

#[derive(Debug, Clone)]
pub struct CandleAggregator {
    timeframe_secs: i64,
    current: Option<Candle>,
    candles: BoundedSeries<Candle>,
    call_oi: BoundedSeries<i64>,
    put_oi: BoundedSeries<i64>,
    underlying: BoundedSeries<f64>,
}

impl CandleAggregator {
    pub fn new(timeframe_minutes: u32, capacity: usize) -> Result<Self, ConfigError> {
        if timeframe_minutes == 0 {
            return Err(ConfigError::invalid("timeframe_minutes", "must be at least 1"));
        }
        if capacity == 0 {
            return Err(ConfigError::invalid("history_capacity", "must be at least 1"));
        }
        Ok(Self {
            timeframe_secs: i64::from(timeframe_minutes) * 60,
            current: None,
            candles: BoundedSeries::new(capacity),
            call_oi: BoundedSeries::new(capacity),
            put_oi: BoundedSeries::new(capacity),
            underlying: BoundedSeries::new(capacity),
        })
    }

    /// Fold a validated tick: candle update, OI sample (if the transport
    /// classified its side), underlying price.
    ///
    /// Returns the candle that closed as a result of this tick, if any.
    pub fn ingest(&mut self, tick: &Tick) -> Option<Candle> {
        let closed = self.fold_price(tick.price, tick.volume, tick.timestamp);
        if let Some((side, oi)) = tick.oi_sample() {
            self.record_open_interest(side, oi);
        }
        self.record_underlying_price(tick.underlying_price);
        closed
    }

    /// Candle-only part of [`ingest`](Self::ingest).
    pub fn fold_price(&mut self, price: f64, volume: f64, timestamp: i64) -> Option<Candle> {
        if !price.is_finite() || !volume.is_finite() {
            warn!(price, volume, timestamp, "dropping tick with non-finite price or volume");
            return None;
        }

        let current = match self.current.as_mut() {
            Some(candle) => candle,
            None => {
                self.current = Some(Candle::open_at(timestamp, price, volume));
                return None;
            }
        };

        if timestamp < current.start.saturating_add(self.timeframe_secs) {
            current.absorb(price, volume);
            return None;
        }

        let closed = *current;
        self.candles.push(closed);
        self.current = Some(Candle::open_at(timestamp, price, volume));
        debug!(
            start = closed.start,
            open = closed.open,
            high = closed.high,
            low = closed.low,
            close = closed.close,
            volume = closed.volume,
            "candle closed"
        );
        Some(closed)
    }

    pub fn record_open_interest(&mut self, side: OptionSide, value: i64) {
        match side {
            OptionSide::Call => self.call_oi.push(value),
            OptionSide::Put => self.put_oi.push(value),
        };
    }

    pub fn record_underlying_price(&mut self, value: f64) {
        if !value.is_finite() {
            warn!(value, "dropping non-finite underlying price");
            return;
        }
        self.underlying.push(value);
    }

    /// Closed candles, oldest first.
    pub fn candles(&self) -> &BoundedSeries<Candle> {
        &self.candles
    }

    /// The bucket still receiving ticks.
    pub fn current(&self) -> Option<&Candle> {
        self.current.as_ref()
    }

    pub fn open_interest(&self, side: OptionSide) -> &BoundedSeries<i64> {
        match side {
            OptionSide::Call => &self.call_oi,
            OptionSide::Put => &self.put_oi,
        }
    }

    pub fn underlying_prices(&self) -> &BoundedSeries<f64> {
        &self.underlying
    }

    pub fn timeframe_minutes(&self) -> u32 {
        (self.timeframe_secs / 60) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000;

    fn agg() -> CandleAggregator {
        CandleAggregator::new(5, 200).unwrap()
    }

    #[test]
    fn first_tick_opens_candle() {
        let mut a = agg();
        assert!(a.fold_price(100.0, 10.0, T0).is_none());
        let c = a.current().unwrap();
        assert_eq!((c.open, c.high, c.low, c.close, c.volume), (100.0, 100.0, 100.0, 100.0, 10.0));
        assert_eq!(c.start, T0);
        assert!(a.candles().is_empty());
    }

    #[test]
    fn ticks_inside_bucket_update_in_place() {
        let mut a = agg();
        a.fold_price(100.0, 10.0, T0);
        a.fold_price(103.0, 5.0, T0 + 60);
        a.fold_price(98.0, 5.0, T0 + 120);
        a.fold_price(101.0, 1.0, T0 + 299);
        let c = a.current().unwrap();
        assert_eq!(c.high, 103.0);
        assert_eq!(c.low, 98.0);
        assert_eq!(c.close, 101.0);
        assert_eq!(c.volume, 21.0);
        assert!(a.candles().is_empty());
    }

    #[test]
    fn boundary_tick_closes_bucket() {
        let mut a = agg();
        a.fold_price(100.0, 10.0, T0);
        a.fold_price(102.0, 10.0, T0 + 100);
        let closed = a.fold_price(105.0, 7.0, T0 + 300).unwrap();
        assert_eq!(closed.start, T0);
        assert_eq!(closed.close, 102.0);
        assert_eq!(a.candles().len(), 1);
        let c = a.current().unwrap();
        assert_eq!(c.start, T0 + 300);
        assert_eq!((c.open, c.volume), (105.0, 7.0));
    }

    #[test]
    fn gap_starts_bucket_at_tick_time_without_backfill() {
        let mut a = agg();
        a.fold_price(100.0, 1.0, T0);
        a.fold_price(110.0, 1.0, T0 + 3_600);
        assert_eq!(a.candles().len(), 1);
        assert_eq!(a.current().unwrap().start, T0 + 3_600);
    }

    #[test]
    fn rewound_timestamp_stays_in_current_bucket() {
        let mut a = agg();
        a.fold_price(100.0, 1.0, T0);
        assert!(a.fold_price(90.0, 1.0, T0 - 500).is_none());
        assert_eq!(a.current().unwrap().low, 90.0);
    }

    #[test]
    fn history_is_bounded() {
        let mut a = CandleAggregator::new(1, 3).unwrap();
        for i in 0..10 {
            a.fold_price(100.0 + i as f64, 1.0, T0 + i * 60);
        }
        assert_eq!(a.candles().len(), 3);
        let closes: Vec<f64> = a.candles().iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![106.0, 107.0, 108.0]);
    }

    #[test]
    fn oi_goes_to_the_classified_side() {
        let mut a = agg();
        a.ingest(&Tick::new(100.0, 1.0, 500, OptionSide::Put, 22_000.0, T0).unwrap());
        a.ingest(&Tick::new(100.0, 1.0, 700, OptionSide::Call, 22_001.0, T0 + 1).unwrap());
        assert_eq!(a.open_interest(OptionSide::Put).to_vec(), vec![500]);
        assert_eq!(a.open_interest(OptionSide::Call).to_vec(), vec![700]);
        assert_eq!(a.underlying_prices().to_vec(), vec![22_000.0, 22_001.0]);
    }

    #[test]
    fn non_finite_price_is_ignored() {
        let mut a = agg();
        assert!(a.fold_price(f64::NAN, 1.0, T0).is_none());
        assert!(a.current().is_none());
    }

    #[test]
    fn zero_timeframe_rejected() {
        assert!(CandleAggregator::new(0, 200).is_err());
        assert!(CandleAggregator::new(5, 0).is_err());
    }
}
