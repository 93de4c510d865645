//! Decision pipeline — the per-tick orchestrator.
//!
//! One call per tick, fully processed before the next:
//! 1. fold the tick into the aggregator;
//! 2. manage the open position at the tick price (trail, then exit check);
//! 3. if the ledger can open, build a snapshot and evaluate entry.
//!
//! The pipeline owns every piece of mutable state. Callers with several tick
//! sources serialize delivery into it (the CLI uses a single-consumer channel).

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::intent::OrderIntent;
use super::strike::StrikeSelector;
use crate::config::{BotConfig, ConfigError};
use crate::data::{CandleAggregator, MarketSnapshot, NotReady, SnapshotBuilder};
use crate::domain::{RawTick, Tick};
use crate::risk::RiskLedger;
use crate::rules::{RuleEvaluator, SignalDecision};

/// Tick counters for the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub ticks_processed: u64,
    pub ticks_rejected: u64,
    pub candles_closed: u64,
    pub evaluations: u64,
}

pub struct DecisionPipeline {
    config: BotConfig,
    aggregator: CandleAggregator,
    snapshots: SnapshotBuilder,
    evaluator: RuleEvaluator,
    ledger: RiskLedger,
    strikes: Box<dyn StrikeSelector>,
    last_decision: Option<SignalDecision>,
    stats: PipelineStats,
}

impl DecisionPipeline {
    pub fn new(config: BotConfig, strikes: Box<dyn StrikeSelector>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            aggregator: CandleAggregator::new(config.timeframe_minutes, config.history_capacity)?,
            snapshots: SnapshotBuilder::new(config.rsi_period),
            evaluator: RuleEvaluator::new(config.rules.clone())?,
            ledger: RiskLedger::new(config.risk.clone())?,
            strikes,
            last_decision: None,
            stats: PipelineStats::default(),
            config,
        })
    }

    /// Validate a transport payload and process it. Malformed ticks are logged
    /// and dropped without touching any state.
    pub fn on_raw_tick(&mut self, raw: RawTick) -> Vec<OrderIntent> {
        match Tick::try_from(raw) {
            Ok(tick) => self.on_tick(&tick),
            Err(err) => {
                self.stats.ticks_rejected += 1;
                warn!(error = %err, "dropping malformed tick");
                Vec::new()
            }
        }
    }

    /// Process a tick, evaluating the time filter against the local clock.
    pub fn on_tick(&mut self, tick: &Tick) -> Vec<OrderIntent> {
        self.on_tick_at(tick, Local::now().naive_local())
    }

    /// Process a tick with an explicit evaluation time.
    pub fn on_tick_at(&mut self, tick: &Tick, now: NaiveDateTime) -> Vec<OrderIntent> {
        self.stats.ticks_processed += 1;
        if self.aggregator.ingest(tick).is_some() {
            self.stats.candles_closed += 1;
        }

        let mut intents = Vec::new();
        if let Some(exit) = self.manage_position(tick.price) {
            intents.push(exit);
        }
        if self.ledger.can_open() {
            match self.snapshots.build_at(&self.aggregator, &self.config.symbol, now) {
                Ok(snapshot) => {
                    if let Some(entry) = self.try_enter(&snapshot, tick) {
                        intents.push(entry);
                    }
                }
                Err(not_ready) => debug!(%not_ready, "snapshot skipped"),
            }
        }
        intents
    }

    fn manage_position(&mut self, price: f64) -> Option<OrderIntent> {
        self.ledger.advance_trailing_stop(price);
        let reason = self.ledger.check_exit(price)?;
        let position = self.ledger.position()?;
        let symbol = position.symbol().to_string();
        let quantity = position.quantity();

        match self.ledger.close(price) {
            Ok(pnl) => {
                info!(%symbol, %reason, price, pnl, "exit");
                Some(OrderIntent::Exit {
                    symbol,
                    quantity,
                    price,
                    reason,
                    pnl,
                })
            }
            Err(err) => {
                warn!(error = %err, %symbol, "exit not booked");
                None
            }
        }
    }

    fn try_enter(&mut self, snapshot: &MarketSnapshot, tick: &Tick) -> Option<OrderIntent> {
        self.stats.evaluations += 1;
        let decision = self.evaluator.evaluate(snapshot);
        let approved = decision.should_enter;
        let direction = decision.direction;
        let confidence = decision.confidence;
        if !approved {
            debug!(reason = %decision.reason, "no entry");
        }
        self.last_decision = Some(decision);
        let direction = direction.filter(|_| approved)?;

        let symbol = self.strikes.select(direction, tick.underlying_price);
        let quantity = self.config.order_quantity();
        match self.ledger.open(symbol.clone(), direction, tick.price, quantity) {
            Ok(_) => {
                info!(%symbol, %direction, %confidence, price = tick.price, quantity, "entry");
                Some(OrderIntent::Entry {
                    direction,
                    symbol,
                    quantity,
                    price: tick.price,
                    confidence,
                })
            }
            Err(err) => {
                warn!(error = %err, %symbol, "entry not booked");
                None
            }
        }
    }

    /// Snapshot of the live buffers stamped with the local clock.
    pub fn try_snapshot(&self) -> Result<MarketSnapshot, NotReady> {
        self.snapshots.build(&self.aggregator, &self.config.symbol)
    }

    /// Run the rule evaluator without touching the ledger.
    pub fn evaluate(&self, snapshot: &MarketSnapshot) -> SignalDecision {
        self.evaluator.evaluate(snapshot)
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn aggregator(&self) -> &CandleAggregator {
        &self.aggregator
    }

    pub fn ledger(&self) -> &RiskLedger {
        &self.ledger
    }

    /// Direct ledger access for collaborators that manage fills themselves.
    pub fn ledger_mut(&mut self) -> &mut RiskLedger {
        &mut self.ledger
    }

    /// Decision from the most recent entry evaluation.
    pub fn last_decision(&self) -> Option<&SignalDecision> {
        self.last_decision.as_ref()
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OptionSide;
    use chrono::NaiveDate;

    const T0: i64 = 1_700_000_000;

    fn pipeline() -> DecisionPipeline {
        let selector = |side: OptionSide, price: f64| format!("NIFTY{}{}", price.round() as i64, side.suffix());
        DecisionPipeline::new(BotConfig::default(), Box::new(selector)).unwrap()
    }

    fn morning() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(10, 0, 0).unwrap()
    }

    #[test]
    fn malformed_tick_is_counted_and_dropped() {
        let mut p = pipeline();
        let intents = p.on_raw_tick(RawTick {
            volume: Some(1.0),
            ..RawTick::default()
        });
        assert!(intents.is_empty());
        assert_eq!(p.stats().ticks_rejected, 1);
        assert_eq!(p.stats().ticks_processed, 0);
        assert!(p.aggregator().current().is_none());
    }

    #[test]
    fn warmup_produces_no_intents() {
        let mut p = pipeline();
        for i in 0..10 {
            let tick = Tick::new(100.0 + i as f64, 10.0, 1_000, OptionSide::Call, 100.0, T0 + i * 300).unwrap();
            assert!(p.on_tick_at(&tick, morning()).is_empty());
        }
        assert_eq!(p.stats().ticks_processed, 10);
        assert_eq!(p.stats().evaluations, 0);
        assert!(p.try_snapshot().is_err());
    }

    #[test]
    fn open_position_is_managed_on_every_tick() {
        let mut p = pipeline();
        p.ledger_mut().open("NIFTY22500CE", OptionSide::Call, 100.0, 50).unwrap();

        let tick = |price: f64, ts: i64| Tick::new(price, 1.0, 0, OptionSide::Call, 22_500.0, ts).unwrap();
        assert!(p.on_tick_at(&tick(160.0, T0), morning()).is_empty());
        assert_eq!(p.ledger().position().unwrap().stop_loss(), 140.0);

        let intents = p.on_tick_at(&tick(139.0, T0 + 1), morning());
        assert_eq!(
            intents,
            vec![OrderIntent::Exit {
                symbol: "NIFTY22500CE".into(),
                quantity: 50,
                price: 139.0,
                reason: crate::risk::ExitReason::StopHit,
                pnl: 1_950.0,
            }]
        );
        assert!(p.ledger().position().is_none());
    }
}
