//! Rule evaluator — turns a snapshot into a signal decision.
//!
//! Three gates run in order, each able to end the evaluation:
//! 1. trend: no direction → negative decision, nothing else evaluated;
//! 2. contextual tier: fewer than `min_contextual` checks true → negative,
//!    confirmation tier skipped;
//! 3. confirmation tier: fewer than `min_confirmation` checks true → negative.
//!
//! The evaluator keeps no state between calls: the same snapshot and config
//! always produce the same decision.

use tracing::debug;

use super::config::RuleConfig;
use super::confirmation::{breakout_retest, consolidation_breakout, oi_trend, reversal_candle, volume_spike};
use super::context::{rsi_momentum_ok, time_filter_ok};
use super::decision::{ConfirmationFlags, ContextFlags, RuleFlags, SignalDecision};
use super::trend::detect_trend;
use crate::config::ConfigError;
use crate::data::MarketSnapshot;
use crate::domain::OptionSide;

#[derive(Debug, Clone)]
pub struct RuleEvaluator {
    config: RuleConfig,
}

impl RuleEvaluator {
    pub fn new(config: RuleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn evaluate(&self, snapshot: &MarketSnapshot) -> SignalDecision {
        let cfg = &self.config;
        let candles = snapshot.candles();

        let Some(direction) = detect_trend(candles, cfg.trend_lookback) else {
            debug!(symbol = snapshot.symbol(), "no trend direction");
            return SignalDecision::rejected(None, RuleFlags::default(), "no clear trend direction".to_string());
        };

        let contextual = ContextFlags {
            trend_found: true,
            time_ok: time_filter_ok(snapshot.evaluated_at().time(), cfg),
            rsi_ok: rsi_momentum_ok(snapshot.rsi(), direction, cfg),
        };
        let contextual_count = contextual.count();
        if contextual_count < cfg.min_contextual {
            debug!(%direction, contextual_count, "contextual gate failed");
            return SignalDecision::rejected(
                Some(direction),
                RuleFlags {
                    contextual,
                    confirmation: ConfirmationFlags::default(),
                },
                format!(
                    "contextual checks {contextual_count} below minimum {}",
                    cfg.min_contextual
                ),
            );
        }

        let confirmation = self.confirmations(snapshot, direction);
        let flags = RuleFlags { contextual, confirmation };
        let confirmation_count = confirmation.count();
        if confirmation_count < cfg.min_confirmation {
            debug!(%direction, confirmation_count, "confirmation gate failed");
            return SignalDecision::rejected(
                Some(direction),
                flags,
                format!(
                    "confirmation checks {confirmation_count} below minimum {}",
                    cfg.min_confirmation
                ),
            );
        }

        SignalDecision::approved(direction, flags)
    }

    fn confirmations(&self, snapshot: &MarketSnapshot, direction: OptionSide) -> ConfirmationFlags {
        let cfg = &self.config;
        let candles = snapshot.candles();
        ConfirmationFlags {
            volume_spike: volume_spike(candles, cfg),
            oi_trend: oi_trend(candles, snapshot.open_interest(direction), direction, cfg),
            breakout_retest: breakout_retest(candles, direction, cfg),
            reversal_candle: reversal_candle(candles, direction),
            consolidation_breakout: consolidation_breakout(candles, direction, cfg),
        }
    }
}
