//! Contextual filters: time of day and RSI momentum band.

use chrono::NaiveTime;

use super::config::RuleConfig;
use crate::domain::OptionSide;

/// False while `now` sits inside the configured avoid window (both ends inclusive).
pub fn time_filter_ok(now: NaiveTime, cfg: &RuleConfig) -> bool {
    !(cfg.avoid_start <= now && now <= cfg.avoid_end)
}

/// True when `rsi` sits inside the band for `direction`.
pub fn rsi_momentum_ok(rsi: f64, direction: OptionSide, cfg: &RuleConfig) -> bool {
    cfg.rsi_band(direction).contains(rsi)
}
