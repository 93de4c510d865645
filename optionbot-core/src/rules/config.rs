//! Rule thresholds.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::domain::OptionSide;

/// Number of checks in the contextual tier (trend found, time filter, RSI band).
pub const CONTEXTUAL_RULES: usize = 3;

/// Number of checks in the confirmation tier.
pub const CONFIRMATION_RULES: usize = 5;

/// Confirmation strictness preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    #[default]
    Normal,
    /// Requires four confirmations and two contextual checks.
    Strict,
}

/// Inclusive RSI band `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiBand {
    pub min: f64,
    pub max: f64,
}

impl RsiBand {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// All thresholds used by the rule evaluator. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub mode: EngineMode,
    /// Current volume must be at least this multiple of the lookback average.
    pub volume_spike_multiplier: f64,
    pub volume_lookback: usize,
    /// Points of price / OI history compared by the OI trend check.
    pub oi_lookback: usize,
    pub breakout_lookback: usize,
    /// Breakout tolerance, in percent of the broken level.
    pub breakout_tolerance_pct: f64,
    pub consolidation_lookback: usize,
    /// Widest consolidation band, in percent of current price.
    pub consolidation_max_range_pct: f64,
    /// Start of the no-entry window (inclusive).
    pub avoid_start: NaiveTime,
    /// End of the no-entry window (inclusive).
    pub avoid_end: NaiveTime,
    pub rsi_call_band: RsiBand,
    pub rsi_put_band: RsiBand,
    pub trend_lookback: usize,
    pub min_confirmation: usize,
    pub min_contextual: usize,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            mode: EngineMode::Normal,
            volume_spike_multiplier: 1.5,
            volume_lookback: 20,
            oi_lookback: 5,
            breakout_lookback: 20,
            breakout_tolerance_pct: 0.05,
            consolidation_lookback: 15,
            consolidation_max_range_pct: 0.35,
            avoid_start: NaiveTime::from_hms_opt(12, 30, 0).unwrap_or(NaiveTime::MIN),
            avoid_end: NaiveTime::from_hms_opt(13, 30, 0).unwrap_or(NaiveTime::MIN),
            rsi_call_band: RsiBand::new(45.0, 60.0),
            rsi_put_band: RsiBand::new(40.0, 55.0),
            trend_lookback: 4,
            min_confirmation: 3,
            min_contextual: 1,
        }
    }
}

impl RuleConfig {
    /// Strict preset: defaults with tighter tier minimums.
    pub fn strict() -> Self {
        Self {
            mode: EngineMode::Strict,
            min_confirmation: 4,
            min_contextual: 2,
            ..Self::default()
        }
    }

    /// Defaults for the given preset.
    pub fn for_mode(mode: EngineMode) -> Self {
        match mode {
            EngineMode::Normal => Self::default(),
            EngineMode::Strict => Self::strict(),
        }
    }

    /// Fill tier minimums a config file left unset from the mode's preset.
    ///
    /// Explicit `min_confirmation` / `min_contextual` values always win.
    pub(crate) fn apply_mode_preset(&mut self, confirmation_set: bool, contextual_set: bool) {
        let preset = Self::for_mode(self.mode);
        if !confirmation_set {
            self.min_confirmation = preset.min_confirmation;
        }
        if !contextual_set {
            self.min_contextual = preset.min_contextual;
        }
    }

    /// RSI band that applies to `direction`.
    pub fn rsi_band(&self, direction: OptionSide) -> RsiBand {
        match direction {
            OptionSide::Call => self.rsi_call_band,
            OptionSide::Put => self.rsi_put_band,
        }
    }

    /// Largest number of closed candles any rule looks at.
    pub fn longest_lookback(&self) -> usize {
        [
            self.volume_lookback + 1,
            self.oi_lookback + 1,
            self.breakout_lookback + 2,
            self.consolidation_lookback + 1,
            self.trend_lookback,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.volume_spike_multiplier.is_finite() && self.volume_spike_multiplier > 0.0) {
            return Err(ConfigError::invalid("volume_spike_multiplier", "must be a positive number"));
        }
        for (field, value) in [
            ("volume_lookback", self.volume_lookback),
            ("oi_lookback", self.oi_lookback),
            ("breakout_lookback", self.breakout_lookback),
            ("consolidation_lookback", self.consolidation_lookback),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be at least 1"));
            }
        }
        if self.trend_lookback < 2 {
            return Err(ConfigError::invalid("trend_lookback", "must be at least 2"));
        }
        if !(self.breakout_tolerance_pct.is_finite() && self.breakout_tolerance_pct >= 0.0) {
            return Err(ConfigError::invalid("breakout_tolerance_pct", "must be zero or positive"));
        }
        if !(self.consolidation_max_range_pct.is_finite() && self.consolidation_max_range_pct > 0.0) {
            return Err(ConfigError::invalid("consolidation_max_range_pct", "must be positive"));
        }
        if self.avoid_start > self.avoid_end {
            return Err(ConfigError::invalid("avoid_start", "must not be after avoid_end"));
        }
        for (field, band) in [("rsi_call_band", self.rsi_call_band), ("rsi_put_band", self.rsi_put_band)] {
            if !(0.0..=100.0).contains(&band.min) || !(0.0..=100.0).contains(&band.max) || band.min > band.max {
                return Err(ConfigError::invalid(field, "must satisfy 0 <= min <= max <= 100"));
            }
        }
        if self.min_confirmation == 0 || self.min_confirmation > CONFIRMATION_RULES {
            return Err(ConfigError::invalid(
                "min_confirmation",
                format!("must be between 1 and {CONFIRMATION_RULES}"),
            ));
        }
        if self.min_contextual > CONTEXTUAL_RULES {
            return Err(ConfigError::invalid(
                "min_contextual",
                format!("must not exceed {CONTEXTUAL_RULES}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds() {
        let cfg = RuleConfig::default();
        assert_eq!(cfg.volume_spike_multiplier, 1.5);
        assert_eq!(cfg.trend_lookback, 4);
        assert_eq!(cfg.min_confirmation, 3);
        assert_eq!(cfg.min_contextual, 1);
        assert_eq!(cfg.avoid_start, NaiveTime::from_hms_opt(12, 30, 0).unwrap());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn strict_preset_tightens_minimums() {
        let cfg = RuleConfig::for_mode(EngineMode::Strict);
        assert_eq!(cfg.mode, EngineMode::Strict);
        assert_eq!(cfg.min_confirmation, 4);
        assert_eq!(cfg.min_contextual, 2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn mode_preset_fills_unset_minimums_only() {
        let mut cfg = RuleConfig {
            mode: EngineMode::Strict,
            min_confirmation: 5,
            ..RuleConfig::default()
        };
        cfg.apply_mode_preset(true, false);
        assert_eq!(cfg.min_confirmation, 5);
        assert_eq!(cfg.min_contextual, 2);

        let mut normal = RuleConfig::default();
        normal.apply_mode_preset(false, false);
        assert_eq!(normal, RuleConfig::default());
    }

    #[test]
    fn band_is_inclusive() {
        let band = RsiBand::new(45.0, 60.0);
        assert!(band.contains(45.0));
        assert!(band.contains(60.0));
        assert!(!band.contains(60.01));
    }

    #[test]
    fn band_selected_by_direction() {
        let cfg = RuleConfig::default();
        assert_eq!(cfg.rsi_band(OptionSide::Call), RsiBand::new(45.0, 60.0));
        assert_eq!(cfg.rsi_band(OptionSide::Put), RsiBand::new(40.0, 55.0));
    }

    #[test]
    fn inverted_band_rejected() {
        let cfg = RuleConfig {
            rsi_put_band: RsiBand::new(60.0, 40.0),
            ..RuleConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { field: "rsi_put_band", .. })));
    }

    #[test]
    fn unreachable_confirmation_minimum_rejected() {
        let cfg = RuleConfig {
            min_confirmation: 6,
            ..RuleConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_avoid_window_rejected() {
        let cfg = RuleConfig {
            avoid_start: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            ..RuleConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { field: "avoid_start", .. })));
    }

    #[test]
    fn longest_lookback_is_breakout_window() {
        assert_eq!(RuleConfig::default().longest_lookback(), 22);
    }
}
