//! Risk limits and protective-level settings.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Distance between a ladder threshold and the stop it locks in, in points.
///
/// Fixed regardless of how the configured ladder is spaced.
pub const TRAIL_STEP_OFFSET: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Initial stop-loss distance below entry, in points.
    pub base_sl_points: f64,
    /// Initial target distance above entry, in points.
    pub initial_target_points: f64,
    /// Ascending unrealized-profit thresholds that ratchet the stop.
    pub trail_steps: Vec<f64>,
    /// Realized loss (positive number) at which new entries stop for the day.
    pub max_daily_loss: f64,
    /// Realized profit at which new entries stop for the day.
    pub max_daily_profit: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            base_sl_points: 30.0,
            initial_target_points: 100.0,
            trail_steps: vec![20.0, 40.0, 60.0, 80.0, 100.0, 120.0, 140.0, 160.0],
            max_daily_loss: 1250.0,
            max_daily_profit: 2500.0,
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("base_sl_points", self.base_sl_points),
            ("initial_target_points", self.initial_target_points),
            ("max_daily_loss", self.max_daily_loss),
            ("max_daily_profit", self.max_daily_profit),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(field, "must be a positive number"));
            }
        }
        if self.trail_steps.is_empty() {
            return Err(ConfigError::invalid("trail_steps", "must not be empty"));
        }
        if self.trail_steps.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ConfigError::invalid("trail_steps", "must contain positive numbers"));
        }
        if self.trail_steps.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::invalid("trail_steps", "must be strictly ascending"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = RiskConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.trail_steps.len(), 8);
    }

    #[test]
    fn unsorted_ladder_rejected() {
        let cfg = RiskConfig {
            trail_steps: vec![20.0, 60.0, 40.0],
            ..RiskConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid { field: "trail_steps", .. })
        ));
    }

    #[test]
    fn non_positive_limits_rejected() {
        let cfg = RiskConfig {
            max_daily_loss: 0.0,
            ..RiskConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = RiskConfig {
            base_sl_points: -5.0,
            ..RiskConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
