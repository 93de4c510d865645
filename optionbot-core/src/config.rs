//! Bot configuration: one immutable aggregate loaded at startup.
//!
//! Every field has a default, so a TOML file only needs to name what it
//! overrides. Validation runs before a config is handed out; nothing is clamped.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::risk::RiskConfig;
use crate::rules::RuleConfig;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: `{field}` {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Largest accepted `history_capacity`; far beyond any rule lookback.
pub const MAX_HISTORY_CAPACITY: usize = 100_000;

/// Top-level configuration for one bot process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Underlying index traded (prefix of generated option symbols).
    pub symbol: String,
    /// Candle width in minutes.
    pub timeframe_minutes: u32,
    /// Capacity of every bounded history (candles, OI series, underlying prices).
    pub history_capacity: usize,
    /// RSI lookback.
    pub rsi_period: usize,
    pub lot_size: u32,
    pub max_lots: u32,
    /// Read by the order-routing consumer only. The core emits the same
    /// intents either way and never places orders itself.
    pub paper_trade: bool,
    /// Strike spacing used by the ATM strike selector.
    pub strike_step: u32,
    pub rules: RuleConfig,
    pub risk: RiskConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            symbol: "NIFTY".to_string(),
            timeframe_minutes: 5,
            history_capacity: 200,
            rsi_period: 14,
            lot_size: 50,
            max_lots: 1,
            paper_trade: true,
            strike_step: 50,
            rules: RuleConfig::default(),
            risk: RiskConfig::default(),
        }
    }
}

impl BotConfig {
    /// Parse and validate a TOML document.
    ///
    /// `[rules] mode` selects the tier-minimum preset; `min_confirmation` and
    /// `min_contextual` given in the same table override it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let document: toml::Table = text.parse()?;
        let mut config: BotConfig = toml::from_str(text)?;
        let rules_key = |key: &str| {
            document
                .get("rules")
                .and_then(toml::Value::as_table)
                .is_some_and(|rules| rules.contains_key(key))
        };
        config
            .rules
            .apply_mode_preset(rules_key("min_confirmation"), rules_key("min_contextual"));
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML (used by `optionbot config`).
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::invalid("symbol", "must not be empty"));
        }
        if self.timeframe_minutes == 0 {
            return Err(ConfigError::invalid("timeframe_minutes", "must be at least 1"));
        }
        if self.history_capacity == 0 || self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(ConfigError::invalid(
                "history_capacity",
                format!("must be between 1 and {MAX_HISTORY_CAPACITY}"),
            ));
        }
        if self.rsi_period == 0 {
            return Err(ConfigError::invalid("rsi_period", "must be at least 1"));
        }
        if self.lot_size == 0 {
            return Err(ConfigError::invalid("lot_size", "must be at least 1"));
        }
        if self.max_lots == 0 {
            return Err(ConfigError::invalid("max_lots", "must be at least 1"));
        }
        if self.strike_step == 0 {
            return Err(ConfigError::invalid("strike_step", "must be at least 1"));
        }
        // Lookbacks longer than the retained history could never be satisfied.
        let longest = self.rules.longest_lookback();
        if longest > self.history_capacity {
            return Err(ConfigError::invalid(
                "history_capacity",
                format!("{} is shorter than the longest rule lookback ({longest})", self.history_capacity),
            ));
        }
        self.rules.validate()?;
        self.risk.validate()?;
        Ok(())
    }

    /// Order quantity for one entry.
    pub fn order_quantity(&self) -> u32 {
        self.lot_size * self.max_lots
    }

    /// Deterministic digest of the effective configuration.
    pub fn fingerprint(&self) -> String {
        // serde_json keeps struct field order, so equal configs hash equally.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
