//! OptionBot Core — tick aggregation, entry rules and position risk for index options.
//!
//! This crate contains the whole decision path and no I/O:
//! - Domain types (ticks, candles, option sides, the open position)
//! - Candle aggregation with bounded OI and underlying histories
//! - RSI momentum indicator
//! - Two-tier rule evaluator (contextual gate, then confirmation count)
//! - Risk ledger with trailing-stop ladder and daily caps
//! - Per-tick decision pipeline emitting order intents
//!
//! Broker sessions, tick transports and order routing sit outside; they talk to
//! the core through [`domain::RawTick`], [`engine::StrikeSelector`] and
//! [`engine::OrderIntent`].

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod risk;
pub mod rules;

pub use config::{BotConfig, ConfigError};
pub use engine::{DecisionPipeline, OrderIntent, StrikeSelector};
