//! Two-tier entry rules.
//!
//! The contextual tier (trend found, time of day, RSI band) must pass before the
//! confirmation tier (volume, OI, breakout, reversal, consolidation) is even
//! looked at. Every check is a free function over candles so it can be tested
//! on its own; [`RuleEvaluator`] wires them into gates.

pub mod config;
pub mod confirmation;
pub mod context;
pub mod decision;
pub mod evaluator;
pub mod trend;

pub use config::{EngineMode, RsiBand, RuleConfig, CONFIRMATION_RULES, CONTEXTUAL_RULES};
pub use decision::{Confidence, ConfirmationFlags, ContextFlags, RuleFlags, SignalDecision};
pub use evaluator::RuleEvaluator;
pub use trend::detect_trend;
