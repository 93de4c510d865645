//! Live decision engine — ties aggregation, rules and risk into a per-tick loop.
//!
//! The engine consumes validated ticks and emits order intents:
//!
//! 1. Aggregate: candle, open interest, underlying price
//! 2. Manage: trail the stop, exit on stop or target
//! 3. Enter: snapshot, rule evaluation, position open

pub mod intent;
pub mod pipeline;
pub mod strike;

pub use intent::OrderIntent;
pub use pipeline::{DecisionPipeline, PipelineStats};
pub use strike::StrikeSelector;
