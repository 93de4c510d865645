//! Domain types for the decision pipeline

pub mod candle;
pub mod position;
pub mod side;
pub mod tick;

pub use candle::Candle;
pub use position::PositionState;
pub use side::OptionSide;
pub use tick::{RawTick, Tick, TickError};
