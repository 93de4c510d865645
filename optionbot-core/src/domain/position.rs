//! Open position state: entry, protective levels and lifecycle flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::side::OptionSide;

/// The single open option position.
///
/// Only the risk ledger constructs or mutates a `PositionState`; everything else
/// sees it through shared references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionState {
    symbol: String,
    direction: OptionSide,
    entry_price: f64,
    quantity: u32,
    stop_loss: f64,
    target: f64,
    opened_at: DateTime<Utc>,
    is_open: bool,
}

impl PositionState {
    pub(crate) fn open(
        symbol: String,
        direction: OptionSide,
        entry_price: f64,
        quantity: u32,
        stop_loss: f64,
        target: f64,
    ) -> Self {
        Self {
            symbol,
            direction,
            entry_price,
            quantity,
            stop_loss,
            target,
            opened_at: Utc::now(),
            is_open: true,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn direction(&self) -> OptionSide {
        self.direction
    }

    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn stop_loss(&self) -> f64 {
        self.stop_loss
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Per-unit profit at `price` (option buying: always price − entry).
    pub fn unrealized_points(&self, price: f64) -> f64 {
        price - self.entry_price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.unrealized_points(price) * f64::from(self.quantity)
    }

    pub(crate) fn set_stop_loss(&mut self, stop_loss: f64) {
        self.stop_loss = stop_loss;
    }

    pub(crate) fn mark_closed(&mut self) {
        self.is_open = false;
    }
}
