//! Order intents — what the pipeline asks the order-placement side to do.
//!
//! Intents are emitted after the ledger has already recorded the change, so a
//! paper session needs nothing more. A live router turns them into broker
//! orders.

use serde::{Deserialize, Serialize};

use crate::domain::OptionSide;
use crate::risk::ExitReason;
use crate::rules::Confidence;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderIntent {
    /// Buy `quantity` of the selected option.
    Entry {
        direction: OptionSide,
        symbol: String,
        quantity: u32,
        price: f64,
        confidence: Confidence,
    },
    /// Sell the whole open position.
    Exit {
        symbol: String,
        quantity: u32,
        price: f64,
        reason: ExitReason,
        pnl: f64,
    },
}

impl OrderIntent {
    pub fn symbol(&self) -> &str {
        match self {
            OrderIntent::Entry { symbol, .. } | OrderIntent::Exit { symbol, .. } => symbol,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, OrderIntent::Entry { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kind_tag() {
        let intent = OrderIntent::Exit {
            symbol: "NIFTY22500CE".into(),
            quantity: 50,
            price: 140.0,
            reason: ExitReason::StopHit,
            pnl: 2_000.0,
        };
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["kind"], "exit");
        assert_eq!(json["reason"], "STOP_HIT");
        assert!(!intent.is_entry());
        assert_eq!(intent.symbol(), "NIFTY22500CE");
    }
}
