//! Position risk: initial protective levels, trailing-stop ladder, daily caps.

pub mod config;
pub mod ladder;
pub mod ledger;

pub use config::{RiskConfig, TRAIL_STEP_OFFSET};
pub use ladder::{Ratchet, TrailingLadder};
pub use ledger::{ClosedTrade, ExitReason, LedgerError, RiskLedger, SessionSummary};
