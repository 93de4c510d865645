//! Risk ledger — owner of the single open position and the day's realized PnL.
//!
//! Lifecycle is `Flat -> Open -> Flat`. Opening while open and closing while
//! flat are caller bugs and come back as [`LedgerError`]; a stop or target
//! being hit is a normal outcome reported by [`RiskLedger::check_exit`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::info;

use super::config::RiskConfig;
use super::ladder::{Ratchet, TrailingLadder};
use crate::config::ConfigError;
use crate::domain::{OptionSide, PositionState};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("a position in {symbol} is already open")]
    PositionAlreadyOpen { symbol: String },
    #[error("no open position")]
    NoOpenPosition,
    #[error("invalid order: {0}")]
    InvalidOrder(String),
}

/// Why an open position should be exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitReason {
    StopHit,
    TargetHit,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StopHit => f.write_str("STOP_HIT"),
            ExitReason::TargetHit => f.write_str("TARGET_HIT"),
        }
    }
}

/// A finished round trip, kept for the process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub position: PositionState,
    pub exit_price: f64,
    pub pnl: f64,
    pub closed_at: DateTime<Utc>,
}

/// End-of-session view of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub realized_pnl: f64,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub open_position: Option<PositionState>,
    pub entries_blocked: bool,
}

#[derive(Debug, Clone)]
pub struct RiskLedger {
    config: RiskConfig,
    ladder: TrailingLadder,
    position: Option<PositionState>,
    daily_realized: f64,
    /// Latched once either daily cap is reached.
    halted: bool,
    /// Every trade closed this process; kept in memory only and never pruned.
    journal: Vec<ClosedTrade>,
}

impl RiskLedger {
    pub fn new(config: RiskConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            ladder: TrailingLadder::new(config.trail_steps.clone()),
            config,
            position: None,
            daily_realized: 0.0,
            halted: false,
            journal: Vec::new(),
        })
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Flat and inside both daily caps.
    pub fn can_open(&self) -> bool {
        self.position.is_none() && !self.daily_cap_reached()
    }

    /// Realized loss or profit has reached its cap; stays true for the session.
    pub fn daily_cap_reached(&self) -> bool {
        self.halted
    }

    /// Open a position with the initial stop and target. Daily caps are the
    /// caller's gate ([`can_open`](Self::can_open)); only invariants are checked here.
    pub fn open(
        &mut self,
        symbol: impl Into<String>,
        direction: OptionSide,
        entry_price: f64,
        quantity: u32,
    ) -> Result<&PositionState, LedgerError> {
        if let Some(pos) = &self.position {
            return Err(LedgerError::PositionAlreadyOpen {
                symbol: pos.symbol().to_string(),
            });
        }
        if !entry_price.is_finite() || entry_price <= 0.0 {
            return Err(LedgerError::InvalidOrder(format!("entry price {entry_price}")));
        }
        if quantity == 0 {
            return Err(LedgerError::InvalidOrder("quantity must be at least 1".to_string()));
        }

        let stop_loss = entry_price - self.config.base_sl_points;
        let target = entry_price + self.config.initial_target_points;
        let position = PositionState::open(symbol.into(), direction, entry_price, quantity, stop_loss, target);
        info!(
            symbol = position.symbol(),
            %direction,
            entry_price,
            quantity,
            stop_loss,
            target,
            "position opened"
        );
        Ok(&*self.position.insert(position))
    }

    /// Ratchet the stop up the ladder at `price`. No-op when flat.
    pub fn advance_trailing_stop(&mut self, price: f64) {
        let Some(pos) = self.position.as_mut() else {
            return;
        };
        let mut stop = Ratchet::new(pos.stop_loss());
        if let Some(new_stop) = self.ladder.advance(pos.entry_price(), price, &mut stop) {
            info!(symbol = pos.symbol(), price, stop_loss = new_stop, "trailing stop raised");
            pos.set_stop_loss(new_stop);
        }
    }

    /// Stop is checked before target.
    pub fn check_exit(&self, price: f64) -> Option<ExitReason> {
        let pos = self.position.as_ref()?;
        if price <= pos.stop_loss() {
            Some(ExitReason::StopHit)
        } else if price >= pos.target() {
            Some(ExitReason::TargetHit)
        } else {
            None
        }
    }

    /// Close at `exit_price`, book the PnL and return it.
    pub fn close(&mut self, exit_price: f64) -> Result<f64, LedgerError> {
        if !exit_price.is_finite() {
            return Err(LedgerError::InvalidOrder(format!("exit price {exit_price}")));
        }
        let mut position = self.position.take().ok_or(LedgerError::NoOpenPosition)?;
        let pnl = position.unrealized_pnl(exit_price);
        self.daily_realized += pnl;
        position.mark_closed();

        info!(
            symbol = position.symbol(),
            exit_price,
            pnl,
            daily_realized = self.daily_realized,
            "position closed"
        );
        let cap_hit = self.daily_realized <= -self.config.max_daily_loss
            || self.daily_realized >= self.config.max_daily_profit;
        if cap_hit && !self.halted {
            self.halted = true;
            info!(daily_realized = self.daily_realized, "daily cap reached, no new entries this session");
        }

        self.journal.push(ClosedTrade {
            position,
            exit_price,
            pnl,
            closed_at: Utc::now(),
        });
        Ok(pnl)
    }

    pub fn position(&self) -> Option<&PositionState> {
        self.position.as_ref()
    }

    pub fn daily_realized(&self) -> f64 {
        self.daily_realized
    }

    pub fn journal(&self) -> &[ClosedTrade] {
        &self.journal
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            realized_pnl: self.daily_realized,
            trades: self.journal.len(),
            wins: self.journal.iter().filter(|t| t.pnl > 0.0).count(),
            losses: self.journal.iter().filter(|t| t.pnl < 0.0).count(),
            open_position: self.position.clone(),
            entries_blocked: self.daily_cap_reached(),
        }
    }
}
