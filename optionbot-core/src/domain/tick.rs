//! Tick — a normalized market update, validated once at the transport boundary.
//!
//! Transports hand over a [`RawTick`] whose fields may be missing. Converting it
//! into a [`Tick`] is the only place malformed input is detected; everything
//! downstream works with fully-typed values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::side::OptionSide;

/// Reasons a transport payload cannot become a [`Tick`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TickError {
    #[error("tick has no price")]
    MissingPrice,
    #[error("tick has no exchange timestamp")]
    MissingTimestamp,
    #[error("tick price {0} is not a positive finite number")]
    InvalidPrice(f64),
    #[error("tick volume {0} is negative or not finite")]
    InvalidVolume(f64),
    #[error("tick underlying price {0} is not a positive finite number")]
    InvalidUnderlying(f64),
    #[error("tick open interest {0} is negative")]
    InvalidOpenInterest(i64),
}

/// Transport-shaped tick: every field optional, exactly as a feed may deliver it.
///
/// `side` is the transport's classification of which instrument the open
/// interest belongs to. The core has no symbol-to-side mapping of its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTick {
    #[serde(default, alias = "last_traded_price", alias = "ltp")]
    pub price: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default, alias = "oi")]
    pub open_interest: Option<i64>,
    #[serde(default)]
    pub side: Option<OptionSide>,
    #[serde(default)]
    pub underlying_price: Option<f64>,
    #[serde(default, alias = "exchange_timestamp")]
    pub timestamp: Option<i64>,
}

/// A validated market tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub price: f64,
    pub volume: f64,
    pub open_interest: Option<i64>,
    pub side: Option<OptionSide>,
    pub underlying_price: f64,
    /// Exchange timestamp, epoch seconds.
    pub timestamp: i64,
}

impl Tick {
    /// Build a tick carrying an OI sample for `side`.
    pub fn new(
        price: f64,
        volume: f64,
        open_interest: i64,
        side: OptionSide,
        underlying_price: f64,
        timestamp: i64,
    ) -> Result<Self, TickError> {
        Self::try_from(RawTick {
            price: Some(price),
            volume: Some(volume),
            open_interest: Some(open_interest),
            side: Some(side),
            underlying_price: Some(underlying_price),
            timestamp: Some(timestamp),
        })
    }

    /// OI sample with its side, when the transport classified one.
    pub fn oi_sample(&self) -> Option<(OptionSide, i64)> {
        match (self.side, self.open_interest) {
            (Some(side), Some(oi)) => Some((side, oi)),
            _ => None,
        }
    }
}

impl TryFrom<RawTick> for Tick {
    type Error = TickError;

    fn try_from(raw: RawTick) -> Result<Self, Self::Error> {
        let price = raw.price.ok_or(TickError::MissingPrice)?;
        if !price.is_finite() || price <= 0.0 {
            return Err(TickError::InvalidPrice(price));
        }
        let timestamp = raw.timestamp.ok_or(TickError::MissingTimestamp)?;

        let volume = raw.volume.unwrap_or(0.0);
        if !volume.is_finite() || volume < 0.0 {
            return Err(TickError::InvalidVolume(volume));
        }

        if let Some(oi) = raw.open_interest {
            if oi < 0 {
                return Err(TickError::InvalidOpenInterest(oi));
            }
        }

        // Single-instrument feeds carry no separate underlying quote.
        let underlying_price = raw.underlying_price.unwrap_or(price);
        if !underlying_price.is_finite() || underlying_price <= 0.0 {
            return Err(TickError::InvalidUnderlying(underlying_price));
        }

        Ok(Self {
            price,
            volume,
            open_interest: raw.open_interest,
            side: raw.side,
            underlying_price,
            timestamp,
        })
    }
}
