//! Strike selection boundary.
//!
//! Turning a direction and underlying price into a tradable option symbol
//! depends on the exchange's contract naming, so it lives outside the core.

use crate::domain::OptionSide;

/// Maps a signal to the option contract to buy.
pub trait StrikeSelector: Send + Sync {
    fn select(&self, direction: OptionSide, underlying_price: f64) -> String;
}

impl<F> StrikeSelector for F
where
    F: Fn(OptionSide, f64) -> String + Send + Sync,
{
    fn select(&self, direction: OptionSide, underlying_price: f64) -> String {
        self(direction, underlying_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_selectors() {
        let selector = |side: OptionSide, price: f64| format!("X{}{}", price as i64, side.suffix());
        assert_eq!(selector.select(OptionSide::Put, 100.0), "X100PE");
    }
}
