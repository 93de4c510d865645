//! ATM / OTM strike selection for index options.

use optionbot_core::domain::OptionSide;
use optionbot_core::StrikeSelector;

/// Rounds the underlying to the nearest strike and optionally shifts out of the money.
#[derive(Debug, Clone)]
pub struct AtmStrikeSelector {
    prefix: String,
    step: u32,
    otm_steps: u32,
}

impl AtmStrikeSelector {
    pub fn new(prefix: impl Into<String>, step: u32, otm_steps: u32) -> Self {
        Self {
            prefix: prefix.into(),
            step,
            otm_steps,
        }
    }

    pub fn atm(&self, underlying_price: f64) -> i64 {
        let step = f64::from(self.step.max(1));
        ((underlying_price / step).round() * step) as i64
    }

    pub fn strike(&self, direction: OptionSide, underlying_price: f64) -> i64 {
        let shift = i64::from(self.otm_steps) * i64::from(self.step);
        match direction {
            OptionSide::Call => self.atm(underlying_price) + shift,
            OptionSide::Put => self.atm(underlying_price) - shift,
        }
    }
}

impl StrikeSelector for AtmStrikeSelector {
    fn select(&self, direction: OptionSide, underlying_price: f64) -> String {
        format!(
            "{}{}{}",
            self.prefix,
            self.strike(direction, underlying_price),
            direction.suffix()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_nearest_step() {
        let s = AtmStrikeSelector::new("NIFTY", 50, 0);
        assert_eq!(s.atm(25_915.0), 25_900);
        assert_eq!(s.atm(25_926.0), 25_950);
        assert_eq!(s.select(OptionSide::Call, 25_915.0), "NIFTY25900CE");
        assert_eq!(s.select(OptionSide::Put, 25_926.0), "NIFTY25950PE");
    }

    #[test]
    fn otm_shift_moves_away_from_spot() {
        let s = AtmStrikeSelector::new("NIFTY", 50, 1);
        assert_eq!(s.select(OptionSide::Call, 25_915.0), "NIFTY25950CE");
        assert_eq!(s.select(OptionSide::Put, 25_915.0), "NIFTY25850PE");
    }
}
