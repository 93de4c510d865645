//! Option side — which instrument a signal, position, or OI sample belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional option type.
///
/// `Call` profits from a rising underlying, `Put` from a falling one. The
/// exchange suffixes (`CE`/`PE`) are accepted as aliases when deserializing
/// transport payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionSide {
    #[serde(alias = "CE")]
    Call,
    #[serde(alias = "PE")]
    Put,
}

impl OptionSide {
    /// Exchange suffix used in option trading symbols.
    pub fn suffix(self) -> &'static str {
        match self {
            OptionSide::Call => "CE",
            OptionSide::Put => "PE",
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSide::Call => write!(f, "CALL"),
            OptionSide::Put => write!(f, "PUT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exchange_aliases() {
        let ce: OptionSide = serde_json::from_str("\"CE\"").unwrap();
        let pe: OptionSide = serde_json::from_str("\"PE\"").unwrap();
        let call: OptionSide = serde_json::from_str("\"CALL\"").unwrap();
        assert_eq!(ce, OptionSide::Call);
        assert_eq!(pe, OptionSide::Put);
        assert_eq!(call, OptionSide::Call);
    }

    #[test]
    fn suffix_matches_exchange_convention() {
        assert_eq!(OptionSide::Call.suffix(), "CE");
        assert_eq!(OptionSide::Put.suffix(), "PE");
    }
}
