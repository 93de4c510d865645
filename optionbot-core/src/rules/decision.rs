//! Evaluation output: per-rule flags, tier counts, confidence and verdict.
//!
//! A `SignalDecision` is produced fresh by every evaluation and never mutated.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::OptionSide;

/// Confidence grade attached to a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    Strong,
    Normal,
    Weak,
    None,
}

impl Confidence {
    /// Grade an approved entry from its tier counts.
    pub fn grade(confirmation: usize, contextual: usize) -> Self {
        if confirmation >= 4 && contextual >= 2 {
            Confidence::Strong
        } else if confirmation >= 3 && contextual >= 1 {
            Confidence::Normal
        } else if confirmation >= 3 {
            Confidence::Weak
        } else {
            Confidence::None
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::Strong => "STRONG",
            Confidence::Normal => "NORMAL",
            Confidence::Weak => "WEAK",
            Confidence::None => "NONE",
        };
        f.write_str(s)
    }
}

/// Contextual tier flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFlags {
    pub trend_found: bool,
    pub time_ok: bool,
    pub rsi_ok: bool,
}

impl ContextFlags {
    pub fn count(&self) -> usize {
        [self.trend_found, self.time_ok, self.rsi_ok]
            .into_iter()
            .filter(|&f| f)
            .count()
    }
}

/// Confirmation tier flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationFlags {
    pub volume_spike: bool,
    pub oi_trend: bool,
    pub breakout_retest: bool,
    pub reversal_candle: bool,
    pub consolidation_breakout: bool,
}

impl ConfirmationFlags {
    pub fn count(&self) -> usize {
        [
            self.volume_spike,
            self.oi_trend,
            self.breakout_retest,
            self.reversal_candle,
            self.consolidation_breakout,
        ]
        .into_iter()
        .filter(|&f| f)
        .count()
    }
}

/// Both tiers' flags, for logging and inspection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFlags {
    pub contextual: ContextFlags,
    pub confirmation: ConfirmationFlags,
}

/// Verdict of one rule evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDecision {
    pub should_enter: bool,
    pub direction: Option<OptionSide>,
    pub confirmation_count: usize,
    pub contextual_count: usize,
    pub flags: RuleFlags,
    pub confidence: Confidence,
    pub reason: String,
}

impl SignalDecision {
    /// Negative decision carrying whatever flags were evaluated before the gate failed.
    pub(crate) fn rejected(direction: Option<OptionSide>, flags: RuleFlags, reason: String) -> Self {
        Self {
            should_enter: false,
            direction,
            confirmation_count: flags.confirmation.count(),
            contextual_count: flags.contextual.count(),
            flags,
            confidence: Confidence::None,
            reason,
        }
    }

    pub(crate) fn approved(direction: OptionSide, flags: RuleFlags) -> Self {
        let confirmation_count = flags.confirmation.count();
        let contextual_count = flags.contextual.count();
        let confidence = Confidence::grade(confirmation_count, contextual_count);
        Self {
            should_enter: true,
            direction: Some(direction),
            confirmation_count,
            contextual_count,
            flags,
            confidence,
            reason: format!(
                "entry allowed: confirmation={confirmation_count}, contextual={contextual_count}, \
                 direction={direction}, confidence={confidence}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_grading_table() {
        assert_eq!(Confidence::grade(5, 3), Confidence::Strong);
        assert_eq!(Confidence::grade(4, 2), Confidence::Strong);
        assert_eq!(Confidence::grade(4, 1), Confidence::Normal);
        assert_eq!(Confidence::grade(3, 3), Confidence::Normal);
        assert_eq!(Confidence::grade(3, 0), Confidence::Weak);
        assert_eq!(Confidence::grade(2, 3), Confidence::None);
    }

    #[test]
    fn flag_counts() {
        let flags = ConfirmationFlags {
            volume_spike: true,
            oi_trend: false,
            breakout_retest: true,
            reversal_candle: false,
            consolidation_breakout: true,
        };
        assert_eq!(flags.count(), 3);
        assert_eq!(
            ContextFlags {
                trend_found: true,
                time_ok: false,
                rsi_ok: true
            }
            .count(),
            2
        );
    }

    #[test]
    fn approved_decision_grades_itself() {
        let flags = RuleFlags {
            contextual: ContextFlags {
                trend_found: true,
                time_ok: true,
                rsi_ok: false,
            },
            confirmation: ConfirmationFlags {
                volume_spike: true,
                oi_trend: true,
                breakout_retest: true,
                reversal_candle: true,
                consolidation_breakout: false,
            },
        };
        let decision = SignalDecision::approved(OptionSide::Put, flags);
        assert!(decision.should_enter);
        assert_eq!(decision.confirmation_count, 4);
        assert_eq!(decision.contextual_count, 2);
        assert_eq!(decision.confidence, Confidence::Strong);
        assert!(decision.reason.contains("PUT"));
    }
}
