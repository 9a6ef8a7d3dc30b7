//! Pattern — a named aggregate behavior mined from the reaction log.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::LevelName;

/// The recurring behaviors the detector knows how to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternKind {
    /// The same level held on two or more bounces.
    RepeatedBounce,
    /// A breakout immediately followed by a bounce at the same level.
    BreakoutRetest,
    /// Two or more resistance breakouts in the log.
    Uptrend,
    /// Two or more support breakouts in the log.
    Downtrend,
    /// Three or more rejections anywhere in the log.
    RejectionCluster,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RepeatedBounce => write!(f, "Repeated Bounces"),
            Self::BreakoutRetest => write!(f, "Breakout Retest"),
            Self::Uptrend => write!(f, "Uptrend"),
            Self::Downtrend => write!(f, "Downtrend"),
            Self::RejectionCluster => write!(f, "Rejection Cluster"),
        }
    }
}

/// One detected pattern.
///
/// `success_rate` is a fixed heuristic per pattern kind, not a measured
/// outcome; see the detector for the exact formulas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    pub kind: PatternKind,
    /// The level the pattern is anchored to, where the rule is per-level.
    pub level: Option<LevelName>,
    pub occurrences: usize,
    pub success_rate: f64,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_kind_display() {
        assert_eq!(PatternKind::RepeatedBounce.to_string(), "Repeated Bounces");
        assert_eq!(PatternKind::Uptrend.to_string(), "Uptrend");
    }

    #[test]
    fn pattern_serialization_roundtrip() {
        let pattern = Pattern {
            kind: PatternKind::RepeatedBounce,
            level: Some(LevelName::S1),
            occurrences: 3,
            success_rate: 90.0,
            description: "S1 held as support across 3 bounces".into(),
        };
        let json = serde_json::to_string(&pattern).unwrap();
        let deser: Pattern = serde_json::from_str(&json).unwrap();
        assert_eq!(deser.kind, PatternKind::RepeatedBounce);
        assert_eq!(deser.level, Some(LevelName::S1));
        assert_eq!(deser.occurrences, 3);
    }
}
