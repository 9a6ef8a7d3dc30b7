//! Reaction — the classified outcome of one bar touching one level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Level;

/// How a bar resolved its touch of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReactionKind {
    /// Price tested the level and held near it.
    Bounce,
    /// Price closed through the level with confirmation beyond it.
    Breakout,
    /// Price probed the level and closed away from it.
    Rejection,
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounce => write!(f, "bounce"),
            Self::Breakout => write!(f, "breakout"),
            Self::Rejection => write!(f, "rejection"),
        }
    }
}

/// One entry of the append-only reaction log.
///
/// A bar touching several levels produces one record per level, and several
/// bars touching the same level each produce their own record — the log is a
/// classification history, not a set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    /// Snapshot of the touched level (name, kind, price).
    pub level: Level,
    pub kind: ReactionKind,
    /// Distance of the close from the level, as a non-negative percent of the
    /// level price. Uncapped: a large breakout can exceed 100.
    pub strength: f64,
    pub time: DateTime<Utc>,
}
