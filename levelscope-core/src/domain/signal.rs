//! Signal — the single current trading recommendation with risk parameters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    Buy,
    Sell,
    Neutral,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// The synthesizer's output. Each pipeline run produces exactly one signal,
/// which fully replaces the previous one — no history is retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    /// Clamped to 0..=100 by every rule that sets it.
    pub confidence: f64,
    pub reason: String,
    /// Current close at synthesis time.
    pub entry: f64,
    /// Absent on a neutral signal.
    pub stop_loss: Option<f64>,
    /// Absent on a neutral signal.
    pub take_profit: Option<f64>,
    pub time: DateTime<Utc>,
}

impl Signal {
    /// The default result when no rule fires.
    pub fn neutral(entry: f64, time: DateTime<Utc>) -> Self {
        Self {
            kind: SignalKind::Neutral,
            confidence: 0.0,
            reason: "no clear signal".into(),
            entry,
            stop_loss: None,
            take_profit: None,
            time,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.kind != SignalKind::Neutral
    }
}
