//! Session — the caller-owned bar history and the pipeline entry point.
//!
//! The engine itself stores nothing between runs: the session's bar vector
//! is the only state, and `analyze` recomputes levels, reactions, patterns,
//! and the signal from the complete history each time. The session's first
//! bar anchors the level ladder; `reset` starts a fresh session so the next
//! bar re-anchors it.
//!
//! The session assumes a single writer. A concurrent host must serialize
//! `push_bar` and `analyze` so each run observes a consistent snapshot; the
//! engine performs no locking of its own.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{
    classify_reactions, compute_levels, detect_patterns, synthesize_signal, LevelError,
};
use crate::domain::{Bar, LevelSet, Pattern, Reaction, Signal};

/// Errors from the session append boundary.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("bar at {next} does not advance the session clock (last bar at {last})")]
    OutOfOrderBar {
        last: chrono::DateTime<chrono::Utc>,
        next: chrono::DateTime<chrono::Utc>,
    },
}

/// One pipeline run's complete output.
///
/// A read-only snapshot: each run's analysis fully replaces the previous
/// one, and consumers must not mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub levels: LevelSet,
    pub reactions: Vec<Reaction>,
    pub patterns: Vec<Pattern>,
    pub signal: Signal,
}

/// Caller-owned session state: the growing, strictly time-ordered bar
/// sequence for one trading session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    bars: Vec<Bar>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a session from an existing bar sequence, enforcing the same
    /// ordering rule as `push_bar`.
    pub fn with_bars(bars: Vec<Bar>) -> Result<Self, SessionError> {
        let mut session = Self::new();
        for bar in bars {
            session.push_bar(bar)?;
        }
        Ok(session)
    }

    /// Append a bar. The sequence must be strictly increasing in time;
    /// this is the single-writer append boundary.
    pub fn push_bar(&mut self, bar: Bar) -> Result<(), SessionError> {
        if let Some(last) = self.bars.last() {
            if bar.time <= last.time {
                return Err(SessionError::OutOfOrderBar {
                    last: last.time,
                    next: bar.time,
                });
            }
        }
        self.bars.push(bar);
        Ok(())
    }

    /// Drop all bars. The next pushed bar anchors a new level ladder.
    pub fn reset(&mut self) {
        self.bars.clear();
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// The session's first bar — the ladder anchor — if any.
    pub fn anchor(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Run the full pipeline over the current history.
    ///
    /// Returns `Ok(None)` while the session is empty (normal startup state).
    /// Level errors halt the run and propagate; they are never coerced into
    /// a neutral signal.
    pub fn analyze(&self) -> Result<Option<Analysis>, LevelError> {
        let (Some(anchor), Some(latest)) = (self.bars.first(), self.bars.last()) else {
            return Ok(None);
        };

        let levels = compute_levels(anchor)?;
        let reactions = classify_reactions(&self.bars, &levels);
        let patterns = detect_patterns(&reactions);
        let signal = synthesize_signal(latest, &levels, &reactions, &patterns);

        Ok(Some(Analysis {
            levels,
            reactions,
            patterns,
            signal,
        }))
    }
}
