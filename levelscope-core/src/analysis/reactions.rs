//! Reaction classifier — scans the bar sequence against the ladder and tags
//! every touch with a bounce / breakout / rejection verdict.
//!
//! A bar touches a level when its low/high range overlaps a ±0.05% band
//! around the level price. Classification is priority-ordered and asymmetric
//! between level sides; the check order is load-bearing because the branches
//! are not mutually exclusive — breakout is always tested first, then the
//! directional check, with the remaining case as the default.

use crate::domain::{Bar, Level, LevelKind, LevelSet, Reaction, ReactionKind};

/// Half-width of the touch band, as a fraction of the level price.
pub const TOUCH_TOLERANCE: f64 = 0.0005;

/// Confirmation margin beyond the level required to call a breakout.
pub const BREAK_CONFIRM: f64 = 0.001;

/// Classify every (bar, level) touch from bar index 1 onward.
///
/// The anchor bar itself is never scanned against the levels it spawned.
/// Fewer than 2 bars is a normal startup state and yields an empty log.
/// The log is ordered by bar sequence, with each bar's touches in ladder
/// order; nothing is deduplicated.
pub fn classify_reactions(bars: &[Bar], levels: &LevelSet) -> Vec<Reaction> {
    let mut reactions = Vec::new();
    if bars.len() < 2 {
        return reactions;
    }

    for bar in &bars[1..] {
        for level in levels.iter() {
            if touches(bar, level.price) {
                reactions.push(classify_touch(bar, level));
            }
        }
    }
    reactions
}

/// Range-overlap test against the ±0.05% band around `price`.
pub fn touches(bar: &Bar, price: f64) -> bool {
    bar.low <= price * (1.0 + TOUCH_TOLERANCE) && bar.high >= price * (1.0 - TOUCH_TOLERANCE)
}

fn classify_touch(bar: &Bar, level: &Level) -> Reaction {
    let price = level.price;
    let (kind, raw_strength) = match level.kind {
        LevelKind::Resistance => {
            if bar.close > price && bar.high > price * (1.0 + BREAK_CONFIRM) {
                (ReactionKind::Breakout, (bar.close - price) / price * 100.0)
            } else if bar.is_bearish() && bar.high >= price {
                (ReactionKind::Rejection, (price - bar.close) / price * 100.0)
            } else {
                (ReactionKind::Bounce, (bar.close - price) / price * 100.0)
            }
        }
        LevelKind::Support => {
            if bar.close < price && bar.low < price * (1.0 - BREAK_CONFIRM) {
                (ReactionKind::Breakout, (price - bar.close) / price * 100.0)
            } else if bar.is_bullish() && bar.low <= price {
                (ReactionKind::Bounce, (bar.close - price) / price * 100.0)
            } else {
                (ReactionKind::Rejection, (bar.close - price) / price * 100.0)
            }
        }
    };

    Reaction {
        level: *level,
        kind,
        // Stored as an absolute percent; sign carries no information once
        // the kind is known.
        strength: raw_strength.abs(),
        time: bar.time,
    }
}
