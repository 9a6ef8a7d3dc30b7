//! Level calculator — derives the eight-rung ladder from one anchor bar.
//!
//! Resistances expand geometrically above the anchor high, supports mirror
//! below the anchor low. Each rung's multiplier doubles the previous one and
//! compounds on the prior rung's price (including its margin), so the outer
//! rungs are reachable only by larger moves. No rounding is applied; callers
//! round for presentation only.

use thiserror::Error;

use crate::domain::{Bar, LevelName, LevelSet};

/// Per-rung expansion multipliers, innermost first. Each doubles the last.
pub const LADDER_STEPS: [f64; 4] = [0.0009, 0.0018, 0.0036, 0.0072];

/// Errors from level calculation.
///
/// Both variants halt the pipeline run: classification divides by level
/// prices, so a bad anchor must never reach it.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("anchor bar has non-positive range (high {high}, low {low})")]
    InvalidAnchor { high: f64, low: f64 },

    #[error("computed level {name} is degenerate ({price})")]
    DegenerateLevel { name: LevelName, price: f64 },
}

/// Compute the ladder for an anchor bar (conventionally the session's first).
///
/// `R1 = high + high*0.0009`, then each rung compounds the previous rung by
/// the next (doubled) step; supports mirror subtractively from the low.
pub fn compute_levels(anchor: &Bar) -> Result<LevelSet, LevelError> {
    if !(anchor.high > 0.0 && anchor.high.is_finite())
        || !(anchor.low > 0.0 && anchor.low.is_finite())
    {
        return Err(LevelError::InvalidAnchor {
            high: anchor.high,
            low: anchor.low,
        });
    }

    let mut resistance = [0.0; 4];
    let mut rung = anchor.high;
    for (slot, step) in resistance.iter_mut().zip(LADDER_STEPS) {
        rung += rung * step;
        *slot = rung;
    }

    let mut support = [0.0; 4];
    let mut rung = anchor.low;
    for (slot, step) in support.iter_mut().zip(LADDER_STEPS) {
        rung -= rung * step;
        *slot = rung;
    }

    let set = LevelSet::new(anchor.clone(), resistance, support);
    for level in set.iter() {
        if !(level.price > 0.0 && level.price.is_finite()) {
            return Err(LevelError::DegenerateLevel {
                name: level.name,
                price: level.price,
            });
        }
    }
    Ok(set)
}
