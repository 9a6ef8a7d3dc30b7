//! Price levels — the eight-rung support/resistance ladder around an anchor bar.
//!
//! A `LevelSet` is computed once per session from the session's first bar and
//! never mutated; a new session (or an explicit reset) produces a fresh set.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Bar;

/// Which side of the anchor a level sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelKind {
    Resistance,
    Support,
}

impl fmt::Display for LevelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resistance => write!(f, "resistance"),
            Self::Support => write!(f, "support"),
        }
    }
}

/// Canonical name of one of the eight ladder rungs.
///
/// `ALL` lists the rungs in ladder order (R1..R4 then S1..S4). Everything
/// that aggregates per level iterates in this order so output ordering is
/// deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelName {
    R1,
    R2,
    R3,
    R4,
    S1,
    S2,
    S3,
    S4,
}

impl LevelName {
    pub const ALL: [LevelName; 8] = [
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::S1,
        Self::S2,
        Self::S3,
        Self::S4,
    ];

    pub fn kind(self) -> LevelKind {
        match self {
            Self::R1 | Self::R2 | Self::R3 | Self::R4 => LevelKind::Resistance,
            Self::S1 | Self::S2 | Self::S3 | Self::S4 => LevelKind::Support,
        }
    }

    /// Rung number within its side, 1-based (R3 -> 3, S2 -> 2).
    pub fn rung(self) -> usize {
        match self {
            Self::R1 | Self::S1 => 1,
            Self::R2 | Self::S2 => 2,
            Self::R3 | Self::S3 => 3,
            Self::R4 | Self::S4 => 4,
        }
    }
}

impl fmt::Display for LevelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::R1 => "R1",
            Self::R2 => "R2",
            Self::R3 => "R3",
            Self::R4 => "R4",
            Self::S1 => "S1",
            Self::S2 => "S2",
            Self::S3 => "S3",
            Self::S4 => "S4",
        };
        write!(f, "{s}")
    }
}

/// One priced rung of the ladder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Level {
    pub name: LevelName,
    pub kind: LevelKind,
    pub price: f64,
}

/// The full eight-level ladder plus the anchor bar it was derived from.
///
/// Immutable once built. Levels are stored in `LevelName::ALL` order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSet {
    anchor: Bar,
    levels: [Level; 8],
}

impl LevelSet {
    /// Assemble a set from ladder prices in rung order.
    ///
    /// Price validity is the calculator's responsibility; this constructor
    /// only pairs prices with their names.
    pub fn new(anchor: Bar, resistance: [f64; 4], support: [f64; 4]) -> Self {
        let [r1, r2, r3, r4] = resistance;
        let [s1, s2, s3, s4] = support;
        let rung = |name: LevelName, price: f64| Level {
            name,
            kind: name.kind(),
            price,
        };
        let levels = [
            rung(LevelName::R1, r1),
            rung(LevelName::R2, r2),
            rung(LevelName::R3, r3),
            rung(LevelName::R4, r4),
            rung(LevelName::S1, s1),
            rung(LevelName::S2, s2),
            rung(LevelName::S3, s3),
            rung(LevelName::S4, s4),
        ];
        Self { anchor, levels }
    }

    pub fn anchor(&self) -> &Bar {
        &self.anchor
    }

    /// All eight levels in ladder order (R1..R4, S1..S4).
    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    /// The four resistance levels, R1 (innermost) first.
    pub fn resistances(&self) -> &[Level] {
        &self.levels[..4]
    }

    /// The four support levels, S1 (innermost) first.
    pub fn supports(&self) -> &[Level] {
        &self.levels[4..]
    }

    pub fn get(&self, name: LevelName) -> &Level {
        &self.levels[Self::slot(name)]
    }

    /// Resistance level closest to `price` by absolute distance.
    pub fn nearest_resistance(&self, price: f64) -> &Level {
        Self::nearest(self.resistances(), price)
    }

    /// Support level closest to `price` by absolute distance.
    pub fn nearest_support(&self, price: f64) -> &Level {
        Self::nearest(self.supports(), price)
    }

    /// The next rung outward from a broken resistance (R2 for R1, ...).
    /// None for R4 — nothing sits above the outermost rung.
    pub fn next_resistance_above(&self, name: LevelName) -> Option<&Level> {
        match name {
            LevelName::R1 => Some(self.get(LevelName::R2)),
            LevelName::R2 => Some(self.get(LevelName::R3)),
            LevelName::R3 => Some(self.get(LevelName::R4)),
            _ => None,
        }
    }

    /// The next rung outward from a broken support (S2 for S1, ...).
    pub fn next_support_below(&self, name: LevelName) -> Option<&Level> {
        match name {
            LevelName::S1 => Some(self.get(LevelName::S2)),
            LevelName::S2 => Some(self.get(LevelName::S3)),
            LevelName::S3 => Some(self.get(LevelName::S4)),
            _ => None,
        }
    }

    fn slot(name: LevelName) -> usize {
        match name.kind() {
            LevelKind::Resistance => name.rung() - 1,
            LevelKind::Support => 3 + name.rung(),
        }
    }

    fn nearest<'a>(side: &'a [Level], price: f64) -> &'a Level {
        let mut best = &side[0];
        for level in &side[1..] {
            if (level.price - price).abs() < (best.price - price).abs() {
                best = level;
            }
        }
        best
    }
}
