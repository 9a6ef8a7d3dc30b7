//! The four-stage analytics pipeline.
//!
//! Strictly linear data flow, re-evaluated in full on every run:
//! anchor bar → levels; (all bars, levels) → reactions; reactions →
//! patterns; (latest bar, levels, reactions, patterns) → signal. Every
//! stage is a pure function of its inputs — no I/O, no hidden state, no
//! randomness — so identical inputs always reproduce identical output.

pub mod levels;
pub mod patterns;
pub mod reactions;
pub mod signal;

pub use levels::{compute_levels, LevelError, LADDER_STEPS};
pub use patterns::detect_patterns;
pub use reactions::{classify_reactions, BREAK_CONFIRM, TOUCH_TOLERANCE};
pub use signal::{synthesize_signal, PROXIMITY, RECENT_WINDOW};
