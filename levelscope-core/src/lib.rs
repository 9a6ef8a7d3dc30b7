//! LevelScope Core — deterministic support/resistance analytics over bar data.
//!
//! The crate is a four-stage pipeline, each stage a pure function of the
//! previous stage's output:
//! - Level calculation: eight-rung ladder derived from one anchor bar
//! - Reaction classification: every bar/level touch tagged bounce,
//!   breakout, or rejection
//! - Pattern detection: recurring behaviors mined from the reaction log
//! - Signal synthesis: one directional recommendation with risk parameters
//!
//! `session::Session` owns the bar history and drives the pipeline;
//! `data` loads bar files from disk. There is no internal state, I/O, or
//! randomness anywhere in the pipeline: identical inputs reproduce
//! identical output byte for byte.

pub mod analysis;
pub mod data;
pub mod domain;
pub mod session;
