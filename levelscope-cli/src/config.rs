//! TOML run configuration for the analyze command.
//!
//! Every field is optional; command-line flags override file values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

/// Output rendering for analysis results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable report.
    Text,
    /// Pretty-printed JSON snapshot of the full analysis.
    Json,
}

/// `analyze` run configuration, e.g.:
///
/// ```toml
/// input = "session.csv"
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzeConfig {
    /// Path to the session CSV file.
    pub input: Option<PathBuf>,
    /// Output format; defaults to text.
    pub format: Option<OutputFormat>,
}

impl AnalyzeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }
}
