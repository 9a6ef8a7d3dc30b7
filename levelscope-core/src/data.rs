//! CSV bar ingest.
//!
//! Expected columns: `time,open,high,low,close[,volume]`. Timestamps are
//! accepted as RFC 3339, `YYYY-MM-DD HH:MM:SS`, bare dates, or unix epoch
//! seconds/milliseconds. Rows that fail the OHLC sanity check are skipped
//! with a warning rather than failing the load; structural problems
//! (unreadable file, missing columns, unparseable timestamps) are errors.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::Bar;

/// Columns every bar file must carry.
const REQUIRED_COLUMNS: [&str; 5] = ["time", "open", "high", "low", "close"];

/// Epoch values at or above this are taken as milliseconds.
const EPOCH_MILLIS_CUTOFF: i64 = 100_000_000_000;

/// Errors from bar ingest.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("csv read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("unparseable timestamp {value:?} at line {line}")]
    BadTimestamp { line: usize, value: String },

    #[error("no usable bars in {0}")]
    Empty(String),
}

#[derive(Debug, Deserialize)]
struct RawRow {
    time: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: Option<f64>,
}

/// Load a bar sequence from a CSV file, in file order.
///
/// Ordering is not enforced here — the session append boundary does that —
/// but insane rows (inverted ranges, non-positive prices, NaN) are dropped
/// with a `warn` so one bad print doesn't poison a whole session file.
pub fn load_bars_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>, IngestError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(IngestError::MissingColumn(required.to_string()));
        }
    }

    let mut bars = Vec::new();
    let mut skipped = 0usize;
    for (idx, row) in reader.deserialize::<RawRow>().enumerate() {
        // Header occupies line 1; data starts at line 2.
        let line = idx + 2;
        let row = row?;
        let Some(time) = parse_time(&row.time) else {
            return Err(IngestError::BadTimestamp {
                line,
                value: row.time,
            });
        };
        let bar = Bar {
            time,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        };
        if !bar.is_sane() {
            skipped += 1;
            log::warn!("skipping malformed bar at line {line} of {}", path.display());
            continue;
        }
        bars.push(bar);
    }

    if skipped > 0 {
        log::warn!("{skipped} malformed bars skipped from {}", path.display());
    }
    if bars.is_empty() {
        return Err(IngestError::Empty(path.display().to_string()));
    }
    Ok(bars)
}

fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    if let Ok(epoch) = raw.parse::<i64>() {
        return if epoch.abs() >= EPOCH_MILLIS_CUTOFF {
            Utc.timestamp_millis_opt(epoch).single()
        } else {
            Utc.timestamp_opt(epoch, 0).single()
        };
    }
    None
}
