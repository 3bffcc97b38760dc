//! CSV candle file adapter.
//!
//! Column layout: `timestamp,open,high,low,close,volume`. Timestamps
//! accept either `YYYY-MM-DDTHH:MM:SS` or a bare `YYYY-MM-DD` (midnight).

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::candle::Candle;
use crate::domain::error::TradelabError;
use crate::ports::data_port::DataPort;

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TradelabError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .map_err(|e| TradelabError::Data {
            reason: format!("invalid timestamp {value:?}: {e}"),
        })
}

fn parse_field(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, TradelabError> {
    let raw = record.get(index).ok_or_else(|| TradelabError::Data {
        reason: format!("missing {name} column"),
    })?;
    raw.parse().map_err(|e| TradelabError::Data {
        reason: format!("invalid {name} value {raw:?}: {e}"),
    })
}

impl DataPort for CsvAdapter {
    fn load_candles(&self) -> Result<Vec<Candle>, TradelabError> {
        let mut rdr = csv::Reader::from_path(&self.path).map_err(|e| TradelabError::Data {
            reason: format!("failed to open {}: {}", self.path.display(), e),
        })?;

        let mut candles = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TradelabError::Data {
                reason: format!("CSV parse error: {e}"),
            })?;

            let raw_timestamp = record.get(0).ok_or_else(|| TradelabError::Data {
                reason: "missing timestamp column".into(),
            })?;

            candles.push(Candle {
                timestamp: parse_timestamp(raw_timestamp)?,
                open: parse_field(&record, 1, "open")?,
                high: parse_field(&record, 2, "high")?,
                low: parse_field(&record, 3, "low")?,
                close: parse_field(&record, 4, "close")?,
                volume: parse_field(&record, 5, "volume")?,
            });
        }

        candles.sort_by_key(|c| c.timestamp);
        Ok(candles)
    }
}

/// Write a candle series with the same column layout `load_candles` reads.
pub fn write_candles(path: &Path, candles: &[Candle]) -> Result<(), TradelabError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| TradelabError::Data {
        reason: format!("failed to create {}: {}", path.display(), e),
    })?;

    wtr.write_record(["timestamp", "open", "high", "low", "close", "volume"])
        .map_err(|e| TradelabError::Data {
            reason: format!("CSV write error: {e}"),
        })?;

    for candle in candles {
        wtr.write_record([
            candle.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
            candle.open.to_string(),
            candle.high.to_string(),
            candle.low.to_string(),
            candle.close.to_string(),
            candle.volume.to_string(),
        ])
        .map_err(|e| TradelabError::Data {
            reason: format!("CSV write error: {e}"),
        })?;
    }

    wtr.flush().map_err(|e| TradelabError::Data {
        reason: format!("CSV write error: {e}"),
    })
}
