//! OHLCV candle representation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::error::TradelabError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Closing prices of a series, in order.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Check that a caller-supplied series is non-empty and strictly
/// ordered by timestamp (no duplicates).
pub fn validate_series(candles: &[Candle]) -> Result<(), TradelabError> {
    if candles.is_empty() {
        return Err(TradelabError::InvalidInput {
            reason: "price series must contain at least one candle".into(),
        });
    }
    for pair in candles.windows(2) {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(TradelabError::InvalidInput {
                reason: format!(
                    "price series timestamps must be strictly increasing ({} followed by {})",
                    pair[0].timestamp, pair[1].timestamp
                ),
            });
        }
    }
    Ok(())
}
