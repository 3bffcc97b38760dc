#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use tradelab::domain::candle::Candle;
use tradelab::domain::error::TradelabError;
use tradelab::ports::data_port::DataPort;

pub fn ts(day_offset: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + chrono::Duration::days(day_offset)
}

pub fn make_candle(day_offset: i64, close: f64) -> Candle {
    Candle {
        timestamp: ts(day_offset),
        open: close,
        high: close,
        low: close,
        close,
        volume: 100.0,
    }
}

pub fn make_candles(prices: &[f64]) -> Vec<Candle> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &close)| make_candle(i as i64, close))
        .collect()
}

/// Closes that rise linearly for `up` bars, then fall for `down` bars.
pub fn ramp_prices(up: usize, down: usize, start: f64, step: f64) -> Vec<f64> {
    let peak = start + step * up as f64;
    let mut prices: Vec<f64> = (0..up).map(|i| start + step * i as f64).collect();
    prices.extend((1..=down).map(|i| peak - step * i as f64));
    prices
}

pub struct MockDataPort {
    pub candles: Vec<Candle>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(candles: Vec<Candle>) -> Self {
        Self {
            candles,
            error: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            candles: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl DataPort for MockDataPort {
    fn load_candles(&self) -> Result<Vec<Candle>, TradelabError> {
        if let Some(reason) = &self.error {
            return Err(TradelabError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.candles.clone())
    }
}
