//! Deterministic synthetic candle generation.
//!
//! Mimics a trending coin market: gentle uniform drift plus gaussian
//! shocks. Same seed, same series — generation is anchored to a fixed
//! epoch and a per-call seeded generator, never the wall clock or
//! process-wide random state.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use super::candle::Candle;
use super::error::TradelabError;

pub const DEFAULT_DAYS: usize = 120;
pub const DEFAULT_BASE_PRICE: f64 = 1_000_000.0;
pub const DEFAULT_DAILY_VOLATILITY: f64 = 0.035;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    pub days: usize,
    pub base_price: f64,
    pub daily_volatility: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        SyntheticConfig {
            days: DEFAULT_DAYS,
            base_price: DEFAULT_BASE_PRICE,
            daily_volatility: DEFAULT_DAILY_VOLATILITY,
            seed: 0,
        }
    }
}

impl SyntheticConfig {
    pub fn validate(&self) -> Result<(), TradelabError> {
        if self.days == 0 {
            return Err(TradelabError::Configuration {
                reason: "days must be positive".into(),
            });
        }
        if !(self.base_price > 0.0) {
            return Err(TradelabError::Configuration {
                reason: "base_price must be positive".into(),
            });
        }
        if !(self.daily_volatility >= 0.0) {
            return Err(TradelabError::Configuration {
                reason: "daily_volatility must be non-negative".into(),
            });
        }
        Ok(())
    }
}

/// First bar timestamp for every generated series.
fn series_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Generate a daily candle series from a seeded random walk.
pub fn generate_candles(config: &SyntheticConfig) -> Result<Vec<Candle>, TradelabError> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let start = series_start();
    let mut price = config.base_price;
    let mut candles = Vec::with_capacity(config.days);

    for day in 0..config.days {
        let drift = rng.gen_range(-0.01..0.018);
        let shock: f64 = rng.sample::<f64, _>(StandardNormal) * config.daily_volatility;
        price = (price * (1.0 + drift + shock)).max(1.0);

        let high = price * (1.0 + rng.gen_range(0.0..0.02));
        let low = price * (1.0 - rng.gen_range(0.0..0.02));
        let open = price * (1.0 - rng.gen_range(-0.01..0.01));
        let volume = rng.gen_range(50.0..250.0);

        candles.push(Candle {
            timestamp: start + Duration::days(day as i64),
            open,
            high,
            low,
            close: price,
            volume,
        });
    }

    Ok(candles)
}
