//! Dual-EMA crossover signal generation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::candle::{self, Candle};
use super::ema::ema;
use super::error::TradelabError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalDirection {
    EnterLong,
    ExitLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub timestamp: NaiveDateTime,
    pub direction: SignalDirection,
}

/// Lazy, finite iterator over crossover signals, in timestamp order.
///
/// Emits `EnterLong` when the fast EMA crosses from below-or-equal to
/// above the slow EMA while flat, and `ExitLong` on the reverse cross
/// while a position is open. Signals strictly alternate; no re-signaling
/// while already in the matching state.
#[derive(Debug)]
pub struct SignalGenerator {
    timestamps: Vec<NaiveDateTime>,
    fast: Vec<f64>,
    slow: Vec<f64>,
    index: usize,
    in_position: bool,
}

impl SignalGenerator {
    pub fn new(
        candles: &[Candle],
        fast_period: usize,
        slow_period: usize,
    ) -> Result<Self, TradelabError> {
        if fast_period == 0 {
            return Err(TradelabError::Configuration {
                reason: "fast_period must be at least 1".into(),
            });
        }
        if fast_period >= slow_period {
            return Err(TradelabError::Configuration {
                reason: format!(
                    "fast_period ({fast_period}) must be smaller than slow_period ({slow_period})"
                ),
            });
        }
        if slow_period > candles.len() {
            return Err(TradelabError::InsufficientData {
                have: candles.len(),
                need: slow_period,
            });
        }

        let closes = candle::closes(candles);
        Ok(SignalGenerator {
            timestamps: candles.iter().map(|c| c.timestamp).collect(),
            fast: ema(&closes, fast_period),
            slow: ema(&closes, slow_period),
            index: 1,
            in_position: false,
        })
    }
}

impl Iterator for SignalGenerator {
    type Item = Signal;

    fn next(&mut self) -> Option<Signal> {
        while self.index < self.timestamps.len() {
            let i = self.index;
            self.index += 1;

            let crossed_up = self.fast[i - 1] <= self.slow[i - 1] && self.fast[i] > self.slow[i];
            let crossed_down = self.fast[i - 1] >= self.slow[i - 1] && self.fast[i] < self.slow[i];

            if crossed_up && !self.in_position {
                self.in_position = true;
                return Some(Signal {
                    timestamp: self.timestamps[i],
                    direction: SignalDirection::EnterLong,
                });
            }
            if crossed_down && self.in_position {
                self.in_position = false;
                return Some(Signal {
                    timestamp: self.timestamps[i],
                    direction: SignalDirection::ExitLong,
                });
            }
        }
        None
    }
}
