//! Trade simulation: walks crossover signals against a candle series.
//!
//! Single-position, fully-invested model: an entry commits all available
//! cash (less the entry fee), an exit liquidates the whole position.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::candle::Candle;
use super::error::TradelabError;
use super::signal::{Signal, SignalDirection};

pub const DEFAULT_INITIAL_CAPITAL: f64 = 5_000_000.0;
pub const DEFAULT_FEE_RATE: f64 = 0.0005;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    pub initial_capital: f64,
    /// Fee as a fraction of notional, charged on each transaction side.
    pub fee_rate: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            fee_rate: DEFAULT_FEE_RATE,
        }
    }
}

impl SimulatorConfig {
    pub fn validate(&self) -> Result<(), TradelabError> {
        if !(self.initial_capital > 0.0) {
            return Err(TradelabError::Configuration {
                reason: "initial_capital must be positive".into(),
            });
        }
        if !(self.fee_rate >= 0.0) {
            return Err(TradelabError::Configuration {
                reason: "fee_rate must be non-negative".into(),
            });
        }
        Ok(())
    }
}

/// A completed round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_time: NaiveDateTime,
    pub exit_time: NaiveDateTime,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    pub pnl: f64,
    pub return_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub equity: f64,
}

#[derive(Debug, Clone, Copy)]
enum PositionState {
    Flat,
    Long {
        quantity: f64,
        entry_price: f64,
        entry_time: NaiveDateTime,
    },
}

/// Run the signal sequence against the candle series.
///
/// Equity is sampled once per candle after that candle's signal has been
/// applied: cash while flat, mark-to-market while long. A series ending
/// in a long position is force-closed at the final close. An entry
/// signal landing on the final candle is ignored; the round trip it
/// would open could never span two bars.
pub fn simulate<I>(
    candles: &[Candle],
    signals: I,
    config: &SimulatorConfig,
) -> Result<(Vec<Trade>, Vec<EquityPoint>), TradelabError>
where
    I: IntoIterator<Item = Signal>,
{
    config.validate()?;

    let mut signals = signals.into_iter().peekable();
    let mut cash = config.initial_capital;
    let mut state = PositionState::Flat;
    let mut trades = Vec::new();
    let mut equity_curve = Vec::with_capacity(candles.len());
    let last_index = candles.len().saturating_sub(1);

    for (i, candle) in candles.iter().enumerate() {
        let price = candle.close;

        while let Some(signal) = signals.next_if(|s| s.timestamp == candle.timestamp) {
            match signal.direction {
                SignalDirection::EnterLong => {
                    if matches!(state, PositionState::Flat) && i < last_index {
                        let quantity = cash * (1.0 - config.fee_rate) / price;
                        state = PositionState::Long {
                            quantity,
                            entry_price: price,
                            entry_time: candle.timestamp,
                        };
                        cash = 0.0;
                    }
                }
                SignalDirection::ExitLong => {
                    if let PositionState::Long {
                        quantity,
                        entry_price,
                        entry_time,
                    } = state
                    {
                        let trade = close_position(
                            quantity,
                            entry_price,
                            entry_time,
                            price,
                            candle.timestamp,
                            config.fee_rate,
                        );
                        cash = quantity * price * (1.0 - config.fee_rate);
                        trades.push(trade);
                        state = PositionState::Flat;
                    }
                }
            }
        }

        // End of series: no open position survives the run.
        if i == last_index {
            if let PositionState::Long {
                quantity,
                entry_price,
                entry_time,
            } = state
            {
                let trade = close_position(
                    quantity,
                    entry_price,
                    entry_time,
                    price,
                    candle.timestamp,
                    config.fee_rate,
                );
                cash = quantity * price * (1.0 - config.fee_rate);
                trades.push(trade);
                state = PositionState::Flat;
            }
        }

        let equity = match state {
            PositionState::Flat => cash,
            PositionState::Long { quantity, .. } => quantity * price,
        };
        equity_curve.push(EquityPoint {
            timestamp: candle.timestamp,
            equity,
        });
    }

    Ok((trades, equity_curve))
}

fn close_position(
    quantity: f64,
    entry_price: f64,
    entry_time: NaiveDateTime,
    exit_price: f64,
    exit_time: NaiveDateTime,
    fee_rate: f64,
) -> Trade {
    let proceeds = quantity * exit_price * (1.0 - fee_rate);
    let cost_basis = quantity * entry_price;
    let pnl = proceeds - cost_basis;
    let return_pct = if cost_basis > 0.0 {
        pnl / cost_basis * 100.0
    } else {
        0.0
    };

    Trade {
        entry_time,
        exit_time,
        entry_price,
        exit_price,
        quantity,
        pnl,
        return_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn make_candles(prices: &[f64]) -> Vec<Candle> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                timestamp: ts(i as u32 + 1),
                open: close,
                high: close,
                low: close,
                close,
                volume: 100.0,
            })
            .collect()
    }

    fn enter(day: u32) -> Signal {
        Signal {
            timestamp: ts(day),
            direction: SignalDirection::EnterLong,
        }
    }

    fn exit(day: u32) -> Signal {
        Signal {
            timestamp: ts(day),
            direction: SignalDirection::ExitLong,
        }
    }

    #[test]
    fn rejects_non_positive_capital() {
        let config = SimulatorConfig {
            initial_capital: 0.0,
            fee_rate: 0.0,
        };
        let err = simulate(&make_candles(&[100.0, 101.0]), vec![], &config).unwrap_err();
        assert!(matches!(err, TradelabError::Configuration { .. }));
    }

    #[test]
    fn rejects_negative_fee() {
        let config = SimulatorConfig {
            initial_capital: 1000.0,
            fee_rate: -0.01,
        };
        let err = simulate(&make_candles(&[100.0, 101.0]), vec![], &config).unwrap_err();
        assert!(matches!(err, TradelabError::Configuration { .. }));
    }

    #[test]
    fn no_signals_flat_curve() {
        let candles = make_candles(&[100.0, 110.0, 90.0, 120.0]);
        let config = SimulatorConfig {
            initial_capital: 10_000.0,
            fee_rate: 0.001,
        };
        let (trades, curve) = simulate(&candles, vec![], &config).unwrap();

        assert!(trades.is_empty());
        assert_eq!(curve.len(), 4);
        for point in &curve {
            assert!((point.equity - 10_000.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn round_trip_without_fees() {
        let candles = make_candles(&[100.0, 100.0, 120.0, 120.0]);
        let config = SimulatorConfig {
            initial_capital: 1_000.0,
            fee_rate: 0.0,
        };
        let signals = vec![enter(2), exit(3)];
        let (trades, curve) = simulate(&candles, signals, &config).unwrap();

        assert_eq!(trades.len(), 1);
        let trade = &trades[0];
        assert_eq!(trade.entry_time, ts(2));
        assert_eq!(trade.exit_time, ts(3));
        // 10 units bought at 100, sold at 120.
        assert!((trade.quantity - 10.0).abs() < 1e-9);
        assert!((trade.pnl - 200.0).abs() < 1e-9);
        assert!((trade.return_pct - 20.0).abs() < 1e-9);

        assert_eq!(curve.len(), 4);
        assert!((curve[0].equity - 1_000.0).abs() < 1e-9);
        assert!((curve[2].equity - 1_200.0).abs() < 1e-9);
        assert!((curve[3].equity - 1_200.0).abs() < 1e-9);
    }

    #[test]
    fn fees_charged_on_both_sides() {
        let candles = make_candles(&[100.0, 100.0, 100.0, 100.0]);
        let config = SimulatorConfig {
            initial_capital: 1_000.0,
            fee_rate: 0.01,
        };
        let signals = vec![enter(2), exit(3)];
        let (trades, curve) = simulate(&candles, signals, &config).unwrap();

        // Entry: quantity = 1000 * 0.99 / 100 = 9.9.
        // Exit: proceeds = 9.9 * 100 * 0.99 = 980.1.
        assert_eq!(trades.len(), 1);
        assert!((trades[0].quantity - 9.9).abs() < 1e-9);
        assert!((trades[0].pnl - (980.1 - 990.0)).abs() < 1e-9);
        assert!((curve[3].equity - 980.1).abs() < 1e-9);
    }

    #[test]
    fn entry_bar_marks_to_market_after_fee() {
        let candles = make_candles(&[100.0, 100.0, 100.0]);
        let config = SimulatorConfig {
            initial_capital: 1_000.0,
            fee_rate: 0.01,
        };
        let (_, curve) = simulate(&candles, vec![enter(2)], &config).unwrap();
        // Long on day 2: equity = 9.9 * 100 = 990, entry fee already gone.
        assert!((curve[1].equity - 990.0).abs() < 1e-9);
    }

    #[test]
    fn force_close_at_end_of_series() {
        let candles = make_candles(&[100.0, 100.0, 110.0, 130.0]);
        let config = SimulatorConfig {
            initial_capital: 1_000.0,
            fee_rate: 0.0,
        };
        let (trades, curve) = simulate(&candles, vec![enter(2)], &config).unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].exit_time, ts(4));
        assert!((trades[0].exit_price - 130.0).abs() < f64::EPSILON);
        assert!((curve[3].equity - 1_300.0).abs() < 1e-9);
    }

    #[test]
    fn entry_on_final_bar_is_ignored() {
        let candles = make_candles(&[100.0, 100.0, 100.0]);
        let config = SimulatorConfig::default();
        let (trades, curve) = simulate(&candles, vec![enter(3)], &config).unwrap();

        assert!(trades.is_empty());
        assert!((curve[2].equity - config.initial_capital).abs() < f64::EPSILON);
    }

    #[test]
    fn second_entry_while_long_is_ignored() {
        let candles = make_candles(&[100.0, 100.0, 100.0, 100.0, 100.0]);
        let config = SimulatorConfig {
            initial_capital: 1_000.0,
            fee_rate: 0.0,
        };
        let signals = vec![enter(2), enter(3), exit(4)];
        let (trades, _) = simulate(&candles, signals, &config).unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].entry_time, ts(2));
    }

    #[test]
    fn exit_while_flat_is_ignored() {
        let candles = make_candles(&[100.0, 100.0, 100.0]);
        let config = SimulatorConfig {
            initial_capital: 1_000.0,
            fee_rate: 0.0,
        };
        let (trades, curve) = simulate(&candles, vec![exit(2)], &config).unwrap();
        assert!(trades.is_empty());
        assert!((curve[2].equity - 1_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn proceeds_compound_into_next_trade() {
        let candles = make_candles(&[100.0, 100.0, 200.0, 200.0, 100.0, 100.0]);
        let config = SimulatorConfig {
            initial_capital: 1_000.0,
            fee_rate: 0.0,
        };
        let signals = vec![enter(2), exit(3), enter(4), exit(5)];
        let (trades, curve) = simulate(&candles, signals, &config).unwrap();

        assert_eq!(trades.len(), 2);
        // First trade doubles capital to 2000; second trade buys 10 units
        // at 200 and halves it back to 1000.
        assert!((trades[1].quantity - 10.0).abs() < 1e-9);
        assert!((curve[5].equity - 1_000.0).abs() < 1e-9);
    }

    #[test]
    fn equity_curve_always_matches_series_length() {
        let candles = make_candles(&[100.0, 105.0, 95.0, 102.0, 99.0]);
        let (_, curve) = simulate(&candles, vec![], &SimulatorConfig::default()).unwrap();
        assert_eq!(curve.len(), candles.len());
        assert!((curve[0].equity - DEFAULT_INITIAL_CAPITAL).abs() < f64::EPSILON);
    }
}
