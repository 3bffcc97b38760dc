//! Performance metrics over an equity curve and trade ledger.

use serde::{Deserialize, Serialize};

use super::error::TradelabError;
use super::simulator::{EquityPoint, Trade};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub count: usize,
    pub win_rate: f64,
    pub avg_return_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
    pub max_drawdown_pct: f64,
    pub trade_summary: TradeSummary,
}

impl PerformanceReport {
    pub fn compute(
        equity_curve: &[EquityPoint],
        trades: &[Trade],
    ) -> Result<Self, TradelabError> {
        if equity_curve.len() < 2 {
            return Err(TradelabError::InsufficientData {
                have: equity_curve.len(),
                need: 2,
            });
        }

        let first = &equity_curve[0];
        let last = &equity_curve[equity_curve.len() - 1];

        let total_return_pct = (last.equity - first.equity) / first.equity * 100.0;

        // Calendar-day annualization; spans under a day are floored to
        // one day (documented approximation for short series).
        let days = (last.timestamp - first.timestamp).num_days().max(1) as f64;
        let annualized_return_pct =
            ((1.0 + total_return_pct / 100.0).powf(365.0 / days) - 1.0) * 100.0;

        Ok(PerformanceReport {
            total_return_pct,
            annualized_return_pct,
            max_drawdown_pct: max_drawdown_pct(equity_curve),
            trade_summary: TradeSummary::from_trades(trades),
        })
    }
}

impl TradeSummary {
    pub fn from_trades(trades: &[Trade]) -> Self {
        if trades.is_empty() {
            return TradeSummary {
                count: 0,
                win_rate: 0.0,
                avg_return_pct: 0.0,
            };
        }

        let count = trades.len();
        let wins = trades.iter().filter(|t| t.pnl > 0.0).count();
        let avg_return_pct = trades.iter().map(|t| t.return_pct).sum::<f64>() / count as f64;

        TradeSummary {
            count,
            win_rate: wins as f64 / count as f64 * 100.0,
            avg_return_pct,
        }
    }
}

/// Maximum peak-to-trough decline over the curve, in percent, always ≥ 0.
fn max_drawdown_pct(equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak > 0.0 {
            let dd = (peak - point.equity) / peak * 100.0;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}
