//! Typed request/response surface.
//!
//! The serving layer (HTTP, scheduler, whatever hosts this crate) talks
//! to the engine exclusively through these structs and the three entry
//! functions. Each call reads only its own inputs; nothing here keeps
//! state between invocations, so concurrent callers need no locking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::candle::{self, Candle};
use crate::domain::config_validation::{DEFAULT_FAST_PERIOD, DEFAULT_SLOW_PERIOD};
use crate::domain::error::TradelabError;
use crate::domain::metrics::{PerformanceReport, TradeSummary};
use crate::domain::rebalance::{self, RebalanceOrder};
use crate::domain::signal::SignalGenerator;
use crate::domain::simulator::{
    self, DEFAULT_FEE_RATE, DEFAULT_INITIAL_CAPITAL, EquityPoint, SimulatorConfig, Trade,
};
use crate::domain::synthetic::{self, DEFAULT_DAYS, SyntheticConfig};

// Schema bounds on the request fields, tighter than what the engine
// itself requires.
const MIN_FAST_PERIOD: usize = 2;
const MAX_FAST_PERIOD: usize = 60;
const MIN_SLOW_PERIOD: usize = 3;
const MAX_SLOW_PERIOD: usize = 200;
const MAX_FEE_RATE: f64 = 0.01;

fn default_fast_period() -> usize {
    DEFAULT_FAST_PERIOD
}

fn default_slow_period() -> usize {
    DEFAULT_SLOW_PERIOD
}

fn default_initial_capital() -> f64 {
    DEFAULT_INITIAL_CAPITAL
}

fn default_fee_rate() -> f64 {
    DEFAULT_FEE_RATE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    #[serde(default = "default_fast_period")]
    pub fast_period: usize,
    #[serde(default = "default_slow_period")]
    pub slow_period: usize,
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
    #[serde(default = "default_fee_rate")]
    pub fee_rate: f64,
    /// Seed for reproducible synthetic data when no prices are supplied.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub prices: Option<Vec<Candle>>,
}

impl Default for SimulationRequest {
    fn default() -> Self {
        SimulationRequest {
            fast_period: DEFAULT_FAST_PERIOD,
            slow_period: DEFAULT_SLOW_PERIOD,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            fee_rate: DEFAULT_FEE_RATE,
            seed: None,
            prices: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
    pub max_drawdown_pct: f64,
    pub trade_summary: TradeSummary,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceRequest {
    pub current_positions: BTreeMap<String, f64>,
    pub target_allocations: BTreeMap<String, f64>,
    pub portfolio_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceResponse {
    pub orders: Vec<RebalanceOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticRequest {
    pub seed: u64,
    #[serde(default)]
    pub length: Option<usize>,
}

fn validate_simulation_request(request: &SimulationRequest) -> Result<(), TradelabError> {
    if !(MIN_FAST_PERIOD..=MAX_FAST_PERIOD).contains(&request.fast_period) {
        return Err(TradelabError::InvalidInput {
            reason: format!(
                "fast_period must be between {MIN_FAST_PERIOD} and {MAX_FAST_PERIOD}"
            ),
        });
    }
    if !(MIN_SLOW_PERIOD..=MAX_SLOW_PERIOD).contains(&request.slow_period) {
        return Err(TradelabError::InvalidInput {
            reason: format!(
                "slow_period must be between {MIN_SLOW_PERIOD} and {MAX_SLOW_PERIOD}"
            ),
        });
    }
    if request.fee_rate > MAX_FEE_RATE {
        return Err(TradelabError::InvalidInput {
            reason: format!("fee_rate must not exceed {MAX_FEE_RATE}"),
        });
    }
    Ok(())
}

/// Run one full simulation: signals, trades, equity curve, report.
pub fn simulate(request: &SimulationRequest) -> Result<SimulationResponse, TradelabError> {
    validate_simulation_request(request)?;

    let candles = match &request.prices {
        Some(prices) => {
            candle::validate_series(prices)?;
            prices.clone()
        }
        None => synthetic::generate_candles(&SyntheticConfig {
            seed: request.seed.unwrap_or(0),
            ..SyntheticConfig::default()
        })?,
    };

    let signals = SignalGenerator::new(&candles, request.fast_period, request.slow_period)?;
    let config = SimulatorConfig {
        initial_capital: request.initial_capital,
        fee_rate: request.fee_rate,
    };
    let (trades, equity_curve) = simulator::simulate(&candles, signals, &config)?;
    let report = PerformanceReport::compute(&equity_curve, &trades)?;

    Ok(SimulationResponse {
        total_return_pct: report.total_return_pct,
        annualized_return_pct: report.annualized_return_pct,
        max_drawdown_pct: report.max_drawdown_pct,
        trade_summary: report.trade_summary,
        trades,
        equity_curve,
    })
}

/// Compute rebalance orders for the given holdings and target weights.
pub fn rebalance(request: &RebalanceRequest) -> Result<RebalanceResponse, TradelabError> {
    let orders = rebalance::rebalance_orders(
        &request.current_positions,
        &request.target_allocations,
        request.portfolio_value,
        rebalance::DEFAULT_TOLERANCE,
    )?;
    Ok(RebalanceResponse { orders })
}

/// Generate a deterministic synthetic candle series.
pub fn synthetic_prices(request: &SyntheticRequest) -> Result<Vec<Candle>, TradelabError> {
    synthetic::generate_candles(&SyntheticConfig {
        seed: request.seed,
        days: request.length.unwrap_or(DEFAULT_DAYS),
        ..SyntheticConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_parses_from_empty_json() {
        let request: SimulationRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.fast_period, 12);
        assert_eq!(request.slow_period, 26);
        assert_eq!(request.initial_capital, 5_000_000.0);
        assert_eq!(request.fee_rate, 0.0005);
        assert!(request.seed.is_none());
        assert!(request.prices.is_none());
    }

    #[test]
    fn simulate_with_seed_is_deterministic() {
        let request = SimulationRequest {
            seed: Some(42),
            ..SimulationRequest::default()
        };
        let a = simulate(&request).unwrap();
        let b = simulate(&request).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.equity_curve.len(), DEFAULT_DAYS);
        assert_eq!(a.equity_curve[0].equity, DEFAULT_INITIAL_CAPITAL);
    }

    #[test]
    fn simulate_rejects_out_of_range_periods() {
        let request = SimulationRequest {
            fast_period: 1,
            ..SimulationRequest::default()
        };
        assert!(matches!(
            simulate(&request).unwrap_err(),
            TradelabError::InvalidInput { .. }
        ));

        let request = SimulationRequest {
            slow_period: 500,
            ..SimulationRequest::default()
        };
        assert!(matches!(
            simulate(&request).unwrap_err(),
            TradelabError::InvalidInput { .. }
        ));
    }

    #[test]
    fn simulate_rejects_inverted_periods() {
        let request = SimulationRequest {
            fast_period: 26,
            slow_period: 12,
            ..SimulationRequest::default()
        };
        assert!(matches!(
            simulate(&request).unwrap_err(),
            TradelabError::Configuration { .. }
        ));
    }

    #[test]
    fn simulate_rejects_excessive_fee() {
        let request = SimulationRequest {
            fee_rate: 0.05,
            ..SimulationRequest::default()
        };
        assert!(matches!(
            simulate(&request).unwrap_err(),
            TradelabError::InvalidInput { .. }
        ));
    }

    #[test]
    fn simulate_rejects_unsorted_supplied_prices() {
        let mut prices = synthetic_prices(&SyntheticRequest {
            seed: 1,
            length: Some(40),
        })
        .unwrap();
        prices.swap(0, 1);

        let request = SimulationRequest {
            prices: Some(prices),
            ..SimulationRequest::default()
        };
        assert!(matches!(
            simulate(&request).unwrap_err(),
            TradelabError::InvalidInput { .. }
        ));
    }

    #[test]
    fn rebalance_round_trip() {
        let json = r#"{
            "current_positions": {"BTC": 500000},
            "target_allocations": {"BTC": 0.5, "ETH": 0.5},
            "portfolio_value": 1000000
        }"#;
        let request: RebalanceRequest = serde_json::from_str(json).unwrap();
        let response = rebalance(&request).unwrap();

        assert_eq!(response.orders.len(), 1);
        assert_eq!(response.orders[0].symbol, "ETH");

        let serialized = serde_json::to_string(&response).unwrap();
        assert!(serialized.contains("\"side\":\"buy\""));
    }

    #[test]
    fn synthetic_prices_honors_length() {
        let candles = synthetic_prices(&SyntheticRequest {
            seed: 9,
            length: Some(15),
        })
        .unwrap();
        assert_eq!(candles.len(), 15);
    }
}
