//! Target-weight portfolio rebalancing.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::error::TradelabError;

/// Absolute currency threshold below which a delta is treated as noise.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceOrder {
    pub symbol: String,
    pub side: OrderSide,
    /// Currency amount to trade, always positive.
    pub amount: f64,
}

/// Compute the buy/sell amounts that move each position's value toward
/// `target_weight * portfolio_value`.
///
/// Considers the union of symbols across both maps: a missing weight
/// means target value 0, a missing position means current value 0.
/// Deltas within `tolerance` of zero produce no order. Output is sorted
/// by symbol. Target weights are not required to sum to 1.0; any
/// deviation simply shows up in the emitted orders.
pub fn rebalance_orders(
    current_positions: &BTreeMap<String, f64>,
    target_allocations: &BTreeMap<String, f64>,
    portfolio_value: f64,
    tolerance: f64,
) -> Result<Vec<RebalanceOrder>, TradelabError> {
    if !(portfolio_value > 0.0) {
        return Err(TradelabError::InvalidInput {
            reason: "portfolio_value must be positive".into(),
        });
    }
    for (symbol, weight) in target_allocations {
        if *weight < 0.0 {
            return Err(TradelabError::InvalidInput {
                reason: format!("negative target weight for {symbol}"),
            });
        }
    }

    let symbols: BTreeSet<&String> = current_positions
        .keys()
        .chain(target_allocations.keys())
        .collect();

    let mut orders = Vec::new();
    for symbol in symbols {
        let target_value =
            target_allocations.get(symbol).copied().unwrap_or(0.0) * portfolio_value;
        let current_value = current_positions.get(symbol).copied().unwrap_or(0.0);
        let delta = target_value - current_value;

        if delta > tolerance {
            orders.push(RebalanceOrder {
                symbol: symbol.clone(),
                side: OrderSide::Buy,
                amount: delta,
            });
        } else if delta < -tolerance {
            orders.push(RebalanceOrder {
                symbol: symbol.clone(),
                side: OrderSide::Sell,
                amount: -delta,
            });
        }
    }

    Ok(orders)
}
