//! Configuration validation.
//!
//! Validates config fields before a run starts. Missing keys fall back
//! to the documented defaults and are valid; present keys must be sane.

use crate::domain::simulator::{DEFAULT_FEE_RATE, DEFAULT_INITIAL_CAPITAL};
use crate::domain::synthetic::{DEFAULT_BASE_PRICE, DEFAULT_DAILY_VOLATILITY, DEFAULT_DAYS};
use crate::domain::error::TradelabError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_FAST_PERIOD: usize = 12;
pub const DEFAULT_SLOW_PERIOD: usize = 26;

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    validate_periods(config)?;
    validate_initial_capital(config)?;
    validate_fee_rate(config)?;
    Ok(())
}

pub fn validate_synthetic_config(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    validate_days(config)?;
    validate_base_price(config)?;
    validate_volatility(config)?;
    Ok(())
}

fn validate_periods(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    let fast = config.get_int("simulation", "fast_period", DEFAULT_FAST_PERIOD as i64);
    let slow = config.get_int("simulation", "slow_period", DEFAULT_SLOW_PERIOD as i64);

    if fast < 1 {
        return Err(TradelabError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "fast_period".to_string(),
            reason: "fast_period must be at least 1".to_string(),
        });
    }
    if slow <= fast {
        return Err(TradelabError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "slow_period".to_string(),
            reason: "slow_period must be greater than fast_period".to_string(),
        });
    }
    Ok(())
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    let value = config.get_double("simulation", "initial_capital", DEFAULT_INITIAL_CAPITAL);
    if value <= 0.0 {
        return Err(TradelabError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_fee_rate(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    let value = config.get_double("simulation", "fee_rate", DEFAULT_FEE_RATE);
    if !(0.0..1.0).contains(&value) {
        return Err(TradelabError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "fee_rate".to_string(),
            reason: "fee_rate must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_days(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    let value = config.get_int("synthetic", "days", DEFAULT_DAYS as i64);
    if value < 1 {
        return Err(TradelabError::ConfigInvalid {
            section: "synthetic".to_string(),
            key: "days".to_string(),
            reason: "days must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_base_price(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    let value = config.get_double("synthetic", "base_price", DEFAULT_BASE_PRICE);
    if value <= 0.0 {
        return Err(TradelabError::ConfigInvalid {
            section: "synthetic".to_string(),
            key: "base_price".to_string(),
            reason: "base_price must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_volatility(config: &dyn ConfigPort) -> Result<(), TradelabError> {
    let value = config.get_double("synthetic", "daily_volatility", DEFAULT_DAILY_VOLATILITY);
    if value < 0.0 {
        return Err(TradelabError::ConfigInvalid {
            section: "synthetic".to_string(),
            key: "daily_volatility".to_string(),
            reason: "daily_volatility must be non-negative".to_string(),
        });
    }
    Ok(())
}
