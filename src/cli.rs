//! CLI definition and dispatch.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::adapters::csv_adapter::{self, CsvAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::contract::{self, RebalanceRequest, SimulationRequest};
use crate::domain::config_validation::{
    DEFAULT_FAST_PERIOD, DEFAULT_SLOW_PERIOD, validate_simulation_config,
    validate_synthetic_config,
};
use crate::domain::error::TradelabError;
use crate::domain::simulator::{DEFAULT_FEE_RATE, DEFAULT_INITIAL_CAPITAL};
use crate::domain::synthetic::{
    self, DEFAULT_BASE_PRICE, DEFAULT_DAILY_VOLATILITY, DEFAULT_DAYS, SyntheticConfig,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tradelab", about = "Strategy simulation and rebalancing lab")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an EMA-crossover simulation
    Simulate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// CSV candle file; omitted means a synthetic series
        #[arg(long)]
        prices: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        /// Write the full JSON report here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compute rebalance orders from a JSON request file
    Rebalance {
        #[arg(short, long)]
        request: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate a synthetic candle series as CSV
    Generate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        days: Option<usize>,
        #[arg(short, long)]
        output: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            prices,
            seed,
            output,
        } => run_simulate(config.as_ref(), prices.as_ref(), seed, output.as_ref()),
        Command::Rebalance { request, output } => run_rebalance(&request, output.as_ref()),
        Command::Generate {
            config,
            seed,
            days,
            output,
        } => run_generate(config.as_ref(), seed, days, &output),
    }
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Build a simulation request from the `[simulation]` config section,
/// falling back to the documented defaults for missing keys.
pub fn build_simulation_request(adapter: &dyn ConfigPort) -> SimulationRequest {
    SimulationRequest {
        fast_period: adapter.get_int("simulation", "fast_period", DEFAULT_FAST_PERIOD as i64)
            as usize,
        slow_period: adapter.get_int("simulation", "slow_period", DEFAULT_SLOW_PERIOD as i64)
            as usize,
        initial_capital: adapter.get_double("simulation", "initial_capital", DEFAULT_INITIAL_CAPITAL),
        fee_rate: adapter.get_double("simulation", "fee_rate", DEFAULT_FEE_RATE),
        seed: None,
        prices: None,
    }
}

/// Build a synthetic generator config from the `[synthetic]` section.
pub fn build_synthetic_config(adapter: &dyn ConfigPort) -> SyntheticConfig {
    SyntheticConfig {
        days: adapter.get_int("synthetic", "days", DEFAULT_DAYS as i64) as usize,
        base_price: adapter.get_double("synthetic", "base_price", DEFAULT_BASE_PRICE),
        daily_volatility: adapter.get_double(
            "synthetic",
            "daily_volatility",
            DEFAULT_DAILY_VOLATILITY,
        ),
        seed: adapter.get_int("synthetic", "seed", 0) as u64,
    }
}

fn run_simulate(
    config_path: Option<&PathBuf>,
    prices_path: Option<&PathBuf>,
    seed: Option<u64>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    let mut request = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            let adapter = match load_config(path) {
                Ok(a) => a,
                Err(code) => return code,
            };
            if let Err(e) = validate_simulation_config(&adapter) {
                eprintln!("error: {e}");
                return (&e).into();
            }
            build_simulation_request(&adapter)
        }
        None => SimulationRequest::default(),
    };
    request.seed = seed;

    if let Some(path) = prices_path {
        eprintln!("Loading candles from {}", path.display());
        match CsvAdapter::new(path.clone()).load_candles() {
            Ok(candles) => {
                eprintln!("  {} candles loaded", candles.len());
                request.prices = Some(candles);
            }
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    eprintln!(
        "Running simulation: EMA {}/{} crossover",
        request.fast_period, request.slow_period
    );

    let response = match contract::simulate(&request) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\n=== Simulation Results ===");
    eprintln!("Total Return:     {:.2}%", response.total_return_pct);
    eprintln!("Annualized:       {:.2}%", response.annualized_return_pct);
    eprintln!("Max Drawdown:     -{:.1}%", response.max_drawdown_pct);
    eprintln!("Total Trades:     {}", response.trade_summary.count);
    eprintln!("Win Rate:         {:.1}%", response.trade_summary.win_rate);
    eprintln!("Avg Trade Return: {:.2}%", response.trade_summary.avg_return_pct);

    match output_path {
        Some(path) => match JsonReportAdapter.write(&response, path) {
            Ok(()) => {
                eprintln!("\nReport written to: {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to write report: {e}");
                (&e).into()
            }
        },
        None => match serde_json::to_string_pretty(&response) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to serialize report: {e}");
                ExitCode::from(1)
            }
        },
    }
}

fn run_rebalance(request_path: &PathBuf, output_path: Option<&PathBuf>) -> ExitCode {
    eprintln!("Loading rebalance request from {}", request_path.display());
    let content = match fs::read_to_string(request_path) {
        Ok(c) => c,
        Err(e) => {
            let err = TradelabError::Io(e);
            eprintln!("error: {err}");
            return (&err).into();
        }
    };

    let request: RebalanceRequest = match serde_json::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let err = TradelabError::InvalidInput {
                reason: format!("malformed rebalance request: {e}"),
            };
            eprintln!("error: {err}");
            return (&err).into();
        }
    };

    let response = match contract::rebalance(&request) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if response.orders.is_empty() {
        eprintln!("Portfolio already balanced; no orders needed");
    } else {
        eprintln!("\n=== Rebalance Orders ===");
        for order in &response.orders {
            eprintln!("  {:?} {}: {:.2}", order.side, order.symbol, order.amount);
        }
    }

    let json = match serde_json::to_string_pretty(&response) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("error: failed to serialize orders: {e}");
            return ExitCode::from(1);
        }
    };

    match output_path {
        Some(path) => match fs::write(path, json) {
            Ok(()) => {
                eprintln!("Orders written to: {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to write orders: {e}");
                ExitCode::from(1)
            }
        },
        None => {
            println!("{json}");
            ExitCode::SUCCESS
        }
    }
}

fn run_generate(
    config_path: Option<&PathBuf>,
    seed: Option<u64>,
    days: Option<usize>,
    output_path: &PathBuf,
) -> ExitCode {
    let mut config = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            let adapter = match load_config(path) {
                Ok(a) => a,
                Err(code) => return code,
            };
            if let Err(e) = validate_synthetic_config(&adapter) {
                eprintln!("error: {e}");
                return (&e).into();
            }
            build_synthetic_config(&adapter)
        }
        None => SyntheticConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if let Some(days) = days {
        config.days = days;
    }

    eprintln!("Generating {} synthetic candles (seed {})", config.days, config.seed);
    let candles = match synthetic::generate_candles(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match csv_adapter::write_candles(output_path, &candles) {
        Ok(()) => {
            eprintln!("Candles written to: {}", output_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
