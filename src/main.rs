use clap::Parser;
use tradelab::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
