//! `deployer` command-line entry point.

use std::process::ExitCode;

use clap::Parser;
use stratus_core::config::{load_env_file, ENV_FILE};
use stratus_deployer::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Loaded before parsing so `.env` values can fill `env`-backed arguments.
    let env_file = load_env_file(ENV_FILE);
    match Cli::parse().run(env_file).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
