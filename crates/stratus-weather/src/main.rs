//! `weather` command-line entry point.

use std::process::ExitCode;

use clap::Parser;
use stratus_core::Error;
use stratus_weather::cli::{user_message, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    match Cli::parse().run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<Error>() {
                Some(err) => eprintln!("{}", user_message(err)),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
