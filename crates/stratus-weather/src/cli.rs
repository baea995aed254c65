//! Command-line interface of the `weather` binary.

use anyhow::Context;
use clap::{ArgAction, Parser};
use inquire::validator::ValueRequiredValidator;
use inquire::{Select, Text};
use stratus_core::Error;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::client::WeatherbitClient;
use crate::config::WeatherConfig;
use crate::lookup::{current_weather, WeatherRow};
use crate::units::{TemperatureUnit, WindSpeedUnit};

/// Printed before the interactive prompts.
pub const WELCOME: &str = "Welcome to the Weather app.\nFind out what the weather is like in your city or anywhere else in the world!\n";

/// Shown when the request timed out.
pub const TIMEOUT_MESSAGE: &str = "Your request timed out. Please try again later.";

/// Shown when the service could not be reached.
pub const OFFLINE_MESSAGE: &str = "Couldn't complete your request because you are not connected to the internet. Please check your internet connection and try again.";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for any city")]
pub struct Cli {
    /// City to look up; prompted for when absent.
    pub city: Option<String>,

    /// Temperature unit; prompted for when absent.
    #[arg(long, value_enum)]
    pub temperature_unit: Option<TemperatureUnit>,

    /// Wind speed unit; prompted for when absent.
    #[arg(long, value_enum)]
    pub wind_unit: Option<WindSpeedUnit>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Resolve missing inputs, fetch the weather and print the table.
    ///
    /// # Errors
    ///
    /// Returns an error if a prompt is aborted, the configuration is incomplete or
    /// the lookup fails.
    pub async fn run(self) -> anyhow::Result<()> {
        init_logger(self.verbose)?;

        if self.city.is_none() {
            println!("{WELCOME}");
        }
        let city = match self.city {
            Some(city) => city,
            None => Text::new("Enter the city name:")
                .with_validator(ValueRequiredValidator::default())
                .prompt()
                .context("city prompt aborted")?,
        };
        let temperature_unit = match self.temperature_unit {
            Some(unit) => unit,
            None => Select::new("Select temperature unit:", TemperatureUnit::ALL.to_vec())
                .with_starting_cursor(0)
                .with_help_message("Enter keeps the default (Celsius)")
                .prompt()
                .context("temperature unit prompt aborted")?,
        };
        let wind_unit = match self.wind_unit {
            Some(unit) => unit,
            None => Select::new("Select wind speed unit:", WindSpeedUnit::ALL.to_vec())
                .with_starting_cursor(0)
                .with_help_message("Enter keeps the default (Metre per second)")
                .prompt()
                .context("wind speed unit prompt aborted")?,
        };
        debug!(%city, ?temperature_unit, ?wind_unit, "looking up weather");

        let config = WeatherConfig::from_env()?;
        let client = WeatherbitClient::from_config(&config)?;
        let observation = current_weather(&client, &city).await?;
        let row = WeatherRow::new(&observation, temperature_unit, wind_unit)?;

        print!("{}", row.to_table());
        Ok(())
    }
}

/// Text shown to the user for a failed lookup.
#[must_use]
pub fn user_message(err: &Error) -> String {
    match err {
        Error::Timeout(_) => TIMEOUT_MESSAGE.to_string(),
        Error::ServiceUnavailable(_) => OFFLINE_MESSAGE.to_string(),
        Error::ExternalServiceError { message, .. } | Error::ValidationError(message) => {
            message.clone()
        }
        Error::ConfigError(_) | Error::InvalidEndpoint(_) => err.to_string(),
        _ => format!("An error occurred during the API request: {err}"),
    }
}

/// Install the global subscriber writing to stderr. `RUST_LOG` overrides `verbosity`.
///
/// # Errors
///
/// Fails if a subscriber is already installed.
pub fn init_logger(verbosity: u8) -> anyhow::Result<()> {
    let default = match verbosity {
        0 => "warn",
        1 => "stratus_weather=debug,stratus_core=debug,warn",
        _ => "stratus_weather=trace,stratus_core=trace,warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Logs go to stderr so the table stays clean on stdout.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .context("failed to install tracing subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from([
            "weather",
            "Cape Town",
            "--temperature-unit",
            "kelvin",
            "--wind-unit",
            "mph",
            "-v",
        ]);
        assert_eq!(cli.city.as_deref(), Some("Cape Town"));
        assert_eq!(cli.temperature_unit, Some(TemperatureUnit::Kelvin));
        assert_eq!(cli.wind_unit, Some(WindSpeedUnit::Mph));
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn everything_optional() {
        let cli = Cli::parse_from(["weather"]);
        assert!(cli.city.is_none());
        assert!(cli.temperature_unit.is_none());
        assert!(cli.wind_unit.is_none());
    }

    #[test]
    fn rejects_unknown_unit() {
        assert!(Cli::try_parse_from(["weather", "Oslo", "--wind-unit", "knots"]).is_err());
    }

    #[test]
    fn second_logger_install_fails() {
        let _ = init_logger(0);
        let err = init_logger(1).unwrap_err();
        assert!(err.to_string().contains("tracing subscriber"));
    }

    #[test]
    fn messages() {
        assert_eq!(
            user_message(&Error::Timeout("8s".into())),
            "Your request timed out. Please try again later."
        );
        assert_eq!(
            user_message(&Error::ServiceUnavailable("dns".into())),
            OFFLINE_MESSAGE
        );
        assert_eq!(
            user_message(&Error::ExternalServiceError {
                service: "weather".into(),
                message: "API request failed with status code: 500".into(),
            }),
            "API request failed with status code: 500"
        );
        assert_eq!(
            user_message(&Error::HttpError("reset".into())),
            "An error occurred during the API request: HTTP request failed: reset"
        );
    }
}
