//! Fetch, check and tabulate the weather of one city.

use serde_json::Number;
use stratus_core::Error;
use tracing::info;

use crate::client::WeatherSource;
use crate::models::Observation;
use crate::table::Table;
use crate::units::{TemperatureUnit, WindSpeedUnit};
use crate::Result;

/// Shown when the service matched no city or a different one.
pub const CITY_NOT_FOUND: &str =
    "The city you entered does not exist or could not be found.\nPlease check the spelling and try again.";

/// Column headers of the weather table.
pub const HEADERS: [&str; 5] = ["City", "Temperature", "Humidity", "Wind Speed", "Description"];

/// Current observation for `city`.
///
/// The service answers fuzzy matches with the nearest city it knows, so the reported
/// name must equal `city` ignoring case.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] with [`CITY_NOT_FOUND`] when nothing matches,
/// otherwise the source error.
pub async fn current_weather(source: &dyn WeatherSource, city: &str) -> Result<Observation> {
    let requested = city.trim();
    let observation = source
        .current(requested)
        .await?
        .into_iter()
        .next()
        .filter(|observation| observation.city_name.to_lowercase() == requested.to_lowercase())
        .ok_or_else(|| Error::ValidationError(CITY_NOT_FOUND.to_string()))?;

    info!(city = %observation.city_name, "observation received");
    Ok(observation)
}

/// One table row in the chosen units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRow {
    /// City as reported
    pub city: String,
    /// Temperature in the chosen unit
    pub temperature: String,
    /// Relative humidity
    pub humidity: String,
    /// Wind speed in the chosen unit
    pub wind_speed: String,
    /// Sky conditions
    pub description: String,
}

impl WeatherRow {
    /// Convert `observation` into `temperature_unit` and `wind_unit`.
    ///
    /// Values already in the requested unit are printed as received.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if a reading is not representable as a float.
    pub fn new(
        observation: &Observation,
        temperature_unit: TemperatureUnit,
        wind_unit: WindSpeedUnit,
    ) -> Result<Self> {
        let temperature = match temperature_unit {
            TemperatureUnit::Celsius => observation.temp.to_string(),
            unit => format_float(unit.from_celsius(as_float(&observation.temp)?)),
        };
        let wind_speed = match wind_unit {
            WindSpeedUnit::Mps => observation.wind_spd.to_string(),
            unit => format_float(unit.from_mps(as_float(&observation.wind_spd)?)),
        };

        Ok(Self {
            city: observation.city_name.clone(),
            temperature,
            humidity: observation.rh.to_string(),
            wind_speed,
            description: observation.weather.description.clone(),
        })
    }

    /// Render the row under [`HEADERS`].
    #[must_use]
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(HEADERS);
        table.push_row([
            self.city.as_str(),
            self.temperature.as_str(),
            self.humidity.as_str(),
            self.wind_speed.as_str(),
            self.description.as_str(),
        ]);
        table
    }
}

fn as_float(number: &Number) -> Result<f64> {
    number
        .as_f64()
        .ok_or_else(|| Error::ParseError(format!("`{number}` is not a number")))
}

/// Shortest representation of `value`, keeping one decimal on whole numbers.
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
