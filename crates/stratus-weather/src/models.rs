//! Current-conditions response of the weather service.

use serde::Deserialize;
use serde_json::Number;

/// Body of `GET v2.0/current`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentResponse {
    /// Observations, one per matched station
    #[serde(default)]
    pub data: Vec<Observation>,
}

/// One observation.
///
/// Numbers are kept as received so unconverted values print exactly as the service
/// sent them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Observation {
    /// City the service matched
    pub city_name: String,
    /// Temperature in Celsius
    pub temp: Number,
    /// Relative humidity in percent
    pub rh: Number,
    /// Wind speed in metres per second
    pub wind_spd: Number,
    /// Sky conditions
    pub weather: Conditions,
}

/// Sky conditions of an observation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Conditions {
    /// Text such as "Few clouds"
    pub description: String,
}
