//! Current weather for a city, printed as a table.

#![deny(missing_docs)]

pub mod cli;
pub mod client;
pub mod config;
pub mod lookup;
pub mod models;
pub mod table;
pub mod units;

pub use client::{WeatherSource, WeatherbitClient};
pub use units::{TemperatureUnit, WindSpeedUnit};

/// Convenient result alias that reuses the shared Stratus error type.
pub type Result<T> = stratus_core::Result<T>;
