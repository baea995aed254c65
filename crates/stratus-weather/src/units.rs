//! Temperature and wind speed units.
//!
//! The weather service reports Celsius and metres per second; everything else is
//! converted locally.

use std::fmt;

use clap::ValueEnum;

/// Temperature scale shown in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TemperatureUnit {
    /// Degrees Celsius, as reported
    #[default]
    Celsius,
    /// Kelvin
    Kelvin,
    /// Degrees Fahrenheit
    Fahrenheit,
}

impl TemperatureUnit {
    /// Menu order, default first.
    pub const ALL: [Self; 3] = [Self::Celsius, Self::Kelvin, Self::Fahrenheit];

    /// Convert a Celsius reading into this unit.
    #[must_use]
    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Kelvin => celsius + 273.15,
            Self::Fahrenheit => celsius * 1.8 + 32.0,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Celsius => "Celsius",
            Self::Kelvin => "Kelvin",
            Self::Fahrenheit => "Fahrenheit",
        };
        f.write_str(label)
    }
}

/// Wind speed unit shown in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum WindSpeedUnit {
    /// Metres per second, as reported
    #[default]
    Mps,
    /// Miles per hour
    Mph,
    /// Kilometres per hour
    Kmh,
}

impl WindSpeedUnit {
    /// Menu order, default first.
    pub const ALL: [Self; 3] = [Self::Mps, Self::Mph, Self::Kmh];

    /// Convert a metres-per-second reading into this unit.
    #[must_use]
    pub fn from_mps(self, mps: f64) -> f64 {
        match self {
            Self::Mps => mps,
            Self::Mph => mps * 2.23694,
            Self::Kmh => mps * 3.6,
        }
    }
}

impl fmt::Display for WindSpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Mps => "Metre per second",
            Self::Mph => "Miles per hour",
            Self::Kmh => "Kilometre per hour",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_conversions() {
        assert_eq!(TemperatureUnit::Celsius.from_celsius(21.5), 21.5);
        assert_eq!(TemperatureUnit::Kelvin.from_celsius(0.0), 273.15);
        assert_eq!(TemperatureUnit::Fahrenheit.from_celsius(100.0), 212.0);
        assert_eq!(TemperatureUnit::Fahrenheit.from_celsius(-40.0), -40.0);
        assert_eq!(TemperatureUnit::Fahrenheit.from_celsius(0.0), 32.0);
    }

    #[test]
    fn wind_conversions() {
        assert_eq!(WindSpeedUnit::Mps.from_mps(4.2), 4.2);
        assert_eq!(WindSpeedUnit::Kmh.from_mps(10.0), 36.0);
        assert_eq!(WindSpeedUnit::Mph.from_mps(1.0), 2.23694);
        assert_eq!(WindSpeedUnit::Mph.from_mps(0.0), 0.0);
    }

    #[test]
    fn defaults_lead_the_menus() {
        assert_eq!(TemperatureUnit::ALL[0], TemperatureUnit::default());
        assert_eq!(WindSpeedUnit::ALL[0], WindSpeedUnit::default());
        assert_eq!(TemperatureUnit::Kelvin.to_string(), "Kelvin");
        assert_eq!(WindSpeedUnit::Kmh.to_string(), "Kilometre per hour");
    }

    #[test]
    fn cli_values() {
        assert_eq!(
            TemperatureUnit::from_str("fahrenheit", true).unwrap(),
            TemperatureUnit::Fahrenheit
        );
        assert_eq!(WindSpeedUnit::from_str("kmh", true).unwrap(), WindSpeedUnit::Kmh);
        assert!(WindSpeedUnit::from_str("knots", true).is_err());
    }
}
