//! Core reading types for wxdash.
//!
//! A [`WeatherReading`] is one observation of current conditions for a city,
//! as fetched from the weather API and stored in the `weather_logs` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Units;

/// One observation of current weather for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Row identifier (assigned by storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// City name as entered by the user.
    pub city: String,

    /// Air temperature in the configured unit system.
    pub temperature: f64,

    /// Relative humidity in percent.
    pub humidity: f64,

    /// Atmospheric pressure in hPa.
    pub pressure: f64,

    /// Wind speed in the configured unit system.
    pub wind_speed: f64,

    /// Free-text condition description, e.g. "scattered clouds".
    pub description: String,

    /// When this reading was fetched.
    pub timestamp: DateTime<Utc>,
}

impl WeatherReading {
    /// The description in title case, e.g. "Scattered Clouds".
    #[must_use]
    pub fn headline(&self) -> String {
        title_case(&self.description)
    }

    /// Multi-line text summary; the city is shown exactly as stored.
    #[must_use]
    pub fn summary(&self, units: Units) -> String {
        let mut lines = vec![
            format!("Weather in {}", self.city),
            format!("  {}", self.headline()),
        ];
        for metric in Metric::ALL {
            let value = metric.value(self);
            let value = match metric {
                Metric::Humidity | Metric::Pressure => format!("{value:.0}"),
                Metric::Temperature | Metric::WindSpeed => format!("{value:.1}"),
            };
            lines.push(format!(
                "  {:<13} {} {}",
                format!("{}:", metric.name()),
                value,
                metric.unit(units)
            ));
        }
        lines.join("\n")
    }
}

/// Title-case a phrase: a letter that follows a non-letter is upper-cased,
/// every other letter is lower-cased.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// A measured quantity plotted on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Air temperature.
    Temperature,
    /// Relative humidity.
    Humidity,
    /// Atmospheric pressure.
    Pressure,
    /// Wind speed.
    WindSpeed,
}

impl Metric {
    /// Every metric, in dashboard order.
    pub const ALL: [Metric; 4] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Pressure,
        Metric::WindSpeed,
    ];

    /// Human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::Pressure => "Pressure",
            Self::WindSpeed => "Wind Speed",
        }
    }

    /// Unit symbol for this metric.
    #[must_use]
    pub fn unit(self, units: Units) -> &'static str {
        match self {
            Self::Temperature => units.temperature_unit(),
            Self::Humidity => "%",
            Self::Pressure => "hPa",
            Self::WindSpeed => units.speed_unit(),
        }
    }

    /// Name with unit, e.g. "Temperature (°C)".
    #[must_use]
    pub fn label(self, units: Units) -> String {
        format!("{} ({})", self.name(), self.unit(units))
    }

    /// Extract this metric from a reading.
    #[must_use]
    pub fn value(self, reading: &WeatherReading) -> f64 {
        match self {
            Self::Temperature => reading.temperature,
            Self::Humidity => reading.humidity,
            Self::Pressure => reading.pressure,
            Self::WindSpeed => reading.wind_speed,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{DateTime, TimeZone, Utc};

    use super::WeatherReading;

    /// A reading with fixed values at `minute` minutes past 2024-05-01 12:00 UTC.
    pub fn sample_reading(city: &str, minute: u32, temperature: f64) -> WeatherReading {
        WeatherReading {
            id: None,
            city: city.to_string(),
            temperature,
            humidity: 60.0,
            pressure: 1012.0,
            wind_speed: 3.5,
            description: "scattered clouds".to_string(),
            timestamp: at_minute(minute),
        }
    }

    pub fn at_minute(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
            + chrono::Duration::minutes(i64::from(minute))
    }
}
