//! Payload of the OpenWeatherMap current-weather endpoint.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::reading::WeatherReading;

/// The `cod` field is a number on success and a string on errors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum Code {
    Number(u16),
    Text(String),
}

impl Code {
    fn as_u16(&self) -> Option<u16> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Main {
    temp: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct Wind {
    speed: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct Condition {
    description: Option<String>,
}

/// Raw response body, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeatherResponse {
    cod: Option<Code>,
    message: Option<String>,
    main: Option<Main>,
    wind: Option<Wind>,
    #[serde(default)]
    weather: Vec<Condition>,
}

impl CurrentWeatherResponse {
    /// Parse a response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not JSON of the expected shape.
    pub fn parse(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Result code reported by the API, falling back to `http_status`.
    #[must_use]
    pub fn code(&self, http_status: u16) -> u16 {
        self.cod
            .as_ref()
            .and_then(Code::as_u16)
            .unwrap_or(http_status)
    }

    /// Turn the payload into a reading for `city` taken at `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WeatherApi`] when the code is not 200 and
    /// [`Error::MalformedResponse`] when a required field is absent.
    pub fn into_reading(
        self,
        city: &str,
        http_status: u16,
        timestamp: DateTime<Utc>,
    ) -> Result<WeatherReading> {
        let code = self.code(http_status);
        if code != 200 {
            return Err(Error::WeatherApi {
                code,
                message: self
                    .message
                    .unwrap_or_else(|| "no message from weather API".to_string()),
            });
        }

        let main = self.main.ok_or_else(|| Error::malformed("missing `main`"))?;
        let wind = self.wind.ok_or_else(|| Error::malformed("missing `wind`"))?;
        let description = self
            .weather
            .into_iter()
            .next()
            .and_then(|c| c.description)
            .ok_or_else(|| Error::malformed("missing `weather[0].description`"))?;

        Ok(WeatherReading {
            id: None,
            city: city.to_string(),
            temperature: main.temp.ok_or_else(|| Error::malformed("missing `main.temp`"))?,
            humidity: main
                .humidity
                .ok_or_else(|| Error::malformed("missing `main.humidity`"))?,
            pressure: main
                .pressure
                .ok_or_else(|| Error::malformed("missing `main.pressure`"))?,
            wind_speed: wind
                .speed
                .ok_or_else(|| Error::malformed("missing `wind.speed`"))?,
            description,
            timestamp,
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// A trimmed-down success body for Bangalore.
    pub const BANGALORE_OK: &str = r#"{
        "coord": {"lon": 77.6, "lat": 12.98},
        "weather": [{"id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d"}],
        "main": {"temp": 24.3, "feels_like": 24.5, "pressure": 1014, "humidity": 64},
        "wind": {"speed": 4.12, "deg": 270},
        "name": "Bengaluru",
        "cod": 200
    }"#;

    /// The body returned for an unknown city.
    pub const NOT_FOUND: &str = r#"{"cod":"404","message":"city not found"}"#;

    /// The body returned for a bad API key.
    pub const UNAUTHORIZED: &str = r#"{"cod":401,"message":"Invalid API key."}"#;
}
