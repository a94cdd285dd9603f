//! OpenWeatherMap current-weather client.

use std::fmt;

use chrono::Utc;
use reqwest::Client;
use tracing::{debug, instrument};

use super::response::CurrentWeatherResponse;
use super::WeatherSource;
use crate::config::{ApiConfig, Units};
use crate::error::{Error, Result};
use crate::reading::WeatherReading;

/// Fetches current conditions from `{base_url}/weather`.
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    units: Units,
}

impl fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("base_url", &self.base_url)
            .field("units", &self.units)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherClient {
    /// Build a client from the `[api]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingApiKey`] if no key is configured, or an HTTP
    /// error if the underlying client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let api_key = config
            .key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(Error::MissingApiKey)?
            .to_string();

        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("wxdash/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            units: config.units,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/weather", self.base_url)
    }
}

#[async_trait::async_trait]
impl WeatherSource for OpenWeatherClient {
    fn name(&self) -> &'static str {
        "openweathermap"
    }

    #[instrument(skip(self), fields(units = %self.units))]
    async fn current(&self, city: &str) -> Result<WeatherReading> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_query()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "weather API responded");

        let parsed = match CurrentWeatherResponse::parse(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(Error::WeatherApi {
                    code: status.as_u16(),
                    message: status
                        .canonical_reason()
                        .unwrap_or("unexpected response")
                        .to_string(),
                });
            }
            Err(e) => return Err(Error::malformed(e.to_string())),
        };

        parsed.into_reading(city, status.as_u16(), Utc::now())
    }
}
