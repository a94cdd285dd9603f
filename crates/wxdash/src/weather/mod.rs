//! Weather data sources.
//!
//! [`WeatherSource`] is the seam between the refresh cycle and the outside
//! world; [`OpenWeatherClient`] is the production implementation.

mod openweather;
mod response;

pub use openweather::OpenWeatherClient;
pub use response::CurrentWeatherResponse;

use crate::error::Result;
use crate::reading::WeatherReading;

/// A provider of current weather conditions.
#[async_trait::async_trait]
pub trait WeatherSource: Send + Sync {
    /// The name of this source (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Fetch the current conditions for `city`.
    ///
    /// The returned reading is stamped with the fetch time and carries
    /// `city` exactly as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API rejects the city,
    /// or the response cannot be interpreted.
    async fn current(&self, city: &str) -> Result<WeatherReading>;
}
