//! `wxdash` - A terminal dashboard for live weather and its recent history
//!
//! This library fetches current conditions for a city from OpenWeatherMap,
//! appends every reading to a local `SQLite` log and renders the latest values
//! alongside trend charts built from the stored history.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod logging;
pub mod poller;
pub mod reading;
pub mod retry;
pub mod storage;
pub mod weather;

pub use config::Config;
pub use error::{Error, Result};
pub use history::History;
pub use logging::init_logging;
pub use poller::{DashboardUpdate, Poller};
pub use reading::{Metric, WeatherReading};
pub use retry::RetryPolicy;
pub use storage::{Storage, StorageStats};
pub use weather::{OpenWeatherClient, WeatherSource};
