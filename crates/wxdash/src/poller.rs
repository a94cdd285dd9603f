//! The refresh cycle behind the dashboard.
//!
//! A [`Poller`] runs as a tokio task. On every tick, and immediately after
//! the user picks a new city, it fetches the current conditions, appends them
//! to storage, reloads the recent history and sends the result to the UI.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::history::History;
use crate::reading::WeatherReading;
use crate::storage::Storage;
use crate::weather::WeatherSource;

/// Default number of readings loaded for the charts.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Default pause between refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Result of one refresh, sent to the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardUpdate {
    /// Fresh conditions and the history that includes them.
    Ready {
        /// The reading just fetched and stored.
        reading: WeatherReading,
        /// Recent readings for the same city, oldest first.
        history: History,
    },
    /// The refresh failed.
    Failed {
        /// City the refresh was for.
        city: String,
        /// Message for the status area.
        message: String,
        /// When the failure happened.
        at: DateTime<Utc>,
    },
}

impl DashboardUpdate {
    /// City this update belongs to.
    #[must_use]
    pub fn city(&self) -> &str {
        match self {
            Self::Ready { reading, .. } => &reading.city,
            Self::Failed { city, .. } => city,
        }
    }
}

/// Fetches, stores and reloads weather for the selected city.
#[derive(Debug)]
pub struct Poller<S> {
    source: S,
    storage: Storage,
    history_limit: usize,
    interval: Duration,
}

impl<S: WeatherSource> Poller<S> {
    /// Create a poller with default limits.
    #[must_use]
    pub fn new(source: S, storage: Storage) -> Self {
        Self {
            source,
            storage,
            history_limit: DEFAULT_HISTORY_LIMIT,
            interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    /// Set how many readings are loaded for the charts.
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Set the pause between refreshes.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Access the underlying storage.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Fetch, store and reload for `city`.
    pub async fn refresh(&mut self, city: &str) -> DashboardUpdate {
        match self.try_refresh(city).await {
            Ok((reading, history)) => {
                info!(
                    city,
                    temperature = reading.temperature,
                    history = history.len(),
                    "refreshed weather"
                );
                DashboardUpdate::Ready { reading, history }
            }
            Err(e) => {
                if e.is_api_rejection() {
                    warn!(city, "weather lookup rejected: {}", e);
                } else {
                    error!(city, "refresh failed: {}", e);
                }
                DashboardUpdate::Failed {
                    city: city.to_string(),
                    message: e.user_message(),
                    at: Utc::now(),
                }
            }
        }
    }

    async fn try_refresh(&mut self, city: &str) -> Result<(WeatherReading, History)> {
        debug!(city, source = self.source.name(), "fetching current weather");
        let mut reading = self.source.current(city).await?;
        reading.id = Some(self.storage.insert(&reading)?);

        let recent = self.storage.recent_for_city(city, self.history_limit)?;
        Ok((reading, History::from_recent(recent)))
    }

    /// Refresh on every tick and whenever the city changes.
    ///
    /// Runs until the update receiver or the city sender is dropped.
    pub async fn run(
        mut self,
        mut city_rx: watch::Receiver<String>,
        updates: mpsc::Sender<DashboardUpdate>,
    ) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = city_rx.changed() => {
                    if changed.is_err() {
                        debug!("city channel closed");
                        break;
                    }
                    ticker.reset();
                }
                () = updates.closed() => {
                    debug!("dashboard went away");
                    break;
                }
            }

            let city = city_rx.borrow_and_update().clone();
            let update = self.refresh(&city).await;
            if updates.send(update).await.is_err() {
                break;
            }
        }

        info!("poller stopped");
    }
}
