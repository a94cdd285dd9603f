//! Storage layer for wxdash.
//!
//! This module provides `SQLite`-based persistent storage for weather
//! readings. Every refresh appends one row to `weather_logs`; the dashboard
//! reads back the most recent rows for the selected city.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::reading::WeatherReading;
use crate::retry::RetryPolicy;

/// Columns selected for a [`WeatherReading`], in `row_to_reading` order.
const READING_COLUMNS: &str =
    "id, city, temperature, humidity, pressure, wind_speed, description, timestamp";

/// Storage engine for weather readings.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Open the database, retrying until it answers a trivial query.
    ///
    /// Each failed attempt is logged; the pause between attempts comes from
    /// `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RetriesExhausted`] if no attempt succeeds.
    pub fn open_with_retry(path: impl AsRef<Path>, policy: &RetryPolicy) -> Result<Self> {
        let path = path.as_ref();
        policy.run("database connection", |attempt| {
            debug!("Database connection attempt {}", attempt);
            let storage = Self::open(path)?;
            storage.ping()?;
            Ok(storage)
        })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check that the connection answers queries.
    ///
    /// # Errors
    ///
    /// Returns an error if `SELECT 1` fails.
    pub fn ping(&self) -> Result<()> {
        let one: i64 = self.conn.query_row("SELECT 1", [], |row| row.get(0))?;
        if one == 1 {
            Ok(())
        } else {
            Err(Error::internal(format!("SELECT 1 returned {one}")))
        }
    }

    /// Append a reading and return its row id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert(&self, reading: &WeatherReading) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO weather_logs
                (city, temperature, humidity, pressure, wind_speed, description, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                reading.city,
                reading.temperature,
                reading.humidity,
                reading.pressure,
                reading.wind_speed,
                reading.description,
                format_timestamp(reading.timestamp),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted reading {} for {}", id, reading.city);
        Ok(id)
    }

    /// Get a reading by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<WeatherReading>> {
        let result = self
            .conn
            .query_row(
                &format!("SELECT {READING_COLUMNS} FROM weather_logs WHERE id = ?1"),
                [id],
                Self::row_to_reading,
            )
            .optional()?;
        Ok(result)
    }

    /// Get the most recent readings for a city, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn recent_for_city(&self, city: &str, limit: usize) -> Result<Vec<WeatherReading>> {
        let mut stmt = self.conn.prepare(&format!(
            r"
            SELECT {READING_COLUMNS}
            FROM weather_logs WHERE city = ?1
            ORDER BY timestamp DESC, id DESC LIMIT ?2
            "
        ))?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let readings = stmt
            .query_map(params![city, limit_i64], Self::row_to_reading)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// Count all stored readings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM weather_logs", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Count stored readings for one city.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count_for_city(&self, city: &str) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM weather_logs WHERE city = ?1",
            [city],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Summarize every city that has readings, most recently seen first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn cities(&self) -> Result<Vec<CitySummary>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT city, COUNT(*), MAX(timestamp)
            FROM weather_logs
            GROUP BY city
            ORDER BY MAX(timestamp) DESC, city ASC
            ",
        )?;

        let cities = stmt
            .query_map([], |row| {
                let last_seen: String = row.get(2)?;
                Ok(CitySummary {
                    city: row.get(0)?,
                    readings: row.get(1)?,
                    last_seen: parse_timestamp(&last_seen),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(cities)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_readings = self.count()?;

        let (oldest, newest): (Option<String>, Option<String>) = self
            .conn
            .query_row(
                "SELECT MIN(timestamp), MAX(timestamp) FROM weather_logs",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
            .unwrap_or((None, None));

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_readings,
            oldest_reading: oldest.as_deref().map(parse_timestamp),
            newest_reading: newest.as_deref().map(parse_timestamp),
            db_size_bytes,
        })
    }

    /// Convert a database row to a `WeatherReading`.
    fn row_to_reading(row: &rusqlite::Row) -> rusqlite::Result<WeatherReading> {
        let timestamp_str: String = row.get(7)?;

        Ok(WeatherReading {
            id: Some(row.get(0)?),
            city: row.get(1)?,
            temperature: row.get(2)?,
            humidity: row.get(3)?,
            pressure: row.get(4)?,
            wind_speed: row.get(5)?,
            description: row.get(6)?,
            timestamp: parse_timestamp(&timestamp_str),
        })
    }
}

/// Fixed-width UTC form, so text ordering matches time ordering.
fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value).map_or_else(
        |_| {
            warn!("Unparseable timestamp {:?}, using current time", value);
            Utc::now()
        },
        |dt| dt.with_timezone(&Utc),
    )
}

/// Reading counts for one city.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CitySummary {
    /// City name as stored.
    pub city: String,
    /// Number of stored readings.
    pub readings: i64,
    /// Timestamp of the newest reading.
    pub last_seen: DateTime<Utc>,
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StorageStats {
    /// Total number of readings stored.
    pub total_readings: i64,
    /// Timestamp of the oldest reading.
    pub oldest_reading: Option<DateTime<Utc>>,
    /// Timestamp of the newest reading.
    pub newest_reading: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
