//! Error types for wxdash.
//!
//! This module defines all error types used throughout the wxdash crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// Message shown on the dashboard when the weather API rejects a lookup.
pub const CITY_NOT_FOUND_MESSAGE: &str = "City not found or API error.";

/// The main error type for wxdash operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// An operation kept failing until its retry budget ran out.
    #[error("{operation} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// What was being attempted.
        operation: String,
        /// How many attempts were made.
        attempts: u32,
        /// The error from the final attempt.
        #[source]
        last: Box<Error>,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// No OpenWeatherMap API key was configured.
    #[error("no API key configured; set OPENWEATHER_API_KEY or api.key in the config file")]
    MissingApiKey,

    // === Weather API Errors ===
    /// The HTTP request to the weather API failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The weather API answered with a non-success code.
    #[error("weather API returned {code}: {message}")]
    WeatherApi {
        /// The `cod` value (or HTTP status) reported by the API.
        code: u16,
        /// The message reported by the API.
        message: String,
    },

    /// The weather API answered, but the payload lacked required fields.
    #[error("malformed weather response: {0}")]
    MalformedResponse(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for wxdash operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a malformed response error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if the weather API rejected the lookup (unknown city, bad key, ...).
    #[must_use]
    pub fn is_api_rejection(&self) -> bool {
        matches!(self, Self::WeatherApi { .. })
    }

    /// Check if the weather API reported that the city does not exist.
    #[must_use]
    pub fn is_city_not_found(&self) -> bool {
        matches!(self, Self::WeatherApi { code: 404, .. })
    }

    /// Short text suitable for the dashboard status area.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::WeatherApi { .. } | Self::MalformedResponse(_) => {
                CITY_NOT_FOUND_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingApiKey;
        assert!(err.to_string().contains("OPENWEATHER_API_KEY"));

        let err = Error::internal("test error");
        assert_eq!(err.to_string(), "internal error: test error");
    }

    #[test]
    fn test_weather_api_error_display() {
        let err = Error::WeatherApi {
            code: 404,
            message: "city not found".to_string(),
        };
        assert_eq!(err.to_string(), "weather API returned 404: city not found");
    }

    #[test]
    fn test_is_city_not_found() {
        let not_found = Error::WeatherApi {
            code: 404,
            message: "city not found".to_string(),
        };
        assert!(not_found.is_city_not_found());
        assert!(not_found.is_api_rejection());

        let unauthorized = Error::WeatherApi {
            code: 401,
            message: "Invalid API key".to_string(),
        };
        assert!(!unauthorized.is_city_not_found());
        assert!(unauthorized.is_api_rejection());

        assert!(!Error::MissingApiKey.is_api_rejection());
    }

    #[test]
    fn test_user_message_for_api_errors() {
        let err = Error::WeatherApi {
            code: 404,
            message: "city not found".to_string(),
        };
        assert_eq!(err.user_message(), CITY_NOT_FOUND_MESSAGE);
        assert_eq!(
            Error::malformed("missing main").user_message(),
            CITY_NOT_FOUND_MESSAGE
        );
    }

    #[test]
    fn test_user_message_for_other_errors() {
        let err = Error::internal("boom");
        assert_eq!(err.user_message(), "internal error: boom");
    }

    #[test]
    fn test_retries_exhausted_display() {
        let err = Error::RetriesExhausted {
            operation: "database connection".to_string(),
            attempts: 40,
            last: Box::new(Error::internal("locked")),
        };
        let msg = err.to_string();
        assert!(msg.contains("database connection"));
        assert!(msg.contains("40 attempts"));
        assert!(msg.contains("locked"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::config_validation("refresh_interval_secs must be greater than 0");
        assert!(err.to_string().contains("refresh_interval_secs"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
