//! `SQLite` schema definitions for wxdash.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the weather log table.
pub const CREATE_WEATHER_LOGS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS weather_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    city TEXT NOT NULL,
    temperature REAL NOT NULL,
    humidity REAL NOT NULL,
    pressure REAL NOT NULL,
    wind_speed REAL NOT NULL,
    description TEXT NOT NULL,
    timestamp TEXT NOT NULL
)
";

/// SQL statement to create an index for per-city history queries.
pub const CREATE_CITY_TIMESTAMP_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_weather_logs_city_timestamp
    ON weather_logs(city, timestamp DESC)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_WEATHER_LOGS_TABLE,
    CREATE_CITY_TIMESTAMP_INDEX,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_weather_logs_table_contains_required_columns() {
        for column in [
            "city TEXT NOT NULL",
            "temperature REAL",
            "humidity REAL",
            "pressure REAL",
            "wind_speed REAL",
            "description TEXT",
            "timestamp TEXT NOT NULL",
        ] {
            assert!(
                CREATE_WEATHER_LOGS_TABLE.contains(column),
                "missing column definition: {column}"
            );
        }
    }

    #[test]
    fn test_create_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }
}
