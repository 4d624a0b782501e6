//! Location Fixes
//!
//! A [`Fix`] is one validated location observation for a device. Fixes are
//! built either from the whitespace-delimited text record produced by the
//! store's query tool, or from raw values read straight out of the cache
//! document (see [`crate::record`]).

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use thiserror::Error;

use crate::geo;

/// Number of fields in a text record: latitude, longitude, altitude, timestamp
pub const RECORD_FIELDS: usize = 4;

/// Reasons a location record could not be turned into a [`Fix`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("expected 4 fields, got {0}")]
    FieldCount(usize),
    #[error("{field} '{value}' is not a number")]
    NotANumber { field: &'static str, value: String },
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("invalid timestamp '{0}'")]
    Timestamp(String),
    #[error("invalid location document: {0}")]
    Document(String),
}

/// The most recent known location of a device
#[derive(Debug, Clone, PartialEq)]
pub struct Fix {
    /// Degrees, [-90, 90]
    latitude: f64,
    /// Degrees, [-180, 180]
    longitude: f64,
    /// Meters, as reported by the store
    altitude: f64,
    timestamp: DateTime<Utc>,
}

impl Fix {
    /// Build a fix, rejecting coordinates outside their valid range.
    ///
    /// NaN and infinite coordinates are rejected as out of range.
    pub fn new(
        latitude: f64,
        longitude: f64,
        altitude: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Fix, RecordError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(RecordError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(RecordError::LongitudeOutOfRange(longitude));
        }
        Ok(Fix {
            latitude,
            longitude,
            altitude,
            timestamp,
        })
    }

    /// Build a fix from the store's native millisecond epoch timestamp
    pub fn from_epoch_millis(
        latitude: f64,
        longitude: f64,
        altitude: f64,
        epoch_ms: i64,
    ) -> Result<Fix, RecordError> {
        let timestamp = DateTime::<Utc>::from_timestamp_millis(epoch_ms)
            .ok_or_else(|| RecordError::Timestamp(epoch_ms.to_string()))?;
        Fix::new(latitude, longitude, altitude, timestamp)
    }

    /// Parse a `"<lat> <lon> <alt> <timestamp>"` text record.
    ///
    /// Fields are separated by any whitespace. The timestamp must be an
    /// RFC 3339 calendar time such as `2024-05-01T12:00:00Z`.
    ///
    /// # Example
    /// ```
    /// use tagtrack_core::Fix;
    /// let fix = Fix::parse_record("37.0 -122.0 10 2024-05-01T12:00:00Z").unwrap();
    /// assert_eq!(fix.latitude(), 37.0);
    /// assert_eq!(fix.calendar_time(), "2024-05-01T12:00:00Z");
    /// ```
    pub fn parse_record(line: &str) -> Result<Fix, RecordError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != RECORD_FIELDS {
            return Err(RecordError::FieldCount(fields.len()));
        }

        let latitude = parse_number("latitude", fields[0])?;
        let longitude = parse_number("longitude", fields[1])?;
        let altitude = parse_number("altitude", fields[2])?;
        let timestamp = DateTime::parse_from_rfc3339(fields[3])
            .map_err(|_| RecordError::Timestamp(fields[3].to_string()))?
            .with_timezone(&Utc);

        Fix::new(latitude, longitude, altitude, timestamp)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Human-readable calendar form of the timestamp
    pub fn calendar_time(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Great-circle distance to another fix, in meters
    pub fn distance_to(&self, other: &Fix) -> f64 {
        geo::distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

impl fmt::Display for Fix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "({}, {}) alt {} m at {}",
            self.latitude,
            self.longitude,
            self.altitude,
            self.calendar_time()
        )
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, RecordError> {
    value.parse::<f64>().map_err(|_| RecordError::NotANumber {
        field,
        value: value.to_string(),
    })
}
