//! Location Store Output Parsing
//!
//! Pure functions that turn what the location store hands back into
//! [`Fix`] values. Two shapes are understood:
//!
//! - the text output of the query tool, one `"<lat> <lon> <alt> <time>"`
//!   record per matching item;
//! - the cache document itself, a JSON array of items that carry a `name`
//!   and an optional `location` object with a millisecond `timeStamp`.
//!
//! In both cases several records may match one device name; the one with
//! the latest timestamp is the device's current fix.

use serde::Deserialize;
use serde_json::Value;

use crate::fix::{Fix, RecordError};

/// One entry of the cache document. Fields we do not use are ignored.
///
/// Values stay untyped until an item is picked for a device, so a bad entry
/// only spoils the queries for its own name.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheItem {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub location: Option<Value>,
}

impl CacheItem {
    fn is_named(&self, device: &str) -> bool {
        self.name.as_ref().and_then(Value::as_str) == Some(device)
    }
}

/// Location block of a cache entry, as stored
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheLocation {
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
    #[serde(default)]
    pub altitude: Option<Value>,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub time_stamp: Option<Value>,
}

impl CacheLocation {
    fn from_value(value: &Value) -> Result<Self, RecordError> {
        CacheLocation::deserialize(value)
            .map_err(|e| RecordError::Document(format!("location: {}", e)))
    }

    fn to_fix(&self) -> Result<Fix, RecordError> {
        let latitude = number("latitude", &self.latitude)?;
        let longitude = number("longitude", &self.longitude)?;
        let altitude = number("altitude", &self.altitude)?;
        let time_stamp = number("timeStamp", &self.time_stamp)?;
        if !time_stamp.is_finite() {
            return Err(RecordError::Timestamp(time_stamp.to_string()));
        }
        Fix::from_epoch_millis(latitude, longitude, altitude, time_stamp as i64)
    }
}

fn number(field: &'static str, value: &Option<Value>) -> Result<f64, RecordError> {
    match value {
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| RecordError::NotANumber {
            field,
            value: n.to_string(),
        }),
        Some(Value::String(s)) => Err(RecordError::NotANumber {
            field,
            value: s.clone(),
        }),
        Some(other) => Err(RecordError::NotANumber {
            field,
            value: other.to_string(),
        }),
        None => Err(RecordError::NotANumber {
            field,
            value: "null".to_string(),
        }),
    }
}

/// Parse the raw cache document.
///
/// Anything that is not a JSON array of objects is a [`RecordError::Document`].
/// The items themselves are not checked here, see [`latest_in_document`].
pub fn parse_document(data: &[u8]) -> Result<Vec<CacheItem>, RecordError> {
    serde_json::from_slice(data).map_err(|e| RecordError::Document(e.to_string()))
}

/// Latest fix for `device` among the document items.
///
/// Items whose name matches but that carry no `location` are treated as
/// absent. Returns `Ok(None)` when nothing usable matches.
pub fn latest_in_document(items: &[CacheItem], device: &str) -> Result<Option<Fix>, RecordError> {
    let mut latest: Option<Fix> = None;
    for item in items {
        if !item.is_named(device) {
            continue;
        }
        let location = match &item.location {
            None | Some(Value::Null) => continue,
            Some(location) => CacheLocation::from_value(location)?,
        };
        let fix = location.to_fix()?;
        latest = newest(latest, fix);
    }
    Ok(latest)
}

/// Latest fix among the text records printed by the query tool.
///
/// Blank lines are skipped; empty output means no record. A single
/// malformed line rejects the whole output.
///
/// # Example
/// ```
/// use tagtrack_core::record::latest_in_output;
/// let output = "1.0 2.0 3 2024-05-01T12:00:00Z\n1.5 2.5 3 2024-05-01T12:05:00Z\n";
/// let fix = latest_in_output(output).unwrap().unwrap();
/// assert_eq!(fix.latitude(), 1.5);
/// assert!(latest_in_output("\n").unwrap().is_none());
/// ```
pub fn latest_in_output(output: &str) -> Result<Option<Fix>, RecordError> {
    let mut latest: Option<Fix> = None;
    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        let fix = Fix::parse_record(line)?;
        latest = newest(latest, fix);
    }
    Ok(latest)
}

fn newest(current: Option<Fix>, candidate: Fix) -> Option<Fix> {
    match current {
        Some(current) if current.timestamp() >= candidate.timestamp() => Some(current),
        _ => Some(candidate),
    }
}
