use tagtrack_core::RecordError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Invalid device '{0}'")]
    InvalidDevice(String),
    #[error("Location store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Malformed location record for '{device}': {source}")]
    MalformedRecord {
        device: String,
        #[source]
        source: RecordError,
    },
    #[error("Publishing node {id} failed: {reason}")]
    PublishFailed { id: u32, reason: String },
    #[error("No fix yet for '{0}'")]
    InsufficientData(String),
    #[error("Shutdown")]
    Shutdown,
}

impl TrackerError {
    pub fn malformed(device: &str, source: RecordError) -> Self {
        TrackerError::MalformedRecord {
            device: device.to_string(),
            source,
        }
    }
}
