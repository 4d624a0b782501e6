use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use tagtrack_core::record::latest_in_output;
use tagtrack_core::Fix;

use super::LocationStore;
use crate::error::TrackerError;

pub const DEFAULT_JQ_PROGRAM: &str = "jq";

// Prints "<lat> <lon> <alt> <calendar time>" for every item named $name that
// has a location. The store keeps milliseconds, `todate` wants seconds.
const FILTER: &str = r#".[] | select(.name == $name) | .location | select(. != null) | "\(.latitude) \(.longitude) \(.altitude) \(.timeStamp / 1000 | floor | todate)""#;

/// Queries the cache file by running `jq` over it
pub struct JqLocationStore {
    program: PathBuf,
    path: PathBuf,
}

impl JqLocationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_program(DEFAULT_JQ_PROGRAM, path)
    }

    pub fn with_program(program: impl Into<PathBuf>, path: impl Into<PathBuf>) -> Self {
        JqLocationStore {
            program: program.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LocationStore for JqLocationStore {
    async fn query(&self, device: &str) -> Result<Option<Fix>, TrackerError> {
        // The name goes in as a jq variable, never into the filter text
        let output = Command::new(&self.program)
            .arg("-r")
            .arg("--arg")
            .arg("name")
            .arg(device)
            .arg(FILTER)
            .arg(&self.path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                TrackerError::StoreUnavailable(format!(
                    "cannot run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TrackerError::StoreUnavailable(format!(
                "{} {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        log::trace!("{}: store output {:?}", device, stdout);

        latest_in_output(&stdout).map_err(|e| TrackerError::malformed(device, e))
    }
}
