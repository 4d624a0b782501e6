use async_trait::async_trait;
use std::path::{Path, PathBuf};

use tagtrack_core::record::{latest_in_document, parse_document};
use tagtrack_core::Fix;

use super::LocationStore;
use crate::error::TrackerError;

/// Reads the cache file directly and picks the device's entry out of it
pub struct FileLocationStore {
    path: PathBuf,
}

impl FileLocationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileLocationStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LocationStore for FileLocationStore {
    async fn query(&self, device: &str) -> Result<Option<Fix>, TrackerError> {
        let data = tokio::fs::read(&self.path).await.map_err(|e| {
            TrackerError::StoreUnavailable(format!("{}: {}", self.path.display(), e))
        })?;

        let items = parse_document(&data).map_err(|e| {
            TrackerError::StoreUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        log::trace!(
            "{}: {} items in {}",
            device,
            items.len(),
            self.path.display()
        );

        latest_in_document(&items, device).map_err(|e| TrackerError::malformed(device, e))
    }
}
