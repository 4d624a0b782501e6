//! Location Store adapters
//!
//! The location store is the external, read-only cache where the
//! device-tracking service keeps the latest fix of every beacon. The tracker
//! only sees it through [`LocationStore`]; how a query is answered is up to
//! the adapter:
//!
//! - [`JqLocationStore`] shells out to `jq` to filter the cache file
//! - [`FileLocationStore`] reads and parses the cache file itself

use async_trait::async_trait;
use directories::BaseDirs;
use std::path::PathBuf;

use tagtrack_core::Fix;

use crate::error::TrackerError;

mod file;
mod jq;

pub use file::FileLocationStore;
pub use jq::{JqLocationStore, DEFAULT_JQ_PROGRAM};

/// Cache file location relative to the user's home directory
const CACHE_FILE: &str = "Library/Caches/com.apple.findmy.fmipcore/Items.data";

#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Latest fix recorded for `device`.
    ///
    /// `Ok(None)` means the store was read fine but holds no record for the
    /// device. Failing to read the store at all is
    /// [`TrackerError::StoreUnavailable`]; a record that cannot be parsed is
    /// [`TrackerError::MalformedRecord`].
    async fn query(&self, device: &str) -> Result<Option<Fix>, TrackerError>;
}

/// Default cache file path, if a home directory can be determined
pub fn default_store_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CACHE_FILE))
}
