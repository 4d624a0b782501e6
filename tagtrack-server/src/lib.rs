//! Tagtrack server
//!
//! Keeps a fixed set of location beacons in sync with an external mapping
//! service: on every pass it reads each beacon's latest fix from the local
//! location cache and pushes the coordinates to the beacon's node.
//!
//! The building blocks are:
//!
//! - [`store`]: adapters for the location cache ([`store::LocationStore`])
//! - [`publisher`]: the HTTP position sink ([`publisher::PositionSink`])
//! - [`tracker`]: per-device fix state and distance queries
//! - [`polling`]: the cancellable polling loop
//! - [`config`]: command line configuration
//!
//! # Usage
//!
//! ```rust,ignore
//! use tagtrack_server::polling::{PollingLoop, DEFAULT_POLL_INTERVAL};
//! use tagtrack_server::publisher::HttpPositionPublisher;
//! use tagtrack_server::store::JqLocationStore;
//! use tagtrack_server::tracker::Tracker;
//!
//! let tracker = Tracker::new(registry, JqLocationStore::new(path), publisher);
//! let polling = PollingLoop::new(tracker, DEFAULT_POLL_INTERVAL);
//! subsys.start(SubsystemBuilder::new("poller", |s| polling.run(s)));
//! ```

pub mod config;
pub mod error;
pub mod polling;
pub mod publisher;
pub mod store;
pub mod tracker;

#[cfg(test)]
pub(crate) mod testing;

pub use error::TrackerError;
