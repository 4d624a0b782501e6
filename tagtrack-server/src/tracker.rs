//! Device Tracker
//!
//! The tracker owns the registry of tracked devices and their last known
//! fixes. It reads fixes through a [`LocationStore`], writes positions
//! through a [`PositionSink`], and is the only writer of the fix table.
//!
//! Per device it moves from `Unknown` to `HasFix` on the first successful
//! refresh and stays there; later refreshes only ever swap in a newer fix.

use serde_json::Value;

use tagtrack_core::{Device, DeviceRegistry, DeviceState, Fix, FixTable};

use crate::error::TrackerError;
use crate::publisher::PositionSink;
use crate::store::LocationStore;

/// Result of a successful [`Tracker::publish`]
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// The sink acknowledged the update with this node representation
    Published(Value),
    /// The device has no fix yet, nothing was sent
    Skipped,
}

pub struct Tracker<S, P> {
    registry: DeviceRegistry,
    fixes: FixTable,
    store: S,
    sink: P,
}

impl<S: LocationStore, P: PositionSink> Tracker<S, P> {
    pub fn new(registry: DeviceRegistry, store: S, sink: P) -> Self {
        let fixes = FixTable::new(&registry);
        Tracker {
            registry,
            fixes,
            store,
            sink,
        }
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Last known fix of `name`, if any
    pub fn fix(&self, name: &str) -> Option<&Fix> {
        self.fixes.get(name)
    }

    pub fn state(&self, name: &str) -> Option<DeviceState> {
        self.fixes.state(name)
    }

    fn device(&self, name: &str) -> Result<&Device, TrackerError> {
        self.registry
            .get(name)
            .ok_or_else(|| TrackerError::InvalidDevice(name.to_string()))
    }

    /// Ask the store for the latest fix of `name` and keep it.
    ///
    /// Returns true when a fix was stored. When the store has no record the
    /// previous fix (if any) is kept and false is returned. Store failures
    /// are passed on and leave the stored fix alone.
    pub async fn refresh(&mut self, name: &str) -> Result<bool, TrackerError> {
        self.device(name)?;

        match self.store.query(name).await? {
            Some(fix) => {
                log::debug!("{}: fix {}", name, fix);
                self.fixes.replace(name, fix);
                Ok(true)
            }
            None => {
                log::debug!("{}: no record in location store", name);
                Ok(false)
            }
        }
    }

    /// Send the stored fix of `name` to the sink.
    ///
    /// A device without a fix is skipped without contacting the sink.
    pub async fn publish(&self, name: &str) -> Result<PublishOutcome, TrackerError> {
        let device = self.device(name)?;
        let Some(fix) = self.fixes.get(name) else {
            log::debug!("{}: no fix yet, not publishing", name);
            return Ok(PublishOutcome::Skipped);
        };

        let node = self
            .sink
            .upsert(device.node_id, fix.latitude(), fix.longitude())
            .await?;
        log::info!("{}: node {} updated: {}", name, device.node_id, node);

        Ok(PublishOutcome::Published(node))
    }

    /// Great-circle distance in meters between the last fixes of two devices
    pub fn distance_between(&self, a: &str, b: &str) -> Result<f64, TrackerError> {
        self.device(a)?;
        self.device(b)?;

        let fix_a = self
            .fixes
            .get(a)
            .ok_or_else(|| TrackerError::InsufficientData(a.to_string()))?;
        let fix_b = self
            .fixes
            .get(b)
            .ok_or_else(|| TrackerError::InsufficientData(b.to_string()))?;

        Ok(fix_a.distance_to(fix_b))
    }
}
