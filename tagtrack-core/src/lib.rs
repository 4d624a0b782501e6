//! Tagtrack Core
//!
//! Platform-independent building blocks for tracking location beacons.
//! This crate does no I/O: it parses what a location store hands back,
//! validates it into [`Fix`] values, keeps the per-device fix table and
//! computes great-circle distances.
//!
//! The async runtime, the store adapters and the HTTP publisher live in
//! `tagtrack-server`.
//!
//! # Example
//!
//! ```
//! use tagtrack_core::{DeviceRegistry, FixTable, Fix};
//!
//! let registry = DeviceRegistry::new(vec![("X".to_string(), 1), ("Y".to_string(), 2)]).unwrap();
//! let mut table = FixTable::new(&registry);
//!
//! let x = Fix::parse_record("37.0 -122.0 10 2024-05-01T12:00:00Z").unwrap();
//! let y = Fix::parse_record("37.001 -122.0 10 2024-05-01T12:00:00Z").unwrap();
//! table.replace("X", x);
//! table.replace("Y", y);
//!
//! let meters = table.get("X").unwrap().distance_to(table.get("Y").unwrap());
//! assert!((meters - 111.2).abs() < 5.0);
//! ```

pub mod fix;
pub mod geo;
pub mod record;
pub mod registry;
pub mod state;

pub use fix::{Fix, RecordError};
pub use geo::{distance, EARTH_RADIUS_M};
pub use registry::{Device, DeviceRegistry, RegistryError};
pub use state::{DeviceState, FixTable};
