//! Static device configuration: which beacons are tracked, and the numeric
//! node identifier the position sink knows each of them by.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no devices configured")]
    Empty,
    #[error("device name must not be empty")]
    EmptyName,
    #[error("device '{0}' configured more than once")]
    Duplicate(String),
}

/// A tracked beacon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    /// Identifier of the node representing this device in the position sink
    pub node_id: u32,
}

/// Immutable name to node-id mapping, iterated in configuration order
#[derive(Debug, Clone)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
    index: HashMap<String, usize>,
}

impl DeviceRegistry {
    pub fn new<I>(devices: I) -> Result<DeviceRegistry, RegistryError>
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        let mut list = Vec::new();
        let mut index = HashMap::new();

        for (name, node_id) in devices {
            if name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if index.insert(name.clone(), list.len()).is_some() {
                return Err(RegistryError::Duplicate(name));
            }
            list.push(Device { name, node_id });
        }
        if list.is_empty() {
            return Err(RegistryError::Empty);
        }

        Ok(DeviceRegistry {
            devices: list,
            index,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Device> {
        self.index.get(name).map(|&i| &self.devices[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn node_id(&self, name: &str) -> Option<u32> {
        self.get(name).map(|d| d.node_id)
    }

    /// Devices in the order they were configured
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.devices.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Always false for a registry built by [`DeviceRegistry::new`]; kept to
    /// pair with `len`.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
