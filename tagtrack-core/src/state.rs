//! Device Fix Tracking
//!
//! Holds the last known [`Fix`] of every registered device. A device starts
//! out [`DeviceState::Unknown`] and moves to [`DeviceState::HasFix`] on its
//! first successful poll. Stored fixes are replaced whole, never edited in
//! place, and there is no way back to `Unknown`.

use std::collections::HashMap;

use crate::fix::Fix;
use crate::registry::DeviceRegistry;

/// Per-device tracking state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// No fix seen yet
    Unknown,
    HasFix,
}

/// Last known fix per registered device
#[derive(Debug, Clone)]
pub struct FixTable {
    fixes: HashMap<String, Option<Fix>>,
}

impl FixTable {
    /// Create a table with every registered device in the `Unknown` state
    pub fn new(registry: &DeviceRegistry) -> Self {
        FixTable {
            fixes: registry.names().map(|n| (n.to_string(), None)).collect(),
        }
    }

    /// Store a new fix for `name`, dropping the previous one.
    ///
    /// Returns false, leaving the table untouched, if `name` was never
    /// registered.
    pub fn replace(&mut self, name: &str, fix: Fix) -> bool {
        match self.fixes.get_mut(name) {
            Some(slot) => {
                *slot = Some(fix);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Fix> {
        self.fixes.get(name).and_then(|f| f.as_ref())
    }

    /// `None` for unregistered names
    pub fn state(&self, name: &str) -> Option<DeviceState> {
        self.fixes.get(name).map(|f| match f {
            Some(_) => DeviceState::HasFix,
            None => DeviceState::Unknown,
        })
    }

    /// Number of devices that have a fix
    pub fn known(&self) -> usize {
        self.fixes.values().filter(|f| f.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> DeviceRegistry {
        DeviceRegistry::new(vec![("X".to_string(), 1), ("Y".to_string(), 2)]).unwrap()
    }

    #[test]
    fn test_starts_unknown() {
        let table = FixTable::new(&registry());
        assert_eq!(table.state("X"), Some(DeviceState::Unknown));
        assert_eq!(table.state("Y"), Some(DeviceState::Unknown));
        assert_eq!(table.state("Z"), None);
        assert!(table.get("X").is_none());
        assert_eq!(table.known(), 0);
    }

    #[test]
    fn test_replace() {
        let mut table = FixTable::new(&registry());
        let first = Fix::from_epoch_millis(37.0, -122.0, 10.0, 1_000).unwrap();
        let second = Fix::from_epoch_millis(37.5, -122.5, 12.0, 2_000).unwrap();

        assert!(table.replace("X", first.clone()));
        assert_eq!(table.state("X"), Some(DeviceState::HasFix));
        assert_eq!(table.get("X"), Some(&first));

        assert!(table.replace("X", second.clone()));
        assert_eq!(table.get("X"), Some(&second));
        assert_eq!(table.known(), 1);
    }

    #[test]
    fn test_replace_unregistered() {
        let mut table = FixTable::new(&registry());
        let fix = Fix::from_epoch_millis(0.0, 0.0, 0.0, 0).unwrap();
        assert!(!table.replace("Z", fix));
        assert_eq!(table.state("Z"), None);
    }
}
