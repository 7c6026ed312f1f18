use std::sync::Arc;

use parking_lot::RwLock;

use super::Installation;

/// Immutable view of the registry at one point in time.
pub type Snapshot = Arc<[Installation]>;

/// Process-wide list of installations. Saving the configuration swaps in a
/// whole new list; readers hold on to the snapshot they started with.
#[derive(Debug)]
pub struct InstallationRegistry {
    current: RwLock<Snapshot>,
}

impl InstallationRegistry {
    pub fn new(installations: Vec<Installation>) -> Self {
        InstallationRegistry {
            current: RwLock::new(Arc::from(installations)),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.current.read().clone()
    }

    /// Replaces the whole list. Existing snapshots are unaffected.
    pub fn replace(&self, installations: Vec<Installation>) {
        let next: Snapshot = Arc::from(installations);
        log::debug!("Installation registry now holds {} entries", next.len());
        *self.current.write() = next;
    }
}

impl Default for InstallationRegistry {
    fn default() -> Self {
        InstallationRegistry::new(Vec::new())
    }
}

/// First installation named exactly `name`.
pub fn find<'a>(installations: &'a [Installation], name: &str) -> Option<&'a Installation> {
    installations.iter().find(|i| i.name() == name)
}
