//! Step-type descriptor. Owns the installation registry and its store.

use std::fs;
use std::path::Path;

use crate::installation::registry::{InstallationRegistry, Snapshot};
use crate::installation::store::{self, InstallationStore};
use crate::installation::Installation;
use crate::Error;

pub const DISPLAY_NAME: &str = "Invoke Gradle script";

#[derive(Debug, Default)]
pub struct GradleDescriptor {
    registry: InstallationRegistry,
    store: Option<InstallationStore>,
}

impl GradleDescriptor {
    /// In-memory descriptor; `set_installations` does not persist.
    pub fn new(installations: Vec<Installation>) -> Self {
        GradleDescriptor {
            registry: InstallationRegistry::new(installations),
            store: None,
        }
    }

    /// Loads the registry from `store`. When the store does not exist yet and
    /// `legacy_config` points at an old JSON property bag, its installations
    /// are adopted and written to the store.
    pub fn load(store: InstallationStore, legacy_config: Option<&Path>) -> Result<Self, Error> {
        let descriptor = GradleDescriptor {
            registry: InstallationRegistry::new(store.load()?),
            store: Some(store),
        };

        if let Some(legacy) = legacy_config {
            if !descriptor.store_exists() && legacy.is_file() {
                let bag: serde_json::Value = serde_json::from_str(&fs::read_to_string(legacy)?)?;
                if descriptor.convert(&bag)? {
                    log::warn!("Migrated Gradle installations from legacy configuration {:?}", legacy);
                }
            }
        }
        Ok(descriptor)
    }

    /// Adopts the `installations` entry of an old property bag and saves it.
    /// Returns whether the bag had one.
    pub fn convert(&self, old_property_bag: &serde_json::Value) -> Result<bool, Error> {
        match store::convert_legacy(old_property_bag)? {
            Some(installations) => {
                self.set_installations(installations)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn display_name(&self) -> &'static str {
        DISPLAY_NAME
    }

    pub fn installations(&self) -> Snapshot {
        self.registry.snapshot()
    }

    /// Replaces the registry and saves it when a store is attached.
    pub fn set_installations(&self, installations: Vec<Installation>) -> Result<(), Error> {
        if let Some(store) = &self.store {
            store.save(&installations)?;
        }
        self.registry.replace(installations);
        Ok(())
    }

    fn store_exists(&self) -> bool {
        self.store.as_ref().map_or(false, InstallationStore::exists)
    }
}
