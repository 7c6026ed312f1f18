//! On-disk persistence of the installation registry, plus the one-time
//! import of the legacy JSON property bag.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::Installation;
use crate::Error;

/// Key under which old configurations kept their installations.
pub const LEGACY_INSTALLATIONS_KEY: &str = "installations";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    installations: Vec<Installation>,
}

/// TOML file holding `[[installations]]` tables.
#[derive(Debug, Clone)]
pub struct InstallationStore {
    path: PathBuf,
}

impl InstallationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        InstallationStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the store. A missing file is an empty registry.
    pub fn load(&self) -> Result<Vec<Installation>, Error> {
        if !self.exists() {
            log::debug!("No installation store at {:?}", self.path);
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        let file: StoreFile = toml::from_str(&text)?;
        log::debug!("Loaded {} installations from {:?}", file.installations.len(), self.path);
        Ok(file.installations)
    }

    pub fn save(&self, installations: &[Installation]) -> Result<(), Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = StoreFile {
            installations: installations.to_vec(),
        };
        fs::write(&self.path, toml::to_string_pretty(&file)?)?;
        log::info!("Saved {} installations to {:?}", installations.len(), self.path);
        Ok(())
    }
}

/// Pulls the installation list out of a legacy property bag, if it has one.
/// The list is taken as-is apart from the usual home laundering.
pub fn convert_legacy(old_property_bag: &serde_json::Value) -> Result<Option<Vec<Installation>>, Error> {
    match old_property_bag.get(LEGACY_INSTALLATIONS_KEY) {
        Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
        None => Ok(None),
    }
}
