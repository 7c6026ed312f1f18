//! Named Gradle installations and their node/environment specializations.
//!
//! Specializing never mutates: [`Installation::for_node`] and
//! [`Installation::for_environment`] return new values, so the registry's
//! stored copies stay untouched while a step adjusts its own.

pub mod registry;
pub mod resolver;
pub mod store;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::command::gradle_command::default_executable;
use crate::env_vars::EnvVars;
use crate::node::Node;

/// One configured copy of Gradle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "InstallationRecord")]
pub struct Installation {
    name: String,
    home: String,
}

/// Unvalidated form as read from disk; goes through [`Installation::new`].
#[derive(Deserialize)]
struct InstallationRecord {
    name: String,
    home: String,
}

impl From<InstallationRecord> for Installation {
    fn from(record: InstallationRecord) -> Self {
        Installation::new(record.name, record.home)
    }
}

impl Installation {
    /// Trailing `/` or `\` are stripped from `home`.
    pub fn new(name: impl Into<String>, home: impl Into<String>) -> Self {
        Installation {
            name: name.into(),
            home: launder_home(home.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    /// Copy whose home is the node's override for this installation, when
    /// the node has one.
    pub fn for_node(&self, node: &dyn Node) -> Installation {
        match node.tool_location(&self.name) {
            Some(home) => {
                log::debug!(
                    "Installation '{}' relocated to {} on node '{}'",
                    self.name,
                    home,
                    node.name()
                );
                Installation::new(self.name.clone(), home)
            }
            None => self.clone(),
        }
    }

    /// Copy with `${VAR}` references in the home expanded against `env`.
    pub fn for_environment(&self, env: &EnvVars) -> Installation {
        Installation::new(self.name.clone(), env.expand(&self.home))
    }

    /// `<home>/bin/gradle` (or `gradle.bat` when `is_unix` is false).
    pub fn executable_path(&self, is_unix: bool) -> PathBuf {
        executable_path(&self.home, is_unix)
    }
}

/// `<home>/bin/gradle` (or `gradle.bat` when `is_unix` is false).
pub fn executable_path(home: &str, is_unix: bool) -> PathBuf {
    Path::new(home).join("bin").join(default_executable(!is_unix))
}

/// Strips every trailing separator, not just one, so a stored home never
/// ends in `/` or `\`.
fn launder_home(mut home: String) -> String {
    while home.ends_with('/') || home.ends_with('\\') {
        home.pop();
    }
    home
}
