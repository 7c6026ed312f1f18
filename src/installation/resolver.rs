use std::path::PathBuf;

use super::{registry, Installation};
use crate::command::gradle_command::default_executable;
use crate::env_vars::EnvVars;
use crate::node::{Node, NodeRequest, NodeResponse};
use crate::Error;

/// Outcome of looking up the installation a step asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No usable name: invoke the bare tool name from `PATH`.
    Default,
    /// A configured installation, specialized for the node and environment,
    /// with its executable confirmed on the node.
    Installed {
        installation: Installation,
        executable: PathBuf,
    },
}

impl Resolution {
    /// Program to put first on the command line.
    pub fn executable(&self, windows: bool) -> String {
        match self {
            Resolution::Default => default_executable(windows).to_string(),
            Resolution::Installed { executable, .. } => executable.to_string_lossy().into_owned(),
        }
    }

    pub fn installation(&self) -> Option<&Installation> {
        match self {
            Resolution::Default => None,
            Resolution::Installed { installation, .. } => Some(installation),
        }
    }
}

/// Resolves `name` against `installations` for a step running on `node`.
///
/// An unset, empty or unknown name yields [`Resolution::Default`]. A known
/// name whose executable is missing on the node is an error.
pub fn resolve(
    installations: &[Installation],
    name: Option<&str>,
    node: &dyn Node,
    env: &EnvVars,
) -> Result<Resolution, Error> {
    let name = match name.filter(|n| !n.is_empty()) {
        Some(name) => name,
        None => return Ok(Resolution::Default),
    };

    let configured = match registry::find(installations, name) {
        Some(installation) => installation,
        None => {
            log::debug!("No installation named '{}', using the default command", name);
            return Ok(Resolution::Default);
        }
    };

    let installation = configured.for_node(node).for_environment(env);
    let response = node.call(NodeRequest::LocateExecutable {
        home: installation.home().to_string(),
    })?;

    match response {
        NodeResponse::Executable { path, exists: true } => {
            log::debug!("Resolved installation '{}' to {:?}", name, path);
            Ok(Resolution::Installed {
                installation,
                executable: path,
            })
        }
        NodeResponse::Executable { path, exists: false } => Err(Error::ExecutableNotFound {
            installation: name.to_string(),
            path,
            node: node.name().to_string(),
        }),
    }
}
