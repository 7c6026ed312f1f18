//! Machines a step can run on.
//!
//! Installations may only exist on the node that runs the step, so anything
//! touching the node's file system is phrased as a [`NodeRequest`] and
//! executed by the node itself through [`Node::call`]. Requests and responses
//! are serializable so an agent on another machine can answer them.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::env_vars::EnvVars;
use crate::installation;
use crate::Error;

/// Work executed on the node's side of the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeRequest {
    /// Find the tool executable under `home` (macros expanded against the
    /// node's own environment).
    LocateExecutable { home: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeResponse {
    Executable { path: PathBuf, exists: bool },
}

pub trait Node {
    fn name(&self) -> &str;

    /// `false` for Windows-family machines.
    fn is_unix(&self) -> bool;

    /// Node-local home override for the named installation, if any.
    fn tool_location(&self, installation: &str) -> Option<String>;

    /// Executes `request` on the node and returns its answer.
    fn call(&self, request: NodeRequest) -> Result<NodeResponse, Error>;
}

/// Answers a request in the current process. Agents call this with their
/// own platform and environment.
pub fn handle_request(request: NodeRequest, is_unix: bool, env: &EnvVars) -> NodeResponse {
    match request {
        NodeRequest::LocateExecutable { home } => {
            let home = env.expand(&home);
            let path = installation::executable_path(&home, is_unix);
            let exists = path.is_file();
            log::debug!("Executable {:?} exists: {}", path, exists);
            NodeResponse::Executable { path, exists }
        }
    }
}

/// The machine this process runs on.
#[derive(Debug, Clone)]
pub struct LocalNode {
    name: String,
    tool_locations: BTreeMap<String, String>,
}

impl LocalNode {
    pub fn new(name: impl Into<String>) -> Self {
        LocalNode {
            name: name.into(),
            tool_locations: BTreeMap::new(),
        }
    }

    pub fn with_tool_location(mut self, installation: impl Into<String>, home: impl Into<String>) -> Self {
        self.tool_locations.insert(installation.into(), home.into());
        self
    }
}

impl Default for LocalNode {
    fn default() -> Self {
        LocalNode::new("built-in")
    }
}

impl Node for LocalNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_unix(&self) -> bool {
        !cfg!(windows)
    }

    fn tool_location(&self, installation: &str) -> Option<String> {
        self.tool_locations.get(installation).cloned()
    }

    fn call(&self, request: NodeRequest) -> Result<NodeResponse, Error> {
        Ok(handle_request(request, self.is_unix(), &EnvVars::from_process()))
    }
}
