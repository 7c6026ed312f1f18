//! Per-execution context the pipeline hands to a build step.

use std::path::PathBuf;

use crate::env_vars::{BuildVariables, EnvVars};

/// One run of a pipeline as seen by a step.
#[derive(Debug, Clone, Default)]
pub struct Build {
    /// Environment variables for the step
    pub environment: EnvVars,
    /// Build-scoped variables, passed to the tool as `-D` definitions
    pub build_variables: BuildVariables,
    /// Checked-out module root; default working directory
    pub module_root: PathBuf,
}
