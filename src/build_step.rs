//! The Gradle build step: resolve the installation, assemble the command,
//! run it, and report pass/fail to the pipeline.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::command::gradle_command::{self, CommandSpec, HOME_VARIABLE};
use crate::descriptor::GradleDescriptor;
use crate::installation::registry;
use crate::installation::resolver::{self, Resolution};
use crate::installation::Installation;
use crate::launcher::{Invocation, Launcher};
use crate::listener::TaskListener;
use crate::node::Node;
use crate::pipeline::Build;

/// Settings of one Gradle step, as bound from the job configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradleStep {
    pub description: Option<String>,
    /// Free-text command line switches; macros are expanded.
    pub switches: String,
    /// Free-text task list; taken literally.
    pub tasks: String,
    /// Working directory relative to the module root.
    pub root_build_script_dir: Option<String>,
    /// Passed as `-b <file>`.
    pub build_file: Option<String>,
    /// Installation to use; unset means `gradle` from `PATH`.
    pub gradle_name: Option<String>,
}

impl GradleStep {
    /// Configured installation this step names, if it exists.
    pub fn installation(&self, descriptor: &GradleDescriptor) -> Option<Installation> {
        let name = self.gradle_name.as_deref()?;
        registry::find(&descriptor.installations(), name).cloned()
    }

    /// Runs the step. Returns `true` only when Gradle exited with code 0;
    /// every failure is reported on `listener` first.
    pub fn perform(
        &self,
        build: &Build,
        descriptor: &GradleDescriptor,
        node: &dyn Node,
        launcher: &dyn Launcher,
        listener: &mut dyn TaskListener,
    ) -> bool {
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            log::info!("Running Gradle step: {}", description);
        }

        let mut env = build.environment.clone();
        let installations = descriptor.installations();
        let resolution = match resolver::resolve(&installations, self.gradle_name.as_deref(), node, &env) {
            Ok(resolution) => resolution,
            Err(e) => {
                log::error!("Could not resolve Gradle installation: {}", e);
                listener.fatal_error(&e.to_string());
                return false;
            }
        };

        // Set before expansion so `${GRADLE_HOME}` in the build file or
        // working directory names the resolved installation.
        if let Resolution::Installed { installation, .. } = &resolution {
            env.put(HOME_VARIABLE, installation.home());
        }

        let windows = !node.is_unix();
        let executable = resolution.executable(windows);
        let args = gradle_command::build_arguments(&CommandSpec {
            executable: &executable,
            windows,
            switches: &self.switches,
            tasks: &self.tasks,
            build_file: self.build_file.as_deref(),
            environment: &env,
            build_variables: &build.build_variables,
        });
        let working_dir = gradle_command::working_directory(
            self.root_build_script_dir.as_deref(),
            &env,
            &build.build_variables,
            &build.module_root,
        );

        let invocation = Invocation::new(args, env, working_dir);
        match launcher.launch(&invocation, listener) {
            Ok(code) => {
                log::info!("Gradle exited with code {}", code);
                code == 0
            }
            Err(e) => {
                log::error!("Gradle launch failed: {}", e);
                let out = listener.fatal_error("command execution failed");
                if let Err(write_err) = writeln!(out, "{} ({:?})", e, e.kind()) {
                    log::warn!("Could not write to job log: {}", write_err);
                }
                false
            }
        }
    }
}
