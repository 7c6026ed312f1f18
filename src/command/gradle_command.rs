use std::path::{Path, PathBuf};

use super::ArgumentList;
use crate::env_vars::{BuildVariables, EnvVars};
use crate::utils::macros::{is_blank, normalize_whitespace, replace_macro};

/// Name of the tool and of its home environment variable.
pub const TOOL_NAME: &str = "gradle";
pub const HOME_VARIABLE: &str = "GRADLE_HOME";

/// Everything the builder needs to assemble one invocation.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec<'a> {
    /// Resolved executable path, or the bare default name.
    pub executable: &'a str,
    pub windows: bool,
    pub switches: &'a str,
    pub tasks: &'a str,
    pub build_file: Option<&'a str>,
    pub environment: &'a EnvVars,
    pub build_variables: &'a BuildVariables,
}

/// Bare command used when no installation is configured; found via `PATH`.
pub fn default_executable(windows: bool) -> &'static str {
    if windows {
        "gradle.bat"
    } else {
        TOOL_NAME
    }
}

/// Assembles the argument vector in its fixed order: executable, `-D`
/// definitions, switches, tasks, `-b <file>`, then the `cmd.exe` wrapper on
/// Windows.
pub fn build_arguments(spec: &CommandSpec<'_>) -> ArgumentList {
    let switches = normalize_whitespace(spec.switches);
    let switches = replace_macro(&switches, spec.environment);
    let switches = replace_macro(&switches, spec.build_variables);

    // Tasks only get whitespace normalization, no macro expansion.
    let tasks = normalize_whitespace(spec.tasks);

    let mut args = ArgumentList::new();
    args.add(spec.executable);
    args.add_key_value_pairs("-D", spec.build_variables);
    args.add_tokenized(&switches);
    args.add_tokenized(&tasks);

    if let Some(build_file) = spec.build_file.filter(|f| !is_blank(Some(*f))) {
        args.add("-b");
        args.add(spec.environment.expand(build_file.trim()));
    }

    if spec.windows {
        // A batch file run directly loses its exit code; cmd.exe re-exits
        // with ERRORLEVEL expanded after the batch file finishes.
        args.prepend(["cmd.exe", "/C"]);
        args.add_all(["&&", "exit", "%%ERRORLEVEL%%"]);
    }

    log::debug!("Assembled {} arguments: {}", args.len(), args);
    args
}

/// Directory the tool runs in: `root_build_script_dir` (macro-expanded
/// against the environment, then the build variables) relative to
/// `module_root`, or `module_root` itself when unset or blank.
pub fn working_directory(
    root_build_script_dir: Option<&str>,
    environment: &EnvVars,
    build_variables: &BuildVariables,
    module_root: &Path,
) -> PathBuf {
    match root_build_script_dir {
        Some(dir) if !is_blank(Some(dir)) => {
            let dir = environment.expand(dir.trim());
            let dir = replace_macro(&dir, build_variables);
            module_root.join(dir)
        }
        _ => module_root.to_path_buf(),
    }
}
