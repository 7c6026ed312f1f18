//! `gradle_runner` runs Gradle as one step of a larger CI job. It picks the
//! Gradle installation to use (by name, adjusted for the node and the job's
//! environment), assembles the command line from the step's switches, tasks
//! and build file, launches the tool, streams its output into the job log and
//! turns the exit code into a pass/fail result.
//!
//! ## Features
//! - Named installations kept in a TOML registry, with a one-time import of
//!   legacy JSON configuration.
//! - Per-node home overrides and `${VAR}` expansion of installation homes.
//! - Existence of the executable checked on the node that will run it.
//! - `cmd.exe /C ... && exit %%ERRORLEVEL%%` wrapping on Windows nodes so the
//!   batch file's exit code is preserved.
//!
//! ## Usage (CLI)
//! ```bash
//! gradle_runner --gradle-name 8.5 --tasks "clean build" --switches "--info" \
//!     --workspace /path/to/checkout -D release=true
//! ```

pub mod app_config;
pub mod build_step;
pub mod command;
pub mod descriptor;
pub mod env_vars;
pub mod installation;
pub mod launcher;
pub mod listener;
pub mod node;
pub mod pipeline;
pub mod utils;

use std::path::PathBuf;

use app_config::AppConfig;
use descriptor::GradleDescriptor;
use env_vars::EnvVars;
use installation::store::InstallationStore;
use installation::Installation;
use launcher::LocalLauncher;
use listener::StreamListener;
use pipeline::Build;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Failed to parse TOML: {0}")]
    TomlRead(#[from] toml::de::Error),
    #[error("Failed to write TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Gradle installation '{installation}' has no executable at {path:?} on node '{node}'")]
    ExecutableNotFound {
        installation: String,
        path: PathBuf,
        node: String,
    },
    #[error("Node communication failed: {0}")]
    Channel(String),
}

/// Entry point of the command-line tool. Returns whether the Gradle step
/// passed; configuration problems are reported as `Err`.
pub fn run() -> Result<bool, Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init().ok();

    let config = AppConfig::new();
    log::debug!("Using configuration: {:?}", config);

    let store = InstallationStore::new(&config.installations);
    let descriptor = GradleDescriptor::load(store, config.legacy_config.as_deref())?;

    if !config.register.is_empty() {
        let mut installations = descriptor.installations().to_vec();
        installations.extend(
            config
                .register
                .iter()
                .map(|(name, home)| Installation::new(name.clone(), home.clone())),
        );
        descriptor.set_installations(installations)?;
    }

    if config.list_installations {
        println!("{}:", descriptor.display_name());
        for installation in descriptor.installations().iter() {
            println!("  {}\t{}", installation.name(), installation.home());
        }
    }

    if !config.has_step() {
        if config.register.is_empty() && !config.list_installations {
            return Err(Error::Config(
                "Nothing to do: pass --step, --tasks or --switches to run Gradle.".to_string(),
            ));
        }
        return Ok(true);
    }

    if !config.workspace.is_dir() {
        return Err(Error::Config(format!(
            "Workspace {:?} does not exist or is not a directory.",
            config.workspace
        )));
    }
    let module_root = config.workspace.canonicalize()?;

    let step = config.step_definition()?;
    let mut environment = EnvVars::from_process();
    if environment.get("WORKSPACE").is_none() {
        environment.put("WORKSPACE", module_root.to_string_lossy());
    }
    let build = Build {
        environment,
        build_variables: config.build_variables(),
        module_root,
    };

    let node = config.node();
    let launcher = LocalLauncher::new();
    let mut listener = StreamListener::stdout();

    Ok(step.perform(&build, &descriptor, &node, &launcher, &mut listener))
}
