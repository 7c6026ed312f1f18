use clap::Parser;
use std::fs;
use std::path::PathBuf;

use crate::build_step::GradleStep;
use crate::env_vars::BuildVariables;
use crate::node::LocalNode;
use crate::Error;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Installation registry file (TOML)
    #[clap(long, value_parser, default_value = "gradle-installations.toml")]
    pub installations: PathBuf,

    /// Legacy JSON configuration to import when the registry file does not exist yet
    #[clap(long, value_parser)]
    pub legacy_config: Option<PathBuf>,

    /// Add an installation to the registry and save it
    #[clap(long, value_name = "NAME=HOME", value_parser = parse_key_val)]
    pub register: Vec<(String, String)>,

    /// Print the configured installations
    #[clap(long)]
    pub list_installations: bool,

    /// Step definition file (TOML); the flags below override its values
    #[clap(long, value_parser)]
    pub step: Option<PathBuf>,

    /// Name of the installation to use (default: `gradle` from PATH)
    #[clap(long)]
    pub gradle_name: Option<String>,

    /// Gradle command line switches
    #[clap(long, allow_hyphen_values = true)]
    pub switches: Option<String>,

    /// Gradle tasks to run
    #[clap(long, allow_hyphen_values = true)]
    pub tasks: Option<String>,

    /// Build file, passed to Gradle as `-b`
    #[clap(long)]
    pub build_file: Option<String>,

    /// Directory to run Gradle in, relative to the workspace
    #[clap(long)]
    pub root_build_script_dir: Option<String>,

    /// Free-text description of the step
    #[clap(long)]
    pub description: Option<String>,

    /// Module root of the checked-out project
    #[clap(short, long, value_parser, default_value = ".")]
    pub workspace: PathBuf,

    /// Build variable, passed to Gradle as `-DKEY=VALUE`
    #[clap(short = 'D', long = "build-var", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub build_vars: Vec<(String, String)>,

    /// Name of this node in diagnostics
    #[clap(long, default_value = "built-in")]
    pub node_name: String,

    /// Home override for an installation on this node
    #[clap(long = "tool-location", value_name = "NAME=HOME", value_parser = parse_key_val)]
    pub tool_locations: Vec<(String, String)>,
}

impl AppConfig {
    pub fn new() -> Self {
        AppConfig::parse()
    }

    /// Whether anything describes a Gradle step to run.
    pub fn has_step(&self) -> bool {
        self.step.is_some() || self.tasks.is_some() || self.switches.is_some()
    }

    /// Step from `--step` (if given) with the individual flags applied on top.
    pub fn step_definition(&self) -> Result<GradleStep, Error> {
        let mut step = match &self.step {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("Failed to read step definition {:?}: {}", path, e))
                })?;
                toml::from_str(&text)?
            }
            None => GradleStep::default(),
        };

        if let Some(v) = &self.description {
            step.description = Some(v.clone());
        }
        if let Some(v) = &self.switches {
            step.switches = v.clone();
        }
        if let Some(v) = &self.tasks {
            step.tasks = v.clone();
        }
        if let Some(v) = &self.root_build_script_dir {
            step.root_build_script_dir = Some(v.clone());
        }
        if let Some(v) = &self.build_file {
            step.build_file = Some(v.clone());
        }
        if let Some(v) = &self.gradle_name {
            step.gradle_name = Some(v.clone());
        }
        Ok(step)
    }

    pub fn build_variables(&self) -> BuildVariables {
        self.build_vars.iter().cloned().collect()
    }

    pub fn node(&self) -> LocalNode {
        self.tool_locations
            .iter()
            .fold(LocalNode::new(self.node_name.clone()), |node, (name, home)| {
                node.with_tool_location(name.clone(), home.clone())
            })
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", s))?;
    if key.is_empty() {
        return Err(format!("empty key in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn parse(args: &[&str]) -> AppConfig {
        AppConfig::try_parse_from(std::iter::once("gradle_runner").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_build_a_step() {
        let config = parse(&[
            "--gradle-name", "8.5",
            "--switches", "--info --stacktrace",
            "--tasks", "clean build",
            "-D", "release=true",
            "--build-var", "channel=beta",
        ]);
        assert!(config.has_step());
        let step = config.step_definition().unwrap();
        assert_eq!(step.switches, "--info --stacktrace");
        assert_eq!(step.gradle_name.as_deref(), Some("8.5"));
        assert_eq!(
            config.build_variables().into_iter().collect::<Vec<_>>(),
            vec![
                ("channel".to_string(), "beta".to_string()),
                ("release".to_string(), "true".to_string())
            ]
        );
    }

    #[test]
    fn flags_override_step_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("step.toml");
        fs::write(&path, "tasks = \"build\"\nswitches = \"--offline\"\ngradleName = \"7.6\"\n").unwrap();

        let config = parse(&["--step", path.to_str().unwrap(), "--tasks", "test"]);
        let step = config.step_definition().unwrap();
        assert_eq!(step.tasks, "test");
        assert_eq!(step.switches, "--offline");
        assert_eq!(step.gradle_name.as_deref(), Some("7.6"));
    }

    #[test]
    fn unreadable_step_file_is_a_config_error() {
        let config = parse(&["--step", "/nonexistent/step.toml"]);
        assert!(matches!(config.step_definition(), Err(Error::Config(_))));
    }

    #[test]
    fn node_carries_tool_locations() {
        let config = parse(&["--node-name", "agent-7", "--tool-location", "8.5=/mnt/gradle"]);
        let node = config.node();
        assert_eq!(node.name(), "agent-7");
        assert_eq!(node.tool_location("8.5").as_deref(), Some("/mnt/gradle"));
        assert!(!config.has_step());
    }

    #[test]
    fn key_value_parsing() {
        assert_eq!(parse_key_val("a=b=c"), Ok(("a".to_string(), "b=c".to_string())));
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }
}
