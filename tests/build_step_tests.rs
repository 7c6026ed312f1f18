use std::cell::RefCell;
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use gradle_runner::build_step::GradleStep;
use gradle_runner::descriptor::GradleDescriptor;
use gradle_runner::env_vars::EnvVars;
use gradle_runner::installation::{executable_path, Installation};
use gradle_runner::launcher::{Invocation, Launcher};
use gradle_runner::listener::{StreamListener, TaskListener};
use gradle_runner::node::{Node, NodeRequest, NodeResponse};
use gradle_runner::pipeline::Build;
use gradle_runner::Error;

struct FakeNode {
    unix: bool,
    files: HashSet<PathBuf>,
}

impl FakeNode {
    fn unix(files: &[&str]) -> Self {
        FakeNode { unix: true, files: files.iter().map(PathBuf::from).collect() }
    }

    fn windows(files: &[&str]) -> Self {
        FakeNode { unix: false, files: files.iter().map(PathBuf::from).collect() }
    }
}

impl Node for FakeNode {
    fn name(&self) -> &str {
        "agent-1"
    }

    fn is_unix(&self) -> bool {
        self.unix
    }

    fn tool_location(&self, _installation: &str) -> Option<String> {
        None
    }

    fn call(&self, request: NodeRequest) -> Result<NodeResponse, Error> {
        let NodeRequest::LocateExecutable { home } = request;
        let path = executable_path(&home, self.unix);
        let exists = self.files.contains(&path);
        Ok(NodeResponse::Executable { path, exists })
    }
}

/// Records what it was asked to run and answers with a fixed outcome.
struct RecordingLauncher {
    outcome: Box<dyn Fn() -> io::Result<i32>>,
    launched: RefCell<Vec<Invocation>>,
}

impl RecordingLauncher {
    fn exiting_with(code: i32) -> Self {
        RecordingLauncher { outcome: Box::new(move || Ok(code)), launched: RefCell::new(Vec::new()) }
    }

    fn failing_to_start() -> Self {
        RecordingLauncher {
            outcome: Box::new(|| Err(io::Error::new(io::ErrorKind::NotFound, "gradle: not found"))),
            launched: RefCell::new(Vec::new()),
        }
    }

    fn only_invocation(&self) -> Invocation {
        let launched = self.launched.borrow();
        assert_eq!(launched.len(), 1, "expected exactly one launch");
        launched[0].clone()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, invocation: &Invocation, listener: &mut dyn TaskListener) -> io::Result<i32> {
        self.launched.borrow_mut().push(invocation.clone());
        writeln!(listener.logger(), "BUILD OUTPUT")?;
        (self.outcome)()
    }
}

fn build() -> Build {
    let mut build = Build {
        environment: [("TOOLS", "/opt"), ("BRANCH", "main")].into_iter().collect::<EnvVars>(),
        module_root: PathBuf::from("/ws/project"),
        ..Build::default()
    };
    build.build_variables.insert("release".to_string(), "true".to_string());
    build
}

fn descriptor() -> GradleDescriptor {
    GradleDescriptor::new(vec![
        Installation::new("4.0", "/opt/gradle-4.0/"),
        Installation::new("templated", "${TOOLS}/gradle-8.5"),
        Installation::new("broken", "/opt/gone"),
    ])
}

fn step(name: Option<&str>, switches: &str, tasks: &str) -> GradleStep {
    GradleStep {
        gradle_name: name.map(str::to_string),
        switches: switches.to_string(),
        tasks: tasks.to_string(),
        ..GradleStep::default()
    }
}

#[test]
fn runs_named_installation_with_full_command_line() {
    let node = FakeNode::unix(&["/opt/gradle-4.0/bin/gradle"]);
    let launcher = RecordingLauncher::exiting_with(0);
    let mut listener = StreamListener::default();
    let mut step = step(Some("4.0"), "--info\n-Pbranch=${BRANCH}", "clean\nbuild");
    step.build_file = Some("build.gradle".to_string());

    assert!(step.perform(&build(), &descriptor(), &node, &launcher, &mut listener));

    let invocation = launcher.only_invocation();
    assert_eq!(
        invocation.args.as_slice(),
        [
            "/opt/gradle-4.0/bin/gradle",
            "-Drelease=true",
            "--info",
            "-Pbranch=main",
            "clean",
            "build",
            "-b",
            "build.gradle"
        ]
    );
    assert_eq!(invocation.env.get("GRADLE_HOME"), Some("/opt/gradle-4.0"));
    assert_eq!(invocation.working_dir, Path::new("/ws/project"));
    assert_eq!(listener.text(), "BUILD OUTPUT\n");
}

#[test]
fn unknown_installation_falls_back_to_bare_command() {
    let node = FakeNode::unix(&[]);
    let unknown = RecordingLauncher::exiting_with(0);
    let unset = RecordingLauncher::exiting_with(0);

    assert!(step(Some("missing"), "", "build").perform(
        &build(),
        &descriptor(),
        &node,
        &unknown,
        &mut StreamListener::default()
    ));
    assert!(step(None, "", "build").perform(
        &build(),
        &descriptor(),
        &node,
        &unset,
        &mut StreamListener::default()
    ));

    let unknown = unknown.only_invocation();
    assert_eq!(unknown.args, unset.only_invocation().args);
    assert_eq!(unknown.args.as_slice()[0], "gradle");
    assert_eq!(unknown.env.get("GRADLE_HOME"), None);
}

#[test]
fn missing_executable_stops_before_launch() {
    let node = FakeNode::unix(&[]);
    let launcher = RecordingLauncher::exiting_with(0);
    let mut listener = StreamListener::default();

    assert!(!step(Some("broken"), "", "build").perform(&build(), &descriptor(), &node, &launcher, &mut listener));

    assert!(launcher.launched.borrow().is_empty());
    let log = listener.text();
    assert!(log.starts_with("FATAL: "), "log was: {}", log);
    assert!(log.contains("broken"));
}

#[test]
fn exit_code_decides_the_result() {
    let node = FakeNode::unix(&[]);
    let failing = RecordingLauncher::exiting_with(1);
    let mut listener = StreamListener::default();

    assert!(!step(None, "", "build").perform(&build(), &descriptor(), &node, &failing, &mut listener));
    // The tool's own output is the only diagnostic.
    assert_eq!(listener.text(), "BUILD OUTPUT\n");
}

#[test]
fn launch_error_is_fatal() {
    let node = FakeNode::unix(&[]);
    let launcher = RecordingLauncher::failing_to_start();
    let mut listener = StreamListener::default();

    assert!(!step(None, "", "build").perform(&build(), &descriptor(), &node, &launcher, &mut listener));
    let log = listener.text();
    assert!(log.contains("FATAL: command execution failed\n"));
    assert!(log.contains("gradle: not found"));
}

#[test]
fn windows_node_wraps_command_in_cmd_exe() {
    let node = FakeNode::windows(&[]);
    let launcher = RecordingLauncher::exiting_with(0);
    let mut step = step(None, "", "build");
    step.build_file = Some("build.gradle".to_string());

    assert!(step.perform(&build(), &descriptor(), &node, &launcher, &mut StreamListener::default()));
    assert_eq!(
        launcher.only_invocation().args.as_slice(),
        ["cmd.exe", "/C", "gradle.bat", "-Drelease=true", "build", "-b", "build.gradle", "&&", "exit", "%%ERRORLEVEL%%"]
    );
}

#[test]
fn templated_home_and_root_build_script_dir() {
    let node = FakeNode::unix(&["/opt/gradle-8.5/bin/gradle"]);
    let launcher = RecordingLauncher::exiting_with(0);
    let mut step = step(Some("templated"), "", "publish${BRANCH}");
    step.root_build_script_dir = Some(" sub/${BRANCH}/$release ".to_string());

    assert!(step.perform(&build(), &descriptor(), &node, &launcher, &mut StreamListener::default()));

    let invocation = launcher.only_invocation();
    assert_eq!(invocation.args.as_slice()[0], "/opt/gradle-8.5/bin/gradle");
    assert_eq!(invocation.args.as_slice()[2], "publish${BRANCH}");
    assert_eq!(invocation.env.get("GRADLE_HOME"), Some("/opt/gradle-8.5"));
    assert_eq!(invocation.working_dir, Path::new("/ws/project/sub/main/true"));
}

#[test]
fn registry_is_not_modified_by_specialization() {
    let node = FakeNode::unix(&["/opt/gradle-8.5/bin/gradle"]);
    let descriptor = descriptor();
    let launcher = RecordingLauncher::exiting_with(0);

    step(Some("templated"), "", "build").perform(&build(), &descriptor, &node, &launcher, &mut StreamListener::default());

    assert_eq!(descriptor.installations()[1].home(), "${TOOLS}/gradle-8.5");
}

#[test]
fn resolved_home_is_visible_to_build_file_and_working_directory() {
    let node = FakeNode::unix(&["/opt/gradle-4.0/bin/gradle"]);
    let launcher = RecordingLauncher::exiting_with(0);
    let mut build = build();
    build.build_variables.clear();
    build.environment.put("GRADLE_HOME", "/stale");
    let mut step = step(Some("4.0"), "", "build");
    step.build_file = Some("${GRADLE_HOME}/init.gradle".to_string());
    step.root_build_script_dir = Some("${GRADLE_HOME}".to_string());

    assert!(step.perform(&build, &descriptor(), &node, &launcher, &mut StreamListener::default()));

    let invocation = launcher.only_invocation();
    assert_eq!(
        invocation.args.as_slice(),
        ["/opt/gradle-4.0/bin/gradle", "build", "-b", "/opt/gradle-4.0/init.gradle"]
    );
    assert_eq!(invocation.working_dir, Path::new("/opt/gradle-4.0"));
    assert_eq!(invocation.env.get("GRADLE_HOME"), Some("/opt/gradle-4.0"));
}
