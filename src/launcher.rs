//! Process invocation: runs the assembled command and pipes its output into
//! the job log while waiting for it to exit.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use crossbeam_channel::Sender;

use crate::command::ArgumentList;
use crate::env_vars::EnvVars;
use crate::listener::TaskListener;

/// Where the child's stderr goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StderrMode {
    /// Interleaved into the job log with stdout.
    #[default]
    Merge,
    /// Left on this process's stderr.
    Inherit,
    Discard,
}

/// A fully prepared child process.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub args: ArgumentList,
    pub env: EnvVars,
    pub working_dir: PathBuf,
    pub stderr: StderrMode,
}

impl Invocation {
    pub fn new(args: ArgumentList, env: EnvVars, working_dir: PathBuf) -> Self {
        Invocation {
            args,
            env,
            working_dir,
            stderr: StderrMode::default(),
        }
    }
}

pub trait Launcher {
    /// Runs `invocation` to completion and returns its exit code. `Err`
    /// means the process could not be started (or its output not relayed).
    fn launch(&self, invocation: &Invocation, listener: &mut dyn TaskListener) -> io::Result<i32>;
}

/// Launches processes on this machine.
#[derive(Debug, Default)]
pub struct LocalLauncher;

impl LocalLauncher {
    pub fn new() -> Self {
        LocalLauncher
    }
}

impl Launcher for LocalLauncher {
    fn launch(&self, invocation: &Invocation, listener: &mut dyn TaskListener) -> io::Result<i32> {
        let (program, args) = invocation.args.as_slice().split_first().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "empty command line")
        })?;

        writeln!(
            listener.logger(),
            "[{}] $ {}",
            invocation.working_dir.display(),
            invocation.args
        )?;
        log::debug!("Launching {} in {:?}", program, invocation.working_dir);

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(&invocation.working_dir)
            .env_clear()
            .envs(invocation.env.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::piped());
        cmd.stderr(match invocation.stderr {
            StderrMode::Merge => Stdio::piped(),
            StderrMode::Inherit => Stdio::inherit(),
            StderrMode::Discard => Stdio::null(),
        });

        let mut child = cmd.spawn()?;

        let (tx, rx) = crossbeam_channel::unbounded();
        let mut pumps = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            pumps.push(pump(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            pumps.push(pump(stderr, tx.clone()));
        }
        drop(tx);

        // Keep draining after a log write failure so the child never blocks
        // on a full pipe.
        let logger = listener.logger();
        let mut write_error = None;
        for chunk in rx.iter() {
            if write_error.is_none() {
                if let Err(e) = logger.write_all(&chunk) {
                    write_error = Some(e);
                }
            }
        }
        for handle in pumps {
            if handle.join().is_err() {
                log::warn!("Output reader thread for {} panicked", program);
            }
        }

        let status = child.wait()?;
        if let Some(e) = write_error {
            return Err(e);
        }
        logger.flush()?;

        let code = exit_code(status);
        log::debug!("{} exited with code {}", program, code);
        Ok(code)
    }
}

fn pump<R: Read + Send + 'static>(mut reader: R, tx: Sender<Vec<u8>>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut buf = [0u8; 8192];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("Failed reading child output: {}", e);
                    break;
                }
            }
        }
    })
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => {
            log::warn!("Process terminated by signal {}", signal);
            128 + signal
        }
        (None, None) => -1,
    }
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
