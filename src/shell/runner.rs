use std::io;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::shell::invocation::Invocation;
use crate::shell::quote::sh_quote;

/// Everything a finished command printed, and how it exited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// `None` if the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr, the way a terminal would interleave them at exit
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) if self.stdout.ends_with('\n') => format!("{}{}", self.stdout, self.stderr),
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
        }
    }

    /// Short human readable reason for a failed command
    pub fn failure_reason(&self) -> String {
        let stderr = self.stderr.trim();
        match (self.code, stderr.is_empty()) {
            (Some(code), true) => format!("exit code {}", code),
            (None, true) => "terminated by signal".to_string(),
            (_, false) => stderr.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Can't start {program}: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("{program} did not finish within {limit:?}")]
    TimedOut { program: String, limit: Duration },

    #[error("I/O error talking to {program}: {source}")]
    Io { program: String, source: io::Error },
}

/// Runs one external command to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<CapturedOutput, RunError>;
}

/// Spawns real child processes
///
/// Each invocation can be bounded by `timeout`. Children run in their own process group and
/// the whole group is killed on a timeout, pipes included.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(timeout: Option<Duration>) -> ProcessRunner {
        ProcessRunner { timeout }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CapturedOutput, RunError> {
        let program = invocation.program.clone();
        debug!("Running {}", invocation);

        let stdin = match invocation.stdin {
            Some(_) => Stdio::piped(),
            None => Stdio::null(),
        };
        let mut command = std::process::Command::new(&invocation.program);
        // own process group, so a timeout can take down every stage of a pipeline
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut command, 0);
        let mut child = Command::from(command)
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunError::Spawn { program: program.clone(), source })?;

        if let (Some(input), Some(mut pipe)) = (&invocation.stdin, child.stdin.take()) {
            pipe.write_all(input.as_bytes()).await
                .map_err(|source| RunError::Io { program: program.clone(), source })?;
            // dropping the pipe sends EOF
        }

        let group = child.id();
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output,
                Err(_) => {
                    if let Some(group) = group {
                        kill_group(group);
                    }
                    return Err(RunError::TimedOut { program, limit });
                }
            },
            None => child.wait_with_output().await,
        }.map_err(|source| RunError::Io { program: program.clone(), source })?;

        Ok(CapturedOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// SIGKILL every process in the group led by `leader`
#[cfg(unix)]
fn kill_group(leader: u32) {
    let Ok(pgid) = libc::pid_t::try_from(leader) else { return };
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } != 0 {
        debug!("killpg({}) failed: {}", pgid, io::Error::last_os_error());
    }
}

#[cfg(not(unix))]
fn kill_group(_leader: u32) {}

/// Logs what would run and reports success without running anything
#[derive(Debug, Clone, Default)]
pub struct DryRunRunner;

#[async_trait]
impl CommandRunner for DryRunRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CapturedOutput, RunError> {
        info!("--dry-run set, not running: {}", invocation);
        Ok(CapturedOutput { code: Some(0), ..Default::default() })
    }
}

/// Is `tool` installed and on PATH?
pub async fn tool_available(runner: &dyn CommandRunner, tool: &str) -> bool {
    let probe = Invocation::shell(&format!("command -v {}", sh_quote(tool)));
    matches!(runner.run(&probe).await, Ok(output) if output.success())
}
