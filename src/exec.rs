//! Bounded, cancellable execution of external commands.
//!
//! Every `git` invocation goes through [`run`]. The child is polled until it
//! exits, its deadline passes, or the caller's [`CancelToken`] trips. On unix
//! the child leads its own process group. A child that has to be stopped gets
//! SIGTERM sent to that group first, and the group is force-killed once the
//! grace window is over, so helpers git started go with it. stdout/stderr are
//! drained on helper threads so a child writing more than a pipe buffer never
//! stalls.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::GitError;

/// How often a running child is polled for exit, deadline and cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Shared cancellation flag. Cloning shares the flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the token. Every in-flight and future [`run`] observing it stops its child.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Captured result of a finished child process.
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Run `cmd` to completion within `timeout`.
///
/// `label` names the command in errors (e.g. `"status"`). stdin is closed,
/// stdout/stderr are captured and decoded lossily.
pub fn run(
    cmd: &mut Command,
    label: &str,
    timeout: Duration,
    grace: Duration,
    cancel: &CancelToken,
) -> Result<ProcessOutput, GitError> {
    if cancel.is_cancelled() {
        return Err(GitError::Cancelled);
    }

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let program = cmd.get_program().to_string_lossy().into_owned();
    let mut child = cmd
        .spawn()
        .map_err(|source| GitError::Spawn { program: program.clone(), source })?;

    let pid = child.id();
    debug!(pid, command = label, "Spawned process");

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if cancel.is_cancelled() {
            warn!(pid, command = label, "Cancelled, terminating process");
            terminate(&mut child, grace);
            return Err(GitError::Cancelled);
        }
        if Instant::now() >= deadline {
            warn!(pid, command = label, timeout_ms = timeout.as_millis() as u64, "Deadline passed, terminating process");
            terminate(&mut child, grace);
            return Err(GitError::Timeout {
                command: label.to_string(),
                secs: timeout.as_secs(),
            });
        }
        thread::sleep(POLL_INTERVAL);
    };

    // Reader threads finish once the child's pipe ends close. On the stop
    // paths above they are left detached: a grandchild may still hold the pipes.
    let stdout = collect(stdout);
    let stderr = collect(stderr);

    debug!(pid, command = label, code = status.code(), "Process exited");

    Ok(ProcessOutput { status, stdout, stderr })
}

/// SIGTERM to the child's process group, wait up to `grace`, then SIGKILL
/// the group. Always reaps the child.
fn terminate(child: &mut Child, grace: Duration) {
    #[cfg(unix)]
    {
        let pid = child.id();
        signal_group(pid, "TERM");

        let deadline = Instant::now() + grace;
        let mut exited = false;
        while Instant::now() < deadline {
            if let Ok(Some(_)) = child.try_wait() {
                exited = true;
                break;
            }
            thread::sleep(POLL_INTERVAL);
        }
        if !exited {
            warn!(pid, grace_ms = grace.as_millis() as u64, "Process ignored SIGTERM, killing");
        }
        // Members that outlived the leader still hold the group id.
        signal_group(pid, "KILL");
    }
    #[cfg(not(unix))]
    let _ = grace;

    let _ = child.kill();
    let _ = child.wait();
}

/// `kill -<signal> -- -<pgid>`. The group id is the leader's pid.
#[cfg(unix)]
fn signal_group(pgid: u32, signal: &str) {
    let _ = Command::new("kill")
        .arg(format!("-{}", signal))
        .arg("--")
        .arg(format!("-{}", pgid))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}
