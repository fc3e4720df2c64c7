//! Script execution for skills
//!
//! Scripts are spawned directly (no shell) from their confined path. The
//! caller gets a [`ScriptHandle`] immediately; the child is driven by a
//! spawned task and its outcome delivered once over a oneshot channel.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};
use std::task::{Context, Poll};
use std::time::Instant;

use tokio::process::Command;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Result, SkillError};

/// Placeholder replaced with the skill's absolute directory inside script arguments
pub const SKILL_DIR_PLACEHOLDER: &str = "${SKILL_DIR}";

/// Output of a script that exited with code 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error (scripts may log here even on success)
    pub stderr: String,
}

/// Replace every occurrence of [`SKILL_DIR_PLACEHOLDER`] in each argument.
///
/// Expanded arguments are not checked against the skill directory; a value
/// such as `${SKILL_DIR}/../x` reaches the script as-is.
#[must_use]
pub fn substitute_placeholder(args: &[String], skill_dir: &Path) -> Vec<String> {
    let dir = skill_dir.to_string_lossy();
    args.iter()
        .map(|arg| arg.replace(SKILL_DIR_PLACEHOLDER, &dir))
        .collect()
}

/// Handle to a running script; await it for the outcome.
///
/// Dropping the handle does not stop the script.
#[derive(Debug)]
pub struct ScriptHandle {
    run_id: Uuid,
    script: String,
    receiver: oneshot::Receiver<Result<ScriptOutput>>,
}

impl ScriptHandle {
    /// Identifier attached to this run's log lines
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Script path as requested by the caller
    #[must_use]
    pub fn script(&self) -> &str {
        &self.script
    }
}

impl Future for ScriptHandle {
    type Output = Result<ScriptOutput>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let polled = Pin::new(&mut self.receiver).poll(cx);
        match polled {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Err(SkillError::ScriptAborted(self.script.clone()))),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Spawn `program` with `args`, inheriting the caller's working directory.
///
/// Fails with [`SkillError::Spawn`] outside a Tokio runtime.
pub(crate) fn spawn(program: PathBuf, args: Vec<String>, script: &str) -> Result<ScriptHandle> {
    let runtime = Handle::try_current().map_err(|e| SkillError::Spawn {
        script: script.to_string(),
        source: io::Error::other(e),
    })?;
    let run_id = Uuid::new_v4();

    let child = Command::new(&program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| SkillError::Spawn {
            script: script.to_string(),
            source,
        })?;

    info!(
        run_id = %run_id,
        script = %program.display(),
        args = args.len(),
        "Started skill script"
    );

    let (sender, receiver) = oneshot::channel();
    let label = script.to_string();
    let started = Instant::now();

    runtime.spawn(async move {
        let outcome = match child.wait_with_output().await {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                info!(
                    run_id = %run_id,
                    status = %output.status,
                    elapsed_ms = started.elapsed().as_millis(),
                    "Skill script finished"
                );
                frame_outcome(output.status, stdout, stderr)
            }
            Err(source) => {
                warn!(run_id = %run_id, "Failed to collect script output: {}", source);
                Err(SkillError::Io {
                    path: label,
                    source,
                })
            }
        };
        // The receiver may have been dropped; the script still ran to completion.
        let _ = sender.send(outcome);
    });

    Ok(ScriptHandle {
        run_id,
        script: script.to_string(),
        receiver,
    })
}

/// Turn an exit status and captured streams into the reported outcome
fn frame_outcome(status: ExitStatus, stdout: String, stderr: String) -> Result<ScriptOutput> {
    if status.success() {
        return Ok(ScriptOutput { stdout, stderr });
    }

    let mut message = describe_failure(status);
    if !stderr.trim().is_empty() {
        message.push('\n');
        message.push_str(stderr.trim_end());
    }

    Err(SkillError::ScriptFailure { message, stderr })
}

fn describe_failure(status: ExitStatus) -> String {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("Script terminated by signal {signal}");
        }
    }

    match status.code() {
        Some(code) => format!("Script exited with code {code}"),
        None => format!("Script failed: {status}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_placeholder() {
        let args = vec!["--out".to_string(), "${SKILL_DIR}/out.txt".to_string()];
        let expanded = substitute_placeholder(&args, Path::new("/skills/foo"));
        assert_eq!(expanded, vec!["--out", "/skills/foo/out.txt"]);
    }

    #[test]
    fn test_substitute_every_occurrence() {
        let args = vec!["${SKILL_DIR}:${SKILL_DIR}".to_string(), "$SKILL_DIR".to_string()];
        let expanded = substitute_placeholder(&args, Path::new("/s"));
        assert_eq!(expanded, vec!["/s:/s", "$SKILL_DIR"]);
    }

    #[test]
    fn test_expanded_arguments_are_not_confined() {
        let args = vec!["${SKILL_DIR}/../../etc/passwd".to_string()];
        let expanded = substitute_placeholder(&args, Path::new("/skills/foo"));
        assert_eq!(expanded, vec!["/skills/foo/../../etc/passwd"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_frame_exit_code() {
        use std::os::unix::process::ExitStatusExt;
        let err = frame_outcome(
            ExitStatus::from_raw(2 << 8),
            String::new(),
            "boom\n".to_string(),
        )
        .unwrap_err();
        match err {
            SkillError::ScriptFailure { message, stderr } => {
                assert_eq!(message, "Script exited with code 2\nboom");
                assert_eq!(stderr, "boom\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_frame_signal() {
        use std::os::unix::process::ExitStatusExt;
        let err = frame_outcome(ExitStatus::from_raw(9), String::new(), String::new()).unwrap_err();
        assert_eq!(err.to_string(), "Script terminated by signal 9");
    }

    #[cfg(unix)]
    #[test]
    fn test_frame_success_keeps_streams() {
        use std::os::unix::process::ExitStatusExt;
        let output = frame_outcome(ExitStatus::from_raw(0), "ok\n".into(), "note\n".into()).unwrap();
        assert_eq!(output.stdout, "ok\n");
        assert_eq!(output.stderr, "note\n");
    }
}
