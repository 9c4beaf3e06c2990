//! Bounded external command execution.
//!
//! Every verification tool is invoked through [`run_command`], which
//! captures exit code, stdout, and stderr under a hard wall-clock ceiling.
//! Tool failure is not an error: a missing executable or a timeout is
//! converted into a synthetic non-zero exit with an explanatory stderr
//! message, so callers handle every tool identically and only the message
//! text distinguishes "tool reported failure" from "tool could not run".

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use camino::Utf8Path;
use tracing::{debug, instrument};

/// Wall-clock ceiling for a single external command.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

/// Poll interval while waiting for a child to exit.
const WAIT_POLL: Duration = Duration::from_millis(50);

/// Captured result of one external command.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code; synthetic `1` for environment faults, `-1` if killed by signal.
    pub exit_code: i32,
    /// Captured stdout.
    pub stdout: String,
    /// Captured stderr.
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the command exited zero.
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// The detail text a check should record: stderr if non-empty, else stdout.
    pub fn detail(&self) -> &str {
        if self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }

    /// A synthetic failure standing in for an environment fault.
    pub fn synthetic_failure(message: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            stdout: String::new(),
            stderr: message.into(),
        }
    }
}

/// Run `argv` in `cwd` with the default [`COMMAND_TIMEOUT`].
#[instrument(skip_all, fields(command = argv.first().copied().unwrap_or("")))]
pub fn run_command(argv: &[&str], cwd: &Utf8Path) -> ProcessOutput {
    run_with_timeout(argv, cwd, COMMAND_TIMEOUT)
}

/// Run `argv` with an explicit timeout. Never returns an error — faults
/// become synthetic failures.
fn run_with_timeout(argv: &[&str], cwd: &Utf8Path, timeout: Duration) -> ProcessOutput {
    let Some((program, args)) = argv.split_first() else {
        return ProcessOutput::synthetic_failure("empty command");
    };

    let spawned = Command::new(program)
        .args(args)
        .current_dir(cwd.as_std_path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => {
            debug!(%program, error = %e, "failed to spawn");
            return ProcessOutput::synthetic_failure(format!("Command not found: {program} ({e})"));
        }
    };

    // Drain both pipes on threads so the child can never block on a full pipe
    // while we poll for exit.
    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let stdout_reader = thread::spawn(move || drain(stdout_pipe));
    let stderr_reader = thread::spawn(move || drain(stderr_pipe));

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = stdout_reader.join();
                    let _ = stderr_reader.join();
                    debug!(%program, timeout_secs = timeout.as_secs(), "command timed out");
                    return ProcessOutput::synthetic_failure(format!(
                        "Command timed out after {} seconds: {program}",
                        timeout.as_secs()
                    ));
                }
                thread::sleep(WAIT_POLL);
            }
            Err(e) => {
                let _ = child.kill();
                let _ = stdout_reader.join();
                let _ = stderr_reader.join();
                return ProcessOutput::synthetic_failure(format!(
                    "Failed to wait for {program}: {e}"
                ));
            }
        }
    };

    let stdout = stdout_reader.join().unwrap_or_default();
    let stderr = stderr_reader.join().unwrap_or_default();
    let exit_code = status.code().unwrap_or(-1);
    debug!(%program, exit_code, "command finished");

    ProcessOutput {
        exit_code,
        stdout,
        stderr,
    }
}

/// Read a pipe to EOF, lossily decoding as UTF-8.
fn drain<R: Read>(pipe: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_cwd(tmp: &TempDir) -> &Utf8Path {
        Utf8Path::from_path(tmp.path()).expect("tempdir is UTF-8")
    }

    #[test]
    fn captures_stdout_and_exit_code() {
        let tmp = TempDir::new().unwrap();
        let out = run_command(&["echo", "hello"], tmp_cwd(&tmp));
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
        assert!(out.stderr.is_empty());
    }

    #[test]
    fn nonzero_exit_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let out = run_command(&["false"], tmp_cwd(&tmp));
        assert!(!out.success());
        assert_ne!(out.exit_code, 0);
    }

    #[test]
    fn missing_executable_yields_synthetic_failure() {
        let tmp = TempDir::new().unwrap();
        let out = run_command(&["definitely-not-a-real-binary-xyz"], tmp_cwd(&tmp));
        assert!(!out.success());
        assert!(out.stderr.contains("Command not found"));
    }

    #[test]
    fn empty_command_yields_synthetic_failure() {
        let tmp = TempDir::new().unwrap();
        let out = run_command(&[], tmp_cwd(&tmp));
        assert!(!out.success());
        assert!(out.stderr.contains("empty command"));
    }

    #[test]
    fn timeout_returns_within_bound_with_message() {
        let tmp = TempDir::new().unwrap();
        let start = Instant::now();
        let out = run_with_timeout(&["sleep", "30"], tmp_cwd(&tmp), Duration::from_millis(300));
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(!out.success());
        assert!(out.stderr.contains("timed out"));
    }

    #[test]
    fn detail_prefers_stderr() {
        let out = ProcessOutput {
            exit_code: 1,
            stdout: "out".into(),
            stderr: "err".into(),
        };
        assert_eq!(out.detail(), "err");

        let out = ProcessOutput {
            exit_code: 1,
            stdout: "out".into(),
            stderr: String::new(),
        };
        assert_eq!(out.detail(), "out");
    }
}
