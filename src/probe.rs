//! Compiler availability probe
//!
//! Runs `<command> --version` and reports whether it worked. A missing
//! executable and one that exits with an error both count as "not available";
//! callers only ever see a boolean.

use std::io;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

/// Argument passed to the compiler to ask for its version.
pub const VERSION_FLAG: &str = "--version";

/// Why a probe failed. Only used for logging.
#[derive(Debug, Error)]
enum ProbeError {
    #[error("could not start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("'{command} --version' exited with {status}")]
    Status { command: String, status: ExitStatus },
}

fn probe(command: &str) -> Result<(), ProbeError> {
    let status = Command::new(command)
        .arg(VERSION_FLAG)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| ProbeError::Spawn {
            command: command.to_string(),
            source,
        })?
        .status;

    if status.success() {
        Ok(())
    } else {
        Err(ProbeError::Status {
            command: command.to_string(),
            status,
        })
    }
}

/// Check whether `command` can be invoked on this system.
///
/// Returns `true` if `command --version` starts and exits successfully. On
/// failure a one-line diagnostic naming the command is printed to stdout.
pub fn check_compiler_exists(command: &str) -> bool {
    match probe(command) {
        Ok(()) => {
            tracing::debug!(command, "compiler probe succeeded");
            true
        }
        Err(err) => {
            tracing::debug!(command, error = %err, "compiler probe failed");
            println!(
                "Compiler '{}' not found. Please ensure it is installed and in your PATH.",
                command
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_command_is_not_found() {
        assert!(!check_compiler_exists("compile-check-no-such-compiler-7f3a9c"));
    }

    #[test]
    fn test_missing_command_reports_spawn_error() {
        let err = probe("compile-check-no-such-compiler-7f3a9c").unwrap_err();
        assert!(matches!(err, ProbeError::Spawn { .. }));
        assert!(err.to_string().contains("compile-check-no-such-compiler-7f3a9c"));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_reports_status_error() {
        // `false` ignores its arguments and always exits 1
        let err = probe("false").unwrap_err();
        assert!(matches!(err, ProbeError::Status { .. }));
        assert!(!check_compiler_exists("false"));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_command_exists() {
        // `true` ignores its arguments and always exits 0
        assert!(check_compiler_exists("true"));
    }
}
