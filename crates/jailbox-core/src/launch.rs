//! Confined process launching.
//!
//! Runs the target command with its filesystem root switched to the jail
//! via `chroot(2)`, optionally inside a fresh PID namespace. Standard
//! streams are fully inherited from the parent.
//!
//! The exit translation is a load-bearing contract for callers scripting
//! against the binary:
//! 1. launch-mechanism failure is a distinguished error;
//! 2. a normal child exit surfaces its exact code;
//! 3. signal/fault termination surfaces the fixed sentinel code.

use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use jailbox_common::constants::SIGNAL_EXIT_CODE;
use jailbox_common::error::{JailboxError, Result};

/// Everything needed to launch one confined command; consumed once per run.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    /// Directory presented to the child as its filesystem root.
    pub rootfs: PathBuf,
    /// Command path as resolved inside the jail (e.g. `/bin/true`).
    pub command: PathBuf,
    /// Arguments passed to the command.
    pub args: Vec<String>,
    /// Whether to place the child in a new PID namespace.
    pub new_pid_namespace: bool,
}

/// How the confined command terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The child exited normally with this status code.
    Exited(i32),
    /// The child was terminated by a signal or fault, with no
    /// translatable exit code.
    Signaled,
}

impl ExitOutcome {
    /// Translates the outcome into the parent's own exit code.
    ///
    /// Normal exits surface their exact code; abnormal terminations map to
    /// the sentinel so callers can tell the two apart.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Exited(code) => code,
            Self::Signaled => SIGNAL_EXIT_CODE,
        }
    }
}

/// Launches the command described by `spec` and waits for it to finish.
///
/// # Errors
///
/// Returns [`JailboxError::Launch`] if the PID namespace cannot be created
/// or the child cannot be started (binary missing, permission denied).
#[cfg(unix)]
pub fn launch(spec: &LaunchSpec) -> Result<ExitOutcome> {
    use std::os::unix::process::CommandExt;

    if spec.new_pid_namespace {
        // Must happen before the fork: the next child lands in the new
        // namespace and sees itself as an early PID.
        crate::namespace::create_pid_namespace()?;
    }

    let mut command = Command::new(&spec.command);
    let _ = command.args(&spec.args);

    let rootfs = spec.rootfs.clone();
    // SAFETY: the hook runs between fork and exec and only issues
    // async-signal-safe syscalls (chroot, chdir).
    #[allow(unsafe_code)]
    unsafe {
        let _ = command.pre_exec(move || {
            nix::unistd::chroot(rootfs.as_path()).map_err(std::io::Error::from)?;
            nix::unistd::chdir("/").map_err(std::io::Error::from)?;
            Ok(())
        });
    }

    tracing::info!(
        command = %spec.command.display(),
        rootfs = %spec.rootfs.display(),
        pid_namespace = spec.new_pid_namespace,
        "launching confined command"
    );

    let status = command.status().map_err(|e| JailboxError::Launch {
        message: format!("failed to start {}: {e}", spec.command.display()),
    })?;
    Ok(map_exit_status(status))
}

/// Stub for non-Unix platforms.
///
/// # Errors
///
/// Always returns an error — chroot confinement requires Unix.
#[cfg(not(unix))]
pub fn launch(_spec: &LaunchSpec) -> Result<ExitOutcome> {
    Err(JailboxError::Launch {
        message: "Unix required for filesystem-jail confinement".into(),
    })
}

/// Maps a child's wait status onto the three-way exit contract.
#[must_use]
pub fn map_exit_status(status: ExitStatus) -> ExitOutcome {
    status.code().map_or(ExitOutcome::Signaled, ExitOutcome::Exited)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_surfaces_exact_child_code() {
        assert_eq!(ExitOutcome::Exited(0).exit_code(), 0);
        assert_eq!(ExitOutcome::Exited(7).exit_code(), 7);
    }

    #[test]
    fn exit_code_uses_sentinel_for_signals() {
        assert_eq!(ExitOutcome::Signaled.exit_code(), SIGNAL_EXIT_CODE);
        assert_eq!(ExitOutcome::Signaled.exit_code(), 124);
    }

    // The mapping tests below run real (unconfined) children; chroot
    // itself needs root and is exercised end-to-end outside the suite.

    #[cfg(unix)]
    #[test]
    fn map_exit_status_normal_exit_keeps_code() {
        let status = Command::new("sh")
            .args(["-c", "exit 7"])
            .status()
            .expect("spawn sh");
        assert_eq!(map_exit_status(status), ExitOutcome::Exited(7));
        assert_eq!(map_exit_status(status).exit_code(), 7);
    }

    #[cfg(unix)]
    #[test]
    fn map_exit_status_success_is_zero() {
        let status = Command::new("sh")
            .args(["-c", "exit 0"])
            .status()
            .expect("spawn sh");
        assert_eq!(map_exit_status(status), ExitOutcome::Exited(0));
    }

    #[cfg(unix)]
    #[test]
    fn map_exit_status_signal_termination_maps_to_sentinel() {
        let status = Command::new("sh")
            .args(["-c", "kill -KILL $$"])
            .status()
            .expect("spawn sh");
        assert_eq!(map_exit_status(status), ExitOutcome::Signaled);
        assert_eq!(map_exit_status(status).exit_code(), 124);
    }

    #[cfg(unix)]
    #[test]
    fn launch_missing_binary_is_a_launch_error() {
        // Spawn failure must be distinguished from a child's own failure.
        let spec = LaunchSpec {
            rootfs: PathBuf::from("/"),
            command: PathBuf::from("/nonexistent/never-a-binary"),
            args: Vec::new(),
            new_pid_namespace: false,
        };
        // Without privileges chroot("/") fails inside pre_exec, which also
        // surfaces as a launch error; either way this must not panic and
        // must be a Launch error, not an exit outcome.
        let result = launch(&spec);
        assert!(matches!(result, Err(JailboxError::Launch { .. })));
    }
}
