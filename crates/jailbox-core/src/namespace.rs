//! PID namespace isolation.
//!
//! Gives the confined command its own process ID space: it cannot observe
//! or signal host processes and perceives itself as an early process in its
//! own namespace.

use jailbox_common::error::{JailboxError, Result};

/// Creates a new PID namespace for the calling process.
///
/// After a successful call, the next `fork(2)` child will see itself as
/// PID 1 inside the new namespace. Call this immediately before spawning
/// the confined command.
///
/// # Errors
///
/// Returns an error if the `unshare(CLONE_NEWPID)` syscall fails.
#[cfg(target_os = "linux")]
pub fn create_pid_namespace() -> Result<()> {
    use nix::sched::{CloneFlags, unshare};

    unshare(CloneFlags::CLONE_NEWPID).map_err(|e| JailboxError::Launch {
        message: format!("PID namespace creation failed: {e}"),
    })?;
    tracing::debug!("PID namespace created");
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — PID namespaces require Linux.
#[cfg(not(target_os = "linux"))]
pub fn create_pid_namespace() -> Result<()> {
    Err(JailboxError::Launch {
        message: "Linux required for PID namespace isolation".into(),
    })
}
