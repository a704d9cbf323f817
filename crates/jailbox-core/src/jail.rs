//! Jail filesystem construction.
//!
//! Only the single named executable is copied into the jail; shared
//! libraries and the dynamic loader are not resolved, so dynamically linked
//! binaries will fail inside the jail unless statically linked.

use std::path::{Path, PathBuf};

use jailbox_common::error::{JailboxError, Result};

/// Copies the executable at `host_path` to the identical relative path
/// under `jail_root`, creating ancestor directories as needed.
///
/// The copy always carries mode `0o755` so the owner-execute bit is
/// preserved. Re-running for the same pair is idempotent: the destination
/// is truncated and rewritten, never duplicated.
///
/// # Errors
///
/// Returns [`JailboxError::JailInstall`] if the source cannot be opened or
/// the destination cannot be created or written.
pub fn install_into_jail(host_path: &Path, jail_root: &Path) -> Result<PathBuf> {
    let relative = host_path.strip_prefix("/").unwrap_or(host_path);
    let target = jail_root.join(relative);

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| JailboxError::JailInstall {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut source = std::fs::File::open(host_path).map_err(|e| JailboxError::JailInstall {
        path: host_path.to_path_buf(),
        source: e,
    })?;
    let mut dest = std::fs::File::create(&target).map_err(|e| JailboxError::JailInstall {
        path: target.clone(),
        source: e,
    })?;
    let _ = std::io::copy(&mut source, &mut dest).map_err(|e| JailboxError::JailInstall {
        path: target.clone(),
        source: e,
    })?;
    set_executable(&target)?;

    tracing::info!(
        source = %host_path.display(),
        target = %target.display(),
        "installed executable into jail"
    );
    Ok(target)
}

#[cfg(unix)]
fn set_executable(target: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(target, std::fs::Permissions::from_mode(0o755)).map_err(|e| {
        JailboxError::JailInstall {
            path: target.to_path_buf(),
            source: e,
        }
    })
}

#[cfg(not(unix))]
fn set_executable(_target: &Path) -> Result<()> {
    Ok(())
}
