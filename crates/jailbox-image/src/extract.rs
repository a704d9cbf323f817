//! Gzip+tar layer extraction confined to a destination root.
//!
//! Entries are applied in stream order with destructive overwrite semantics:
//! a later entry for the same path clobbers the earlier one. Every resolved
//! target path must stay lexically inside the destination root; entries that
//! would escape it are rejected before any filesystem write.

use std::io::Read;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use jailbox_common::error::{JailboxError, Result};
use tar::EntryType;

/// Decompresses a gzip stream and unpacks the contained tar archive under
/// `dest_root`.
///
/// Directory entries are created idempotently with their ancestors; regular
/// files are written verbatim with the archive's permission bits. Other
/// entry kinds (symlinks, hardlinks, devices, whiteouts) are skipped.
///
/// # Errors
///
/// Returns [`JailboxError::Extract`] if the archive is malformed or an entry
/// path would escape `dest_root`, and [`JailboxError::Io`] on write failure.
pub fn extract<R: Read>(compressed: R, dest_root: &Path) -> Result<()> {
    let decoder = GzDecoder::new(compressed);
    let mut archive = tar::Archive::new(decoder);

    let entries = archive.entries().map_err(|e| JailboxError::Extract {
        message: format!("unreadable archive: {e}"),
    })?;

    for entry in entries {
        let mut entry = entry.map_err(|e| JailboxError::Extract {
            message: format!("malformed archive entry: {e}"),
        })?;

        let stored_path = entry
            .path()
            .map_err(|e| JailboxError::Extract {
                message: format!("unreadable entry path: {e}"),
            })?
            .into_owned();
        let relative = sanitize_entry_path(&stored_path)?;
        let target = dest_root.join(&relative);

        match entry.header().entry_type() {
            EntryType::Directory => {
                std::fs::create_dir_all(&target).map_err(|e| JailboxError::Io {
                    path: target.clone(),
                    source: e,
                })?;
            }
            EntryType::Regular => {
                write_regular_file(&mut entry, &target)?;
            }
            other => {
                tracing::debug!(
                    kind = ?other,
                    path = %stored_path.display(),
                    "skipping unsupported tar entry"
                );
            }
        }
    }

    Ok(())
}

/// Normalizes a tar entry path into a safe path relative to the
/// destination root.
///
/// Absolute paths and `..` components are rejected; `.` components are
/// dropped.
///
/// # Errors
///
/// Returns [`JailboxError::Extract`] on a path-traversal attempt.
fn sanitize_entry_path(stored: &Path) -> Result<PathBuf> {
    let mut clean = PathBuf::new();
    for component in stored.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(JailboxError::Extract {
                    message: format!(
                        "entry path escapes destination root: {}",
                        stored.display()
                    ),
                });
            }
        }
    }
    Ok(clean)
}

fn write_regular_file<R: Read>(entry: &mut tar::Entry<'_, R>, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| JailboxError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = std::fs::File::create(target).map_err(|e| JailboxError::Io {
        path: target.to_path_buf(),
        source: e,
    })?;
    let _ = std::io::copy(entry, &mut file).map_err(|e| JailboxError::Io {
        path: target.to_path_buf(),
        source: e,
    })?;

    let mode = entry.header().mode().map_err(|e| JailboxError::Extract {
        message: format!("unreadable entry mode: {e}"),
    })?;
    set_mode(target, mode)?;

    Ok(())
}

#[cfg(unix)]
fn set_mode(target: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(target, std::fs::Permissions::from_mode(mode & 0o7777)).map_err(
        |e| JailboxError::Io {
            path: target.to_path_buf(),
            source: e,
        },
    )
}

#[cfg(not(unix))]
fn set_mode(_target: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
