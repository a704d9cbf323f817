//! Unified error types for the Jailbox workspace.
//!
//! Authentication and manifest-resolution failures abort a run outright;
//! per-layer fetch and extract failures are recorded and aggregated by the
//! pull coordinator instead of propagating.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum JailboxError {
    /// Token acquisition against the registry auth endpoint failed.
    #[error("registry authentication failed: {message}")]
    Auth {
        /// Description of the authentication failure.
        message: String,
    },

    /// Manifest resolution failed, including "no matching platform".
    #[error("manifest resolution failed: {message}")]
    Manifest {
        /// Description of the resolution failure.
        message: String,
    },

    /// A blob download failed or its content did not match its digest.
    #[error("blob fetch failed for {digest}: {message}")]
    BlobFetch {
        /// Digest of the blob that failed to fetch.
        digest: String,
        /// Description of the fetch failure.
        message: String,
    },

    /// Layer extraction failed, including malformed archives and
    /// path-traversal attempts.
    #[error("layer extraction failed: {message}")]
    Extract {
        /// Description of the extraction failure.
        message: String,
    },

    /// Copying the target executable into the jail failed.
    #[error("jail install failed at {path}: {source}")]
    JailInstall {
        /// Path involved in the failed copy.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The launch mechanism itself failed before the child ran.
    ///
    /// Distinct from a non-zero exit of the child: callers must be able to
    /// tell "the command could not be started" apart from "the command ran
    /// and failed".
    #[error("launch failed: {message}")]
    Launch {
        /// Description of the launch failure.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, JailboxError>;
