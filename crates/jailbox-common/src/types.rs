//! Domain primitive types used across the Jailbox workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a remote image: a repository name plus a tag.
///
/// Immutable once parsed; identifies the artifact to pull for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageReference {
    name: String,
    tag: String,
}

impl ImageReference {
    /// Parses a `name[:tag]` reference, defaulting the tag to `latest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or an explicit tag is empty.
    pub fn parse(reference: &str) -> crate::error::Result<Self> {
        let (name, tag) = match reference.split_once(':') {
            Some((name, tag)) => (name, tag),
            None => (reference, crate::constants::DEFAULT_TAG),
        };
        if name.is_empty() || tag.is_empty() {
            return Err(crate::error::JailboxError::Config {
                message: format!("invalid image reference: {reference}"),
            });
        }
        Ok(Self {
            name: name.to_string(),
            tag: tag.to_string(),
        })
    }

    /// Returns the bare image name (e.g. `ubuntu`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tag (e.g. `latest`).
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the Docker Hub repository path (e.g. `library/ubuntu`).
    #[must_use]
    pub fn repository(&self) -> String {
        format!("library/{}", self.name)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}

/// Bearer token granting pull access to one repository scope.
///
/// Obtained once per run; no expiry handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw token value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw token value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Content-addressed digest naming a blob, in `sha256:<hex>` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(String);

impl Digest {
    /// Parses and validates a `sha256:<64 hex chars>` digest string.
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm prefix is missing or the hex part
    /// has the wrong length or contains non-hex characters.
    pub fn parse(digest: impl Into<String>) -> crate::error::Result<Self> {
        let digest = digest.into();
        let hex = digest.strip_prefix("sha256:").ok_or_else(|| {
            crate::error::JailboxError::Config {
                message: format!("digest missing sha256 prefix: {digest}"),
            }
        })?;
        if hex.len() != crate::constants::SHA256_HEX_LENGTH
            || !hex.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(crate::error::JailboxError::Config {
                message: format!("invalid digest hex: {digest}"),
            });
        }
        Ok(Self(digest))
    }

    /// Returns the full `sha256:<hex>` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the hex part without the algorithm prefix.
    #[must_use]
    pub fn hex(&self) -> &str {
        &self.0[7..]
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Target platform used to select an entry from a multi-arch index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// CPU architecture (e.g. `amd64`).
    pub architecture: String,
    /// Operating system (e.g. `linux`).
    pub os: String,
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            architecture: crate::constants::DEFAULT_ARCHITECTURE.to_string(),
            os: crate::constants::DEFAULT_OS.to_string(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.architecture)
    }
}

/// Per-layer fetch result, consumed only for the end-of-run tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerOutcome {
    /// Digest of the attempted layer.
    pub digest: Digest,
    /// Whether the layer was fetched, verified, and extracted.
    pub succeeded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_reference_defaults_to_latest_tag() {
        let image = ImageReference::parse("ubuntu").expect("parse failed");
        assert_eq!(image.name(), "ubuntu");
        assert_eq!(image.tag(), "latest");
        assert_eq!(image.repository(), "library/ubuntu");
    }

    #[test]
    fn image_reference_honors_explicit_tag() {
        let image = ImageReference::parse("alpine:3.20").expect("parse failed");
        assert_eq!(image.name(), "alpine");
        assert_eq!(image.tag(), "3.20");
        assert_eq!(image.to_string(), "alpine:3.20");
    }

    #[test]
    fn image_reference_rejects_empty_name_or_tag() {
        assert!(ImageReference::parse("").is_err());
        assert!(ImageReference::parse("ubuntu:").is_err());
        assert!(ImageReference::parse(":latest").is_err());
    }

    #[test]
    fn digest_parse_accepts_valid_sha256() {
        let hex = "a".repeat(64);
        let digest = Digest::parse(format!("sha256:{hex}")).expect("parse failed");
        assert_eq!(digest.hex(), hex);
        assert!(digest.as_str().starts_with("sha256:"));
    }

    #[test]
    fn digest_parse_rejects_bad_input() {
        assert!(Digest::parse("md5:abcd").is_err());
        assert!(Digest::parse("sha256:short").is_err());
        assert!(Digest::parse(format!("sha256:{}", "z".repeat(64))).is_err());
    }

    #[test]
    fn default_platform_is_amd64_linux() {
        let platform = Platform::default();
        assert_eq!(platform.architecture, "amd64");
        assert_eq!(platform.os, "linux");
    }
}
