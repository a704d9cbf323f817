//! Registry manifest model and media-type dispatch.
//!
//! A manifest request can answer with either a concrete image manifest or a
//! multi-platform index; the two shapes are told apart by the declared media
//! type, never by guessing at the JSON.

use jailbox_common::error::{JailboxError, Result};
use jailbox_common::types::Platform;
use serde::Deserialize;

/// Pointer to a retrievable blob: a layer, a config object, or a nested
/// manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// MIME type of the referenced object.
    pub media_type: String,
    /// Content digest in `sha256:<hex>` form.
    pub digest: String,
    /// Size of the object in bytes.
    pub size: u64,
}

/// Concrete image manifest: config blob plus ordered layers.
///
/// Layer order is the on-disk application order: earlier layers are base,
/// later layers overlay.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Manifest schema version (2 for the v2 API).
    pub schema_version: u32,
    /// Declared media type, if present in the body.
    #[serde(default)]
    pub media_type: Option<String>,
    /// Descriptor of the image config blob.
    pub config: Descriptor,
    /// Ordered layer descriptors, base first.
    pub layers: Vec<Descriptor>,
}

/// One platform-specific entry in a multi-arch index.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    /// MIME type of the referenced manifest.
    pub media_type: String,
    /// Digest of the platform-specific manifest.
    pub digest: String,
    /// Size of the manifest in bytes.
    pub size: u64,
    /// Platform this entry targets.
    pub platform: Platform,
}

/// Multi-platform ("fat") manifest index.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiArchIndex {
    /// Manifest schema version.
    pub schema_version: u32,
    /// Declared media type, if present in the body.
    #[serde(default)]
    pub media_type: Option<String>,
    /// Platform-specific manifest entries.
    pub manifests: Vec<IndexEntry>,
}

/// Manifest endpoint response, dispatched on the declared media type.
#[derive(Debug, Clone)]
pub enum ManifestResponse {
    /// A concrete image manifest.
    Single(Manifest),
    /// A multi-platform index requiring platform selection.
    Index(MultiArchIndex),
}

/// Decodes a manifest endpoint body according to its declared media type.
///
/// Unknown media types are an error, never a silent fallthrough.
///
/// # Errors
///
/// Returns [`JailboxError::Manifest`] if the media type is unrecognized or
/// the body does not decode into the shape the media type promises.
pub fn decode_response(media_type: &str, body: &str) -> Result<ManifestResponse> {
    use jailbox_common::constants::{
        MANIFEST_LIST_V2_MEDIA_TYPE, MANIFEST_V2_MEDIA_TYPE, OCI_INDEX_MEDIA_TYPE,
        OCI_MANIFEST_MEDIA_TYPE,
    };

    // Content-Type may carry parameters (e.g. "; charset=utf-8").
    let media_type = media_type
        .split(';')
        .next()
        .unwrap_or(media_type)
        .trim();

    if media_type == MANIFEST_V2_MEDIA_TYPE || media_type == OCI_MANIFEST_MEDIA_TYPE {
        let manifest: Manifest = serde_json::from_str(body).map_err(|e| {
            JailboxError::Manifest {
                message: format!("malformed image manifest: {e}"),
            }
        })?;
        Ok(ManifestResponse::Single(manifest))
    } else if media_type == MANIFEST_LIST_V2_MEDIA_TYPE || media_type == OCI_INDEX_MEDIA_TYPE {
        let index: MultiArchIndex = serde_json::from_str(body).map_err(|e| {
            JailboxError::Manifest {
                message: format!("malformed multi-arch index: {e}"),
            }
        })?;
        Ok(ManifestResponse::Index(index))
    } else {
        Err(JailboxError::Manifest {
            message: format!("unsupported manifest media type: {media_type}"),
        })
    }
}

/// Selects the index entry matching the target platform.
///
/// Both the architecture and the OS must match.
///
/// # Errors
///
/// Returns [`JailboxError::Manifest`] if no entry matches.
pub fn select_platform<'a>(
    index: &'a MultiArchIndex,
    platform: &Platform,
) -> Result<&'a IndexEntry> {
    index
        .manifests
        .iter()
        .find(|entry| {
            entry.platform.architecture == platform.architecture
                && entry.platform.os == platform.os
        })
        .ok_or_else(|| JailboxError::Manifest {
            message: format!("no manifest for platform {platform}"),
        })
}
