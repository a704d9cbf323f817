//! Docker Hub v2 registry client.
//!
//! Obtains a pull-scoped bearer token, resolves an image reference to its
//! ordered layer digests, and fetches blobs by digest. Auth and manifest
//! failures abort the run; blob fetch failures are per-layer and handled by
//! the pull coordinator.

use jailbox_common::constants::{
    AUTH_ENDPOINT, AUTH_SERVICE, MANIFEST_LIST_V2_MEDIA_TYPE, MANIFEST_V2_MEDIA_TYPE,
    REGISTRY_ENDPOINT,
};
use jailbox_common::error::{JailboxError, Result};
use jailbox_common::types::{AuthToken, Digest, ImageReference, Platform};
use serde::Deserialize;

use crate::manifest::{self, Manifest, ManifestResponse};

/// JSON envelope returned by the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenEnvelope {
    token: String,
}

/// Client for a Docker-Hub-compatible v2 registry.
#[derive(Debug)]
pub struct RegistryClient {
    http: reqwest::blocking::Client,
}

impl RegistryClient {
    /// Creates a client against the Docker Hub endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("jailbox/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| JailboxError::Config {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { http })
    }

    /// Obtains a pull-scoped bearer token for the image's repository.
    ///
    /// # Errors
    ///
    /// Returns [`JailboxError::Auth`] on non-success status, transport
    /// failure, or an unparsable token envelope.
    pub fn authenticate(&self, image: &ImageReference) -> Result<AuthToken> {
        let url = format!(
            "{AUTH_ENDPOINT}?service={AUTH_SERVICE}&scope=repository:{}:pull",
            image.repository()
        );
        tracing::debug!(image = %image, "requesting pull token");

        let response = self.http.get(&url).send().map_err(|e| JailboxError::Auth {
            message: format!("token request failed: {e}"),
        })?;
        if !response.status().is_success() {
            return Err(JailboxError::Auth {
                message: format!("token endpoint returned {}", response.status()),
            });
        }

        let envelope: TokenEnvelope = response.json().map_err(|e| JailboxError::Auth {
            message: format!("malformed token envelope: {e}"),
        })?;
        tracing::info!(image = %image, "authenticated against registry");
        Ok(AuthToken::new(envelope.token))
    }

    /// Resolves an image reference to its ordered layer digests.
    ///
    /// Handles both response shapes of the manifest endpoint: a concrete
    /// manifest is used directly; a multi-arch index is narrowed to the
    /// entry matching `platform`, whose manifest is then fetched as a blob.
    ///
    /// # Errors
    ///
    /// Returns [`JailboxError::Manifest`] on HTTP failure, decode failure,
    /// or when no index entry matches the platform.
    pub fn resolve_layers(
        &self,
        image: &ImageReference,
        token: &AuthToken,
        platform: &Platform,
    ) -> Result<Vec<Digest>> {
        let url = format!(
            "{REGISTRY_ENDPOINT}/v2/{}/manifests/{}",
            image.repository(),
            image.tag()
        );
        tracing::debug!(image = %image, "fetching manifest");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token.as_str())
            .header(
                reqwest::header::ACCEPT,
                format!("{MANIFEST_V2_MEDIA_TYPE}, {MANIFEST_LIST_V2_MEDIA_TYPE}"),
            )
            .send()
            .map_err(|e| JailboxError::Manifest {
                message: format!("manifest request failed: {e}"),
            })?;
        if !response.status().is_success() {
            return Err(JailboxError::Manifest {
                message: format!("manifest endpoint returned {}", response.status()),
            });
        }

        let media_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(MANIFEST_V2_MEDIA_TYPE)
            .to_string();
        let body = response.text().map_err(|e| JailboxError::Manifest {
            message: format!("failed to read manifest body: {e}"),
        })?;

        let manifest = match manifest::decode_response(&media_type, &body)? {
            ManifestResponse::Single(manifest) => manifest,
            ManifestResponse::Index(index) => {
                let entry = manifest::select_platform(&index, platform)?;
                tracing::debug!(
                    digest = %entry.digest,
                    platform = %platform,
                    "narrowed multi-arch index"
                );
                let digest = Digest::parse(entry.digest.clone()).map_err(|e| {
                    JailboxError::Manifest {
                        message: format!("invalid manifest digest in index: {e}"),
                    }
                })?;
                self.fetch_manifest_by_digest(image, &digest, token)?
            }
        };

        let digests = manifest
            .layers
            .iter()
            .map(|layer| {
                Digest::parse(layer.digest.clone()).map_err(|e| JailboxError::Manifest {
                    message: format!("invalid layer digest: {e}"),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(image = %image, layers = digests.len(), "resolved manifest");
        Ok(digests)
    }

    /// Fetches a blob by digest, returning the raw response body stream.
    ///
    /// The caller is responsible for decompression and digest verification.
    ///
    /// # Errors
    ///
    /// Returns [`JailboxError::BlobFetch`] on non-success status or
    /// transport error.
    pub fn fetch_blob(
        &self,
        image: &ImageReference,
        digest: &Digest,
        token: &AuthToken,
    ) -> Result<reqwest::blocking::Response> {
        let url = format!(
            "{REGISTRY_ENDPOINT}/v2/{}/blobs/{}",
            image.repository(),
            digest
        );
        tracing::debug!(digest = %digest, "fetching blob");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token.as_str())
            .send()
            .map_err(|e| JailboxError::BlobFetch {
                digest: digest.to_string(),
                message: format!("blob request failed: {e}"),
            })?;
        if !response.status().is_success() {
            return Err(JailboxError::BlobFetch {
                digest: digest.to_string(),
                message: format!("blob endpoint returned {}", response.status()),
            });
        }
        Ok(response)
    }

    /// Fetches a platform-specific manifest referenced from an index.
    fn fetch_manifest_by_digest(
        &self,
        image: &ImageReference,
        digest: &Digest,
        token: &AuthToken,
    ) -> Result<Manifest> {
        let response =
            self.fetch_blob(image, digest, token)
                .map_err(|e| JailboxError::Manifest {
                    message: format!("failed to fetch platform manifest: {e}"),
                })?;
        let body = response.text().map_err(|e| JailboxError::Manifest {
            message: format!("failed to read platform manifest: {e}"),
        })?;
        serde_json::from_str(&body).map_err(|e| JailboxError::Manifest {
            message: format!("malformed platform manifest: {e}"),
        })
    }
}
