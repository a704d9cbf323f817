//! # jailbox-image
//!
//! Image fetching from a Docker-Hub-compatible v2 registry.
//!
//! Handles:
//! - **Registry**: bearer-token auth, manifest resolution, blob download.
//! - **Manifest**: single-manifest and multi-arch-index response shapes.
//! - **Extract**: gzip+tar layer unpacking confined to a destination root.
//! - **Hash**: SHA-256 digest verification of downloaded blobs.
//! - **Pull**: bounded-concurrency layer download with ordered extraction.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod extract;
pub mod hash;
pub mod manifest;
pub mod pull;
pub mod registry;
