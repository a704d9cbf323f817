//! # jailbox-common
//!
//! Shared building blocks for the Jailbox workspace:
//! - **Errors**: the unified [`error::JailboxError`] taxonomy.
//! - **Types**: domain primitives (image references, digests, tokens).
//! - **Config**: the per-run configuration threaded through every component.
//! - **Constants**: registry endpoints, media types, and defaults.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
