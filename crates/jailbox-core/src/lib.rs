//! # jailbox-core
//!
//! OS-level isolation for the Jailbox runtime:
//! - **Jail**: installing the target executable into the jail rootfs.
//! - **Namespace**: PID namespace creation via `unshare(2)`.
//! - **Launch**: confined process execution with `chroot(2)` and exact
//!   exit-code translation.
//!
//! Unsafe system calls are encapsulated behind safe wrappers with
//! `// SAFETY:` documentation.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod jail;
pub mod launch;
pub mod namespace;
