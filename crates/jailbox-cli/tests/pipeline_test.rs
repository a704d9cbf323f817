//! End-to-end tests for the offline half of the run pipeline:
//! 1. Manifest decode and platform narrowing
//! 2. Ordered layer extraction into a jail root (last layer wins)
//! 3. Executable install into the jail
//! 4. Exit-code translation of a real child process
//!
//! Network stages (token, manifest, blob endpoints) are covered by the
//! registry unit tests; hitting Docker Hub is out of scope for the suite.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::io::Write;
use std::path::Path;

use jailbox_common::types::Platform;
use jailbox_image::manifest::{self, ManifestResponse};

fn gzipped_tar(files: &[(&str, &[u8], u32)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, data, mode) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(*mode);
        // `set_path`/`append_data` refuse `..` components, which the
        // traversal test needs in its hostile fixture, so write the name
        // bytes into the header directly.
        header
            .as_gnu_mut()
            .expect("gnu header")
            .name[..path.len()]
            .copy_from_slice(path.as_bytes());
        header.set_cksum();
        builder.append(&header, *data).expect("append entry");
    }
    let tar_bytes = builder.into_inner().expect("finish tar");

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&tar_bytes).expect("gzip write");
    encoder.finish().expect("gzip finish")
}

// ── Manifest resolution ──────────────────────────────────────────────

#[test]
fn pipeline_index_narrows_to_amd64_linux() {
    let body = r#"{
        "schemaVersion": 2,
        "manifests": [
            {
                "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
                "size": 100,
                "digest": "sha256:1111111111111111111111111111111111111111111111111111111111111111",
                "platform": { "architecture": "arm64", "os": "linux" }
            },
            {
                "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
                "size": 100,
                "digest": "sha256:2222222222222222222222222222222222222222222222222222222222222222",
                "platform": { "architecture": "amd64", "os": "linux" }
            }
        ]
    }"#;

    let response = manifest::decode_response(
        "application/vnd.docker.distribution.manifest.list.v2+json",
        body,
    )
    .expect("decode index");
    let ManifestResponse::Index(index) = response else {
        panic!("expected an index");
    };
    let entry = manifest::select_platform(&index, &Platform::default()).expect("select");
    assert!(entry.digest.starts_with("sha256:2222"));
}

// ── Ordered extraction into the jail root ────────────────────────────

#[test]
fn pipeline_sequential_extraction_preserves_overlay_order() {
    // Two layers touching the same path: the later layer must win, which
    // is exactly why extraction runs in manifest order.
    let base = gzipped_tar(&[
        ("etc/os-release", b"base image", 0o644),
        ("bin/tool", b"v1", 0o755),
    ]);
    let overlay = gzipped_tar(&[("bin/tool", b"v2", 0o755)]);

    let jail = tempfile::tempdir().expect("tempdir");
    jailbox_image::extract::extract(&base[..], jail.path()).expect("extract base");
    jailbox_image::extract::extract(&overlay[..], jail.path()).expect("extract overlay");

    assert_eq!(
        std::fs::read(jail.path().join("etc/os-release")).expect("read"),
        b"base image"
    );
    assert_eq!(
        std::fs::read(jail.path().join("bin/tool")).expect("read"),
        b"v2"
    );
}

#[test]
fn pipeline_traversal_entry_cannot_escape_jail() {
    let hostile = gzipped_tar(&[("../../etc/passwd", b"pwned", 0o644)]);

    let outer = tempfile::tempdir().expect("tempdir");
    let jail = outer.path().join("runs/jail-1");
    std::fs::create_dir_all(&jail).expect("mkdir");

    assert!(jailbox_image::extract::extract(&hostile[..], &jail).is_err());
    assert!(!outer.path().join("etc/passwd").exists());
    assert!(!Path::new("/etc/passwd-pwned").exists());
}

// ── Jail install + launch mapping ────────────────────────────────────

#[test]
fn pipeline_install_then_rerun_is_stable() {
    let host = tempfile::tempdir().expect("tempdir");
    let jail = tempfile::tempdir().expect("tempdir");
    let binary = host.path().join("usr/bin/app");
    std::fs::create_dir_all(binary.parent().expect("parent")).expect("mkdir");
    std::fs::write(&binary, b"\x7fELF-ish").expect("write");

    let first = jailbox_core::jail::install_into_jail(&binary, jail.path()).expect("install");
    let second = jailbox_core::jail::install_into_jail(&binary, jail.path()).expect("reinstall");
    assert_eq!(first, second);
    assert_eq!(std::fs::read(&second).expect("read"), b"\x7fELF-ish");
    assert!(second.ends_with("usr/bin/app"));
}

#[cfg(unix)]
#[test]
fn pipeline_exit_codes_follow_the_three_way_contract() {
    use jailbox_core::launch::{ExitOutcome, map_exit_status};
    use std::process::Command;

    let ok = Command::new("true").status().expect("spawn true");
    assert_eq!(map_exit_status(ok).exit_code(), 0);

    let seven = Command::new("sh")
        .args(["-c", "exit 7"])
        .status()
        .expect("spawn sh");
    assert_eq!(map_exit_status(seven), ExitOutcome::Exited(7));

    let killed = Command::new("sh")
        .args(["-c", "kill -KILL $$"])
        .status()
        .expect("spawn sh");
    assert_eq!(map_exit_status(killed).exit_code(), 124);
}
