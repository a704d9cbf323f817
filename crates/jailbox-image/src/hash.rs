//! SHA-256 digest verification for downloaded blobs.
//!
//! The minimal fetch path trusts the registry; verifying the content hash
//! against the requested digest closes that gap.

use std::io::{Read, Write};

use jailbox_common::error::{JailboxError, Result};
use jailbox_common::types::Digest;
use sha2::{Digest as _, Sha256};

/// Copies `reader` into `writer` while hashing, returning the hex digest
/// of everything copied.
///
/// # Errors
///
/// Returns [`JailboxError::Io`] if reading or writing fails.
pub fn copy_and_hash<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf).map_err(|e| JailboxError::Io {
            path: "<blob stream>".into(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        writer.write_all(&buf[..n]).map_err(|e| JailboxError::Io {
            path: "<blob staging>".into(),
            source: e,
        })?;
    }
    Ok(hex_encode(&hasher.finalize()))
}

/// Checks a computed hex hash against the requested digest.
///
/// # Errors
///
/// Returns [`JailboxError::BlobFetch`] on mismatch.
pub fn verify_digest(computed_hex: &str, expected: &Digest) -> Result<()> {
    if computed_hex == expected.hex() {
        Ok(())
    } else {
        Err(JailboxError::BlobFetch {
            digest: expected.to_string(),
            message: format!("digest mismatch, got sha256:{computed_hex}"),
        })
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    bytes.iter().fold(String::with_capacity(64), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // SHA-256 of the empty string and of "abc" are fixed test vectors.
    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn copy_and_hash_known_vectors() {
        let mut out = Vec::new();
        let hex = copy_and_hash(&mut &b""[..], &mut out).expect("hash failed");
        assert_eq!(hex, EMPTY_SHA256);

        let mut out = Vec::new();
        let hex = copy_and_hash(&mut &b"abc"[..], &mut out).expect("hash failed");
        assert_eq!(hex, ABC_SHA256);
        assert_eq!(out, b"abc");
    }

    #[test]
    fn verify_digest_accepts_matching_content() {
        let digest = Digest::parse(format!("sha256:{ABC_SHA256}")).expect("parse failed");
        verify_digest(ABC_SHA256, &digest).expect("verification should pass");
    }

    #[test]
    fn verify_digest_rejects_mismatch() {
        let digest = Digest::parse(format!("sha256:{EMPTY_SHA256}")).expect("parse failed");
        let result = verify_digest(ABC_SHA256, &digest);
        assert!(matches!(
            result,
            Err(JailboxError::BlobFetch { .. })
        ));
    }
}
