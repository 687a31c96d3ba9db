//! Hashing utilities for output-name fingerprinting.
//!
//! Two digest sources feed the `[hash]` naming token:
//! - `path_digest`: `rustc_hash::FxHasher` over the input path string.
//!   Fast, deterministic, and pure - the default when only the path is known.
//! - `content_digest`: blake3 over the asset bytes, for callers that have
//!   already read the file and want content-addressed names.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}

/// Full 16-char hex digest of a path string.
///
/// Naming templates truncate this to the requested `[hash:N]` width, so
/// the default `[hash]` is the usual 8-char cache-busting fingerprint
/// (e.g. `style.a1b2c3d4.css`).
#[inline]
pub fn path_digest<T: AsRef<[u8]> + ?Sized>(value: &T) -> String {
    format!("{:016x}", compute(value))
}

/// 64-char hex blake3 digest of asset content.
#[inline]
pub fn content_digest(bytes: &[u8]) -> String {
    hex::encode(blake3::hash(bytes).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_deterministic() {
        assert_eq!(compute("imgs/logo.png"), compute("imgs/logo.png"));
        assert_ne!(compute("imgs/logo.png"), compute("imgs/logo2.png"));
    }

    #[test]
    fn test_path_digest_length_and_hex() {
        let digest = path_digest("src/index.js");
        assert_eq!(digest.len(), 16);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_content_digest_known_value() {
        // blake3 of empty input is a fixed constant
        assert_eq!(
            content_digest(b""),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
        assert_eq!(content_digest(b"body {}").len(), 64);
    }
}
