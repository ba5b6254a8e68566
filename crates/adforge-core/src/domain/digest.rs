//! SHA-256 hex digests for persisted artifacts.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hex digest of raw artifact bytes.
pub fn digest_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
