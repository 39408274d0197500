//! RIPEMD-160 digests used to checksum the textual form of keys and signatures.

use ripemd::{Digest, Ripemd160};

/// Length of a RIPEMD-160 digest.
pub const DIGEST_LENGTH: usize = 20;

/// Length of the checksum appended to base58 key and signature payloads.
pub const CHECKSUM_LENGTH: usize = 4;

/// Hashes `parts` (concatenated) with RIPEMD-160.
pub fn hash(parts: &[&[u8]]) -> [u8; DIGEST_LENGTH] {
    let mut hasher = Ripemd160::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; DIGEST_LENGTH];
    out.copy_from_slice(&digest);
    out
}

/// Computes the 4-byte checksum of `data`, optionally salted with a key type suffix
/// (`"K1"`, `"R1"`, `"WA"`).
pub fn checksum(data: &[u8], suffix: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let digest = hash(&[data, suffix]);
    let mut out = [0u8; CHECKSUM_LENGTH];
    out.copy_from_slice(&digest[..CHECKSUM_LENGTH]);
    out
}
