//! BLAKE2B-256 and SHA-256 wrappers used by the address codec (checksum is
//! not a hash of these, see `address::cashaddr`) and the sighash engine.
//!
//! Kaspa keys every domain-separated hash with the BLAKE2b `key` parameter
//! (not `personal`, which is limited to 16 bytes and too short for strings
//! like `"TransactionSigningHash"`) set to the ASCII domain tag. This is the
//! same scheme `kaspa-hashes` uses for `TransactionSigningHash`,
//! `TransactionID`, etc.

/// A 32-byte digest.
pub type Hash256 = [u8; 32];

/// Unkeyed BLAKE2B-256, e.g. for hashing a redeem script into a P2SH hash.
pub fn blake2b_256(data: &[u8]) -> Hash256 {
    let hash = blake2b_simd::Params::new().hash_length(32).hash(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(hash.as_bytes());
    out
}

/// BLAKE2B-256 keyed with a domain separation tag, as used for sighash
/// pre-images (§4.3).
pub fn blake2b_256_keyed(domain: &[u8], data: &[u8]) -> Hash256 {
    let hash = blake2b_simd::Params::new()
        .hash_length(32)
        .key(domain)
        .hash(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(hash.as_bytes());
    out
}

/// Streaming variant of [`blake2b_256_keyed`], used by the sighash midstate
/// cache so each subhash is computed by folding independent byte spans
/// without materializing one large concatenated buffer.
pub fn blake2b_256_keyed_state(domain: &[u8]) -> blake2b_simd::State {
    blake2b_simd::Params::new()
        .hash_length(32)
        .key(domain)
        .to_state()
}

pub fn finalize_state(mut state: blake2b_simd::State) -> Hash256 {
    let mut out = [0u8; 32];
    out.copy_from_slice(state.finalize().as_bytes());
    out
}

pub fn sha256(data: &[u8]) -> Hash256 {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_256_is_32_bytes_and_deterministic() {
        let a = blake2b_256(b"hello world");
        let b = blake2b_256(b"hello world");
        assert_eq!(a, b);
        assert_ne!(a, blake2b_256(b"hello world!"));
    }

    #[test]
    fn keyed_hash_differs_by_domain() {
        let a = blake2b_256_keyed(b"DomainA", b"payload");
        let b = blake2b_256_keyed(b"DomainB", b"payload");
        assert_ne!(a, b);
    }

    #[test]
    fn sha256_known_vector() {
        let digest = sha256(b"hello world");
        assert_eq!(
            hex::encode(digest),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde"
        );
    }
}
