//! SHA-256 helpers.

use sha2::{Digest, Sha256};

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// A hasher pre-loaded with `SHA256(tag) || SHA256(tag)`.
pub(crate) fn tagged_hasher(tag: &str) -> Sha256 {
    let tag_hash = sha256(tag.as_bytes());
    let mut hasher = Sha256::new();
    hasher.update(tag_hash);
    hasher.update(tag_hash);
    hasher
}

/// BIP-340 style tagged hash over the concatenation of `chunks`.
pub fn tagged_hash(tag: &str, chunks: &[&[u8]]) -> [u8; 32] {
    let mut hasher = tagged_hasher(tag);
    for chunk in chunks {
        hasher.update(chunk);
    }
    hasher.finalize().into()
}
