//! Signature encoding and challenge hashing.

use core::fmt;
use core::str::FromStr;

use curve::ScalarField;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::{MESSAGE_SIZE, SIGNATURE_SIZE};
use crate::errors::MusigError;
use crate::keys::PublicKey;

/// A Schnorr signature `(R.x, s)`.
///
/// Parsing never checks ranges: `rx` may be at or above the field modulus
/// and `s` at or above the group order. Such signatures simply fail to
/// verify.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MusigSignature {
    /// Big-endian x coordinate of the nonce point R
    pub rx: [u8; 32],
    /// Big-endian response scalar s = k + e * sk
    pub s: [u8; 32],
}

impl MusigSignature {
    /// Interprets 64 bytes as `rx || s`. Always succeeds.
    pub fn parse(bytes: &[u8; SIGNATURE_SIZE]) -> Self {
        let mut rx = [0u8; 32];
        let mut s = [0u8; 32];
        rx.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        MusigSignature { rx, s }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, MusigError> {
        let array: &[u8; SIGNATURE_SIZE] = bytes
            .try_into()
            .map_err(|_| MusigError::InvalidSignatureLength(bytes.len()))?;
        Ok(Self::parse(array))
    }

    pub fn serialize(&self) -> [u8; SIGNATURE_SIZE] {
        let mut out = [0u8; SIGNATURE_SIZE];
        out[..32].copy_from_slice(&self.rx);
        out[32..].copy_from_slice(&self.s);
        out
    }
}

impl fmt::Display for MusigSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.serialize()))
    }
}

impl FromStr for MusigSignature {
    type Err = MusigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

/// Computes the challenge `e = SHA256(rx || P || msg) mod n` with `P` in
/// compressed form.
pub(crate) fn hash_challenge(
    rx: &[u8; 32],
    pk: &PublicKey,
    msg: &[u8; MESSAGE_SIZE],
) -> ScalarField {
    let mut hasher = Sha256::new();
    hasher.update(rx);
    hasher.update(pk.serialize());
    hasher.update(msg);
    let digest: [u8; 32] = hasher.finalize().into();
    ScalarField::from_be_bytes_reduced(&digest).0
}
