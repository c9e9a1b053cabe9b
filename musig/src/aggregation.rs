//! MuSig key aggregation.
//!
//! Each key `P_i` is weighted by `c_i = H("MuSig coefficient", L || P_i)`
//! where `L = SHA256(P_1 || ... || P_n)` commits to the whole ordered list.
//! The aggregate is `A = sum(c_i * P_i)`.

use curve::{Projective, ScalarField};
use sha2::{Digest, Sha256};
use tracing::trace;

use crate::constants::COEFFICIENT_TAG;
use crate::context::Context;
use crate::errors::MusigError;
use crate::hashes::tagged_hash;
use crate::keys::PublicKey;

/// Output of [`Context::pubkey_combine`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatedKey {
    /// The combined key `A`.
    pub aggregate: PublicKey,
    /// `c_i * P_i` for every input key, in input order.
    pub tweaked_keys: Vec<PublicKey>,
    /// Big-endian coefficients `c_i`, in input order.
    pub coefficients: Vec<[u8; 32]>,
}

/// `L`: the hash of the ordered list of compressed keys.
pub(crate) fn key_list_hash(pubkeys: &[PublicKey]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for pk in pubkeys {
        hasher.update(pk.serialize());
    }
    hasher.finalize().into()
}

pub(crate) fn key_coefficient(ell: &[u8; 32], pk: &PublicKey) -> ScalarField {
    let digest = tagged_hash(COEFFICIENT_TAG, &[ell.as_slice(), pk.serialize().as_slice()]);
    ScalarField::from_be_bytes_reduced(&digest).0
}

impl Context {
    /// Combines public keys into one MuSig aggregate key.
    ///
    /// The order of `pubkeys` is significant: the same keys in another order
    /// give a different, equally valid aggregate. Requires the verification
    /// capability.
    ///
    /// # Returns
    ///
    /// The aggregate key together with each participant's weighted key, or
    /// * an illegal-argument error for an incapable context or an empty list
    /// * `MusigError::InfiniteResult` if the sum is the point at infinity
    pub fn pubkey_combine(&self, pubkeys: &[PublicKey]) -> Result<AggregatedKey, MusigError> {
        self.require_verify()?;
        self.arg_check(!pubkeys.is_empty(), "at least one public key is required")?;

        let ell = key_list_hash(pubkeys);
        let mut sum = Projective::INFINITY;
        let mut tweaked_keys = Vec::with_capacity(pubkeys.len());
        let mut coefficients = Vec::with_capacity(pubkeys.len());

        for pk in pubkeys {
            let coefficient = key_coefficient(&ell, pk);
            let weighted = Projective::from(pk.as_affine()) * coefficient;
            tweaked_keys.push(PublicKey::from_projective(&weighted).ok_or(MusigError::InfiniteResult)?);
            coefficients.push(coefficient.to_be_bytes());
            sum += weighted;
        }

        trace!(keys = pubkeys.len(), "combined public keys");
        let aggregate = PublicKey::from_projective(&sum).ok_or(MusigError::InfiniteResult)?;
        Ok(AggregatedKey {
            aggregate,
            tweaked_keys,
            coefficients,
        })
    }

    /// Like [`Context::pubkey_combine`] but returns only the aggregate key.
    pub fn pubkey_combine_aggregate(&self, pubkeys: &[PublicKey]) -> Result<PublicKey, MusigError> {
        self.require_verify()?;
        self.arg_check(!pubkeys.is_empty(), "at least one public key is required")?;

        let ell = key_list_hash(pubkeys);
        let sum = pubkeys.iter().fold(Projective::INFINITY, |acc, pk| {
            acc + Projective::from(pk.as_affine()) * key_coefficient(&ell, pk)
        });

        trace!(keys = pubkeys.len(), "combined public keys");
        PublicKey::from_projective(&sum).ok_or(MusigError::InfiniteResult)
    }
}
