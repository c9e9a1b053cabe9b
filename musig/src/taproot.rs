//! Taproot output key commitments.
//!
//! An output key is `Q = P + t*G` with `t = hash(P, commitment)`.

use curve::{Projective, ScalarField};

use crate::constants::TAPTWEAK_TAG;
use crate::context::Context;
use crate::errors::MusigError;
use crate::hashes::tagged_hash;
use crate::keys::PublicKey;

/// Computes the taproot tweak for an internal key and a commitment.
///
/// `None` signals failure. An output at or above the group order is
/// rejected by the caller. Closures with the matching signature implement
/// this trait.
pub trait TweakHash {
    fn tweak_hash(&self, internal_key: &PublicKey, commitment: &[u8; 32]) -> Option<[u8; 32]>;
}

impl<F> TweakHash for F
where
    F: Fn(&PublicKey, &[u8; 32]) -> Option<[u8; 32]>,
{
    fn tweak_hash(&self, internal_key: &PublicKey, commitment: &[u8; 32]) -> Option<[u8; 32]> {
        self(internal_key, commitment)
    }
}

/// The default tweak hash, see [`taproot_hash_default`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TapTweakHash;

impl TweakHash for TapTweakHash {
    fn tweak_hash(&self, internal_key: &PublicKey, commitment: &[u8; 32]) -> Option<[u8; 32]> {
        Some(taproot_hash_default(internal_key, commitment))
    }
}

/// `TaggedHash("TapTweak", x(P) || commitment)`.
pub fn taproot_hash_default(internal_key: &PublicKey, commitment: &[u8; 32]) -> [u8; 32] {
    tagged_hash(
        TAPTWEAK_TAG,
        &[internal_key.x_only().as_slice(), commitment.as_slice()],
    )
}

impl Context {
    /// Returns `pk + tweak*G`. Requires the verification capability.
    ///
    /// # Returns
    ///
    /// * `MusigError::InvalidTweak` if the tweak is not below the group order
    /// * `MusigError::InfiniteResult` if the sum is the point at infinity
    pub fn pubkey_tweak_add(
        &self,
        pk: &PublicKey,
        tweak: &[u8; 32],
    ) -> Result<PublicKey, MusigError> {
        self.require_verify()?;

        let t = ScalarField::from_be_bytes_checked(tweak).ok_or(MusigError::InvalidTweak)?;
        let tweaked = Projective::mul_generator(&t).add_affine(pk.as_affine());
        PublicKey::from_projective(&tweaked).ok_or(MusigError::InfiniteResult)
    }

    /// Commits `commitment` into `internal_key` with the default tweak hash.
    pub fn taproot_tweak(
        &self,
        internal_key: &PublicKey,
        commitment: &[u8; 32],
    ) -> Result<PublicKey, MusigError> {
        self.taproot_tweak_with(internal_key, commitment, &TapTweakHash)
    }

    /// Commits `commitment` into `internal_key` with a custom tweak hash.
    pub fn taproot_tweak_with<H: TweakHash + ?Sized>(
        &self,
        internal_key: &PublicKey,
        commitment: &[u8; 32],
        hasher: &H,
    ) -> Result<PublicKey, MusigError> {
        self.require_verify()?;

        let tweak = hasher
            .tweak_hash(internal_key, commitment)
            .ok_or(MusigError::TweakHashFailed)?;
        self.pubkey_tweak_add(internal_key, &tweak)
    }
}
