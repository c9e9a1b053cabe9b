//! Single and batch signature verification.
//!
//! A batch folds every signature equation `s*G = R + e*P` and every taproot
//! equation `Q = P + t*G` into one weighted sum that must be the point at
//! infinity. The sum is evaluated with a single multi-scalar multiplication
//! whose memory comes from a caller-provided [`ScratchSpace`].

use curve::{
    Affine, BaseField, Projective, ScalarField, ScratchArray, ScratchElement, ScratchError,
    ScratchSpace, double_scalar_mul_basepoint, ecmult_multi, msm_working_size,
};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::constants::{BATCH_TAG, MESSAGE_SIZE};
use crate::context::Context;
use crate::errors::MusigError;
use crate::hashes::tagged_hasher;
use crate::keys::PublicKey;
use crate::signatures::{MusigSignature, hash_challenge};
use crate::taproot::{TapTweakHash, TweakHash};

/// Signatures to verify, one column per input.
///
/// Row `i` claims that `signatures[i]` is valid for `messages[i]` under
/// `pubkeys[i]`.
#[derive(Debug, Clone, Copy)]
pub struct SignatureBatch<'a> {
    pub signatures: &'a [MusigSignature],
    pub messages: &'a [[u8; MESSAGE_SIZE]],
    pub pubkeys: &'a [PublicKey],
}

impl<'a> SignatureBatch<'a> {
    pub fn new(
        signatures: &'a [MusigSignature],
        messages: &'a [[u8; MESSAGE_SIZE]],
        pubkeys: &'a [PublicKey],
    ) -> Self {
        SignatureBatch {
            signatures,
            messages,
            pubkeys,
        }
    }

    pub fn empty() -> Self {
        Self::new(&[], &[], &[])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    fn is_well_formed(&self) -> bool {
        self.messages.len() == self.signatures.len() && self.pubkeys.len() == self.signatures.len()
    }
}

/// Taproot commitments to check.
///
/// Row `j` claims that `output_keys[j]` is `internal_keys[j]` tweaked with
/// `commitments[j]`.
#[derive(Debug, Clone, Copy)]
pub struct TaprootBatch<'a> {
    pub internal_keys: &'a [PublicKey],
    pub output_keys: &'a [PublicKey],
    pub commitments: &'a [[u8; 32]],
}

impl<'a> TaprootBatch<'a> {
    pub fn new(
        internal_keys: &'a [PublicKey],
        output_keys: &'a [PublicKey],
        commitments: &'a [[u8; 32]],
    ) -> Self {
        TaprootBatch {
            internal_keys,
            output_keys,
            commitments,
        }
    }

    pub fn empty() -> Self {
        Self::new(&[], &[], &[])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.internal_keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.internal_keys.is_empty()
    }

    fn is_well_formed(&self) -> bool {
        self.output_keys.len() == self.internal_keys.len()
            && self.commitments.len() == self.internal_keys.len()
    }
}

/// Reasons a batch evaluates to `false` without any equation being checked.
#[derive(Debug, Error)]
enum Rejection {
    #[error("scratch space: {0}")]
    Scratch(#[from] ScratchError),
    #[error("signature {0} is out of range")]
    SignatureOutOfRange(usize),
    #[error("nonce of signature {0} is not on the curve")]
    NonceNotOnCurve(usize),
    #[error("tweak hash failed for taproot check {0}")]
    TweakHashFailed(usize),
    #[error("tweak of taproot check {0} is not below the group order")]
    TweakOutOfRange(usize),
}

/// Points contributed to the multi-scalar multiplication.
#[inline]
fn batch_points(n_sigs: usize, n_taproot: usize) -> usize {
    2 * n_sigs + 2 * n_taproot
}

/// Size of the staging frame holding the batch's points and scalars.
pub fn batch_staging_size(n_sigs: usize, n_taproot: usize) -> usize {
    batch_points(n_sigs, n_taproot) * (Affine::ENCODED_SIZE + ScalarField::ENCODED_SIZE)
}

/// Scratch capacity sufficient to verify a batch of this shape.
///
/// # Example
///
/// ```
/// use musig::{batch_scratch_size, batch_staging_size};
///
/// assert_eq!(batch_scratch_size(0, 0), 0);
/// assert!(batch_scratch_size(10, 2) > batch_staging_size(10, 2));
/// ```
pub fn batch_scratch_size(n_sigs: usize, n_taproot: usize) -> usize {
    batch_staging_size(n_sigs, n_taproot) + msm_working_size(batch_points(n_sigs, n_taproot))
}

/// Hashes every input of the batch into the seed for the weights.
fn batch_seed(sigs: &SignatureBatch<'_>, taproot: &TaprootBatch<'_>) -> [u8; 32] {
    let mut hasher = tagged_hasher(BATCH_TAG);
    for ((sig, msg), pk) in sigs.signatures.iter().zip(sigs.messages).zip(sigs.pubkeys) {
        hasher.update(sig.serialize());
        hasher.update(msg);
        hasher.update(pk.serialize());
    }
    for ((internal, output), commitment) in taproot
        .internal_keys
        .iter()
        .zip(taproot.output_keys)
        .zip(taproot.commitments)
    {
        hasher.update(internal.serialize());
        hasher.update(output.serialize());
        hasher.update(commitment);
    }
    hasher.finalize().into()
}

/// Weight of the `index`-th equation. The first weight is one.
fn batch_weight(seed: &[u8; 32], index: usize) -> ScalarField {
    if index == 0 {
        return ScalarField::ONE;
    }
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update((index as u64).to_be_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    ScalarField::from_be_bytes_reduced(&digest).0
}

/// Stages the batch equation in a fresh frame and evaluates it.
fn evaluate_batch<H: TweakHash + ?Sized>(
    scratch: &mut ScratchSpace,
    sigs: &SignatureBatch<'_>,
    taproot: &TaprootBatch<'_>,
    hasher: &H,
) -> Result<Projective, Rejection> {
    let n_points = batch_points(sigs.len(), taproot.len());
    let seed = batch_seed(sigs, taproot);

    let mut staging = scratch.push_frame(batch_staging_size(sigs.len(), taproot.len()))?;
    let points: ScratchArray<Affine> = staging.alloc_array(n_points)?;
    let scalars: ScratchArray<ScalarField> = staging.alloc_array(n_points)?;
    let mut g_scalar = ScalarField::ZERO;
    let mut slot = 0;

    for (i, ((sig, msg), pk)) in sigs
        .signatures
        .iter()
        .zip(sigs.messages)
        .zip(sigs.pubkeys)
        .enumerate()
    {
        let rx = BaseField::from_be_bytes_checked(&sig.rx)
            .ok_or(Rejection::SignatureOutOfRange(i))?;
        let s = ScalarField::from_be_bytes_checked(&sig.s)
            .ok_or(Rejection::SignatureOutOfRange(i))?;
        let r = Affine::lift_x_quad(&rx).ok_or(Rejection::NonceNotOnCurve(i))?;
        let e = hash_challenge(&sig.rx, pk, msg);
        let w = batch_weight(&seed, i);

        g_scalar += w * s;
        points.set(&mut staging, slot, &r);
        scalars.set(&mut staging, slot, &-w);
        points.set(&mut staging, slot + 1, pk.as_affine());
        scalars.set(&mut staging, slot + 1, &-(w * e));
        slot += 2;
    }

    for (j, ((internal, output), commitment)) in taproot
        .internal_keys
        .iter()
        .zip(taproot.output_keys)
        .zip(taproot.commitments)
        .enumerate()
    {
        let tweak = hasher
            .tweak_hash(internal, commitment)
            .ok_or(Rejection::TweakHashFailed(j))?;
        let t = ScalarField::from_be_bytes_checked(&tweak).ok_or(Rejection::TweakOutOfRange(j))?;
        let w = batch_weight(&seed, sigs.len() + j);

        g_scalar += w * t;
        points.set(&mut staging, slot, internal.as_affine());
        scalars.set(&mut staging, slot, &w);
        points.set(&mut staging, slot + 1, output.as_affine());
        scalars.set(&mut staging, slot + 1, &-w);
        slot += 2;
    }

    debug_assert_eq!(slot, n_points);
    Ok(ecmult_multi(&mut staging, &g_scalar, points, scalars)?)
}

impl Context {
    /// Verifies one signature. Requires the verification capability.
    ///
    /// Returns `Ok(false)` for any signature that does not verify, including
    /// ones whose `rx` is not below the field modulus or whose `s` is not
    /// below the group order.
    pub fn verify_1(
        &self,
        sig: &MusigSignature,
        msg: &[u8; MESSAGE_SIZE],
        pk: &PublicKey,
    ) -> Result<bool, MusigError> {
        self.require_verify()?;

        let Some(rx) = BaseField::from_be_bytes_checked(&sig.rx) else {
            return Ok(false);
        };
        let Some(s) = ScalarField::from_be_bytes_checked(&sig.s) else {
            return Ok(false);
        };

        let e = hash_challenge(&sig.rx, pk, msg);
        let r = double_scalar_mul_basepoint(&s, &-e, pk.as_affine()).to_affine();
        if r.is_infinity() || !r.has_quad_y() {
            return Ok(false);
        }
        Ok(r.x == rx)
    }

    /// Verifies a batch of signatures and taproot commitments at once with
    /// the default tweak hash.
    pub fn verify_batch(
        &self,
        scratch: &mut ScratchSpace,
        sigs: &SignatureBatch<'_>,
        taproot: &TaprootBatch<'_>,
    ) -> Result<bool, MusigError> {
        self.verify_batch_with(scratch, sigs, taproot, &TapTweakHash)
    }

    /// Verifies a batch of signatures and taproot commitments at once.
    ///
    /// The result is `true` only if every row of both batches is valid.
    /// Scratch memory that is too small, a failing tweak hash or any
    /// malformed signature all make the batch evaluate to `false`. Every
    /// scratch frame taken by the call is released before it returns.
    ///
    /// # Arguments
    ///
    /// * `scratch` - Memory for the staged equation and the multiplication
    ///   tables, see [`batch_scratch_size`]
    /// * `sigs` - Signatures with their messages and public keys
    /// * `taproot` - Taproot commitments to check alongside
    /// * `hasher` - Tweak hash used for the taproot rows
    ///
    /// # Returns
    ///
    /// An illegal-argument error for a context without the verification
    /// capability or for batch columns of different lengths.
    pub fn verify_batch_with<H: TweakHash + ?Sized>(
        &self,
        scratch: &mut ScratchSpace,
        sigs: &SignatureBatch<'_>,
        taproot: &TaprootBatch<'_>,
        hasher: &H,
    ) -> Result<bool, MusigError> {
        self.require_verify()?;
        self.arg_check(
            sigs.is_well_formed(),
            "signature batch columns differ in length",
        )?;
        self.arg_check(
            taproot.is_well_formed(),
            "taproot batch columns differ in length",
        )?;

        if sigs.is_empty() && taproot.is_empty() {
            return Ok(true);
        }

        match evaluate_batch(scratch, sigs, taproot, hasher) {
            Ok(sum) => Ok(sum.is_infinity()),
            Err(rejection) => {
                debug!(
                    signatures = sigs.len(),
                    taproot = taproot.len(),
                    %rejection,
                    "batch rejected"
                );
                Ok(false)
            }
        }
    }
}
