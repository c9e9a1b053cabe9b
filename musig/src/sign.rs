//! Single-key Schnorr signing.
//!
//! Signing is not constant-time. The nonce and the secret key are multiplied
//! with the variable-time generator table, so execution time depends on their
//! values.

use curve::{Affine, ScalarField};
use sha2::{Digest, Sha256};

use crate::constants::MESSAGE_SIZE;
use crate::context::Context;
use crate::errors::MusigError;
use crate::keys::SecretKey;
use crate::signatures::{MusigSignature, hash_challenge};

/// Source of signing nonces.
///
/// Returns 32 bytes interpreted as a big-endian integer and reduced mod n,
/// or `None` on failure. Closures with the matching signature implement
/// this trait.
pub trait NonceFunction {
    fn nonce(
        &self,
        sk: &[u8; 32],
        msg: &[u8; MESSAGE_SIZE],
        aux: Option<&[u8]>,
    ) -> Option<[u8; 32]>;
}

impl<F> NonceFunction for F
where
    F: Fn(&[u8; 32], &[u8; MESSAGE_SIZE], Option<&[u8]>) -> Option<[u8; 32]>,
{
    fn nonce(
        &self,
        sk: &[u8; 32],
        msg: &[u8; MESSAGE_SIZE],
        aux: Option<&[u8]>,
    ) -> Option<[u8; 32]> {
        self(sk, msg, aux)
    }
}

/// Default nonce: `SHA256(sk || msg)`, followed by `aux` when given.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeterministicNonce;

impl NonceFunction for DeterministicNonce {
    fn nonce(
        &self,
        sk: &[u8; 32],
        msg: &[u8; MESSAGE_SIZE],
        aux: Option<&[u8]>,
    ) -> Option<[u8; 32]> {
        let mut hasher = Sha256::new();
        hasher.update(sk);
        hasher.update(msg);
        if let Some(aux) = aux {
            hasher.update(aux);
        }
        Some(hasher.finalize().into())
    }
}

impl Context {
    /// Signs a 32-byte message with the deterministic nonce.
    ///
    /// Requires the signing capability.
    ///
    /// # Example
    ///
    /// ```
    /// use musig::{Context, SecretKey};
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let ctx = Context::all();
    /// let sk = SecretKey::random(&mut StdRng::seed_from_u64(7));
    /// let msg = [0x42u8; 32];
    ///
    /// let sig = ctx.sign(&msg, &sk).expect("sign");
    /// assert!(ctx.verify_1(&sig, &msg, &sk.public_key()).expect("verify"));
    /// ```
    pub fn sign(
        &self,
        msg: &[u8; MESSAGE_SIZE],
        sk: &SecretKey,
    ) -> Result<MusigSignature, MusigError> {
        self.sign_with(msg, sk, &DeterministicNonce, None)
    }

    /// Signs with a caller-supplied nonce function.
    ///
    /// The nonce point R is normalized so that its y coordinate is a
    /// quadratic residue, negating the nonce when needed. The signature is
    /// `(R.x, k + e * sk)` with `e = SHA256(R.x || P || msg)`.
    ///
    /// # Returns
    ///
    /// * an illegal-argument error for a context without the signing capability
    /// * `MusigError::NonceGenerationFailed` if the nonce function returns `None`
    /// * `MusigError::ZeroNonce` if the nonce reduces to zero
    ///
    /// # Security
    ///
    /// Not constant-time: do not sign where an attacker can measure the
    /// signer's timing.
    pub fn sign_with<N: NonceFunction + ?Sized>(
        &self,
        msg: &[u8; MESSAGE_SIZE],
        sk: &SecretKey,
        nonce_fn: &N,
        aux: Option<&[u8]>,
    ) -> Result<MusigSignature, MusigError> {
        self.require_sign()?;

        let nonce_bytes = nonce_fn
            .nonce(&sk.to_bytes(), msg, aux)
            .ok_or(MusigError::NonceGenerationFailed)?;
        let (mut k, _) = ScalarField::from_be_bytes_reduced(&nonce_bytes);
        if k.is_zero() {
            return Err(MusigError::ZeroNonce);
        }

        let r = Affine::mul_generator(&k);
        if !r.has_quad_y() {
            k = -k;
        }

        let rx = r.x.to_be_bytes();
        let e = hash_challenge(&rx, &sk.public_key(), msg);
        let s = k + e * *sk.scalar();

        Ok(MusigSignature {
            rx,
            s: s.to_be_bytes(),
        })
    }
}
