//! Per-participant secret key tweaking.

use crate::aggregation::{key_coefficient, key_list_hash};
use crate::context::Context;
use crate::errors::MusigError;
use crate::keys::{PublicKey, SecretKey};

impl Context {
    /// Returns `c_index * sk`, the secret key matching the participant's
    /// weighted key in [`Context::pubkey_combine`].
    ///
    /// `pubkeys` must be the same ordered list used for aggregation. No
    /// capability is required.
    ///
    /// # Returns
    ///
    /// * an illegal-argument error if `pubkeys` is empty or `index` is out of range
    /// * `MusigError::ZeroResult` if the product is zero
    pub fn tweak_secret_key(
        &self,
        sk: &SecretKey,
        pubkeys: &[PublicKey],
        index: usize,
    ) -> Result<SecretKey, MusigError> {
        self.arg_check(!pubkeys.is_empty(), "at least one public key is required")?;
        self.arg_check(index < pubkeys.len(), "key index out of range")?;

        let ell = key_list_hash(pubkeys);
        let coefficient = key_coefficient(&ell, &pubkeys[index]);
        SecretKey::from_scalar(coefficient * *sk.scalar()).ok_or(MusigError::ZeroResult)
    }
}
