//! MuSig key aggregation and Schnorr signatures over secp256k1.
//!
//! This library provides:
//! - Key aggregation: many public keys combine into one key that every
//!   participant can sign for after tweaking their secret key
//! - Single-key Schnorr signing with a pluggable nonce function
//! - Taproot output keys committing to a 32-byte value
//! - Single and batch verification, where a batch of signatures and taproot
//!   commitments is checked with one multi-scalar multiplication in bounded
//!   scratch memory
//!
//! Every operation goes through a [`Context`], which records whether it may
//! sign, verify, both or neither, and reports illegal arguments to a
//! [`DiagnosticSink`].
//!
//! # Example
//!
//! ```
//! use musig::{
//!     Context, ScratchSpace, SecretKey, SignatureBatch, TaprootBatch, batch_scratch_size,
//! };
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let ctx = Context::all();
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let sks: Vec<SecretKey> = (0..3).map(|_| SecretKey::random(&mut rng)).collect();
//! let pks: Vec<_> = sks.iter().map(SecretKey::public_key).collect();
//! let combined = ctx.pubkey_combine(&pks).expect("combine");
//!
//! // Each participant signs with its tweaked secret key
//! let msg = [7u8; 32];
//! let sigs: Vec<_> = (0..3)
//!     .map(|i| {
//!         let tweaked = ctx.tweak_secret_key(&sks[i], &pks, i).expect("tweak");
//!         ctx.sign(&msg, &tweaked).expect("sign")
//!     })
//!     .collect();
//!
//! let messages = [msg; 3];
//! let batch = SignatureBatch::new(&sigs, &messages, &combined.tweaked_keys);
//! let mut scratch = ScratchSpace::new(batch_scratch_size(3, 0));
//! let ok = ctx
//!     .verify_batch(&mut scratch, &batch, &TaprootBatch::empty())
//!     .expect("verify");
//! assert!(ok);
//! ```

mod aggregation;
mod constants;
mod context;
mod errors;
mod hashes;
mod keys;
mod serde_util;
mod sign;
mod signatures;
mod taproot;
mod tweak;
mod verify;

#[cfg(test)]
mod tests;

pub use aggregation::AggregatedKey;
pub use constants::{
    DEFAULT_SCRATCH_SIZE, MESSAGE_SIZE, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE, SIGNATURE_SIZE,
    UNCOMPRESSED_PUBLIC_KEY_SIZE,
};
pub use context::{Capability, Context, CountingSink, DiagnosticSink, TracingSink};
pub use curve::{ScratchError, ScratchSpace};
pub use errors::MusigError;
pub use hashes::{sha256, tagged_hash};
pub use keys::{PublicKey, SecretKey};
pub use sign::{DeterministicNonce, NonceFunction};
pub use signatures::MusigSignature;
pub use taproot::{TapTweakHash, TweakHash, taproot_hash_default};
pub use verify::{SignatureBatch, TaprootBatch, batch_scratch_size, batch_staging_size};
