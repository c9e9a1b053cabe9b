//! Constants used by the MuSig implementation.

/// Size of a serialized signature: `R.x || s`.
pub const SIGNATURE_SIZE: usize = 64;

/// Size of a serialized secret key.
pub const SECRET_KEY_SIZE: usize = 32;

/// Size of a SEC1 compressed public key.
pub const PUBLIC_KEY_SIZE: usize = 33;

/// Size of a SEC1 uncompressed public key.
pub const UNCOMPRESSED_PUBLIC_KEY_SIZE: usize = 65;

/// Messages are 32-byte digests.
pub const MESSAGE_SIZE: usize = 32;

/// Scratch capacity that comfortably covers a few hundred batched
/// signatures.
pub const DEFAULT_SCRATCH_SIZE: usize = 1 << 20;

/// Tag for the per-key aggregation coefficient.
pub(crate) const COEFFICIENT_TAG: &str = "MuSig coefficient";

/// Tag for the default taproot tweak hash.
pub(crate) const TAPTWEAK_TAG: &str = "TapTweak";

/// Tag for the batch verification randomizer seed.
pub(crate) const BATCH_TAG: &str = "MuSig batch";
