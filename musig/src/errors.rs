//! Error types for MuSig key aggregation, signing and verification.

use thiserror::Error;

use crate::context::Capability;

/// Errors returned by the MuSig operations.
///
/// Two classes exist. Illegal arguments (a context without the required
/// capability, an empty key list, mismatched batch columns) are reported to
/// the context's diagnostic sink before they are returned. Every other variant
/// is a cryptographic failure and is returned silently. A signature that does
/// not verify is not an error at all: verification returns `Ok(false)`.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MusigError {
    /// The context was created without the capability this operation needs.
    #[error("context capability {actual} does not allow {required} operations")]
    IncapableContext {
        required: Capability,
        actual: Capability,
    },

    /// An argument violates the operation's contract.
    #[error("illegal argument: {0}")]
    IllegalArgument(&'static str),

    #[error("invalid public key encoding")]
    InvalidPublicKey,

    /// A secret key must be a nonzero scalar below the group order.
    #[error("invalid secret key")]
    InvalidSecretKey,

    /// A tweak must be below the group order.
    #[error("tweak is not below the group order")]
    InvalidTweak,

    #[error("taproot tweak hash function failed")]
    TweakHashFailed,

    #[error("operation produced the point at infinity")]
    InfiniteResult,

    #[error("operation produced a zero scalar")]
    ZeroResult,

    #[error("nonce function failed")]
    NonceGenerationFailed,

    #[error("nonce function produced a zero nonce")]
    ZeroNonce,

    #[error("invalid signature length {0}, expected 64")]
    InvalidSignatureLength(usize),

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl MusigError {
    /// True for the errors that are reported to the diagnostic sink.
    pub fn is_illegal_argument(&self) -> bool {
        matches!(
            self,
            MusigError::IncapableContext { .. } | MusigError::IllegalArgument(_)
        )
    }
}
