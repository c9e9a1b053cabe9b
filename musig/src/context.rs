//! Capability-tagged contexts and the diagnostics they carry.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::MusigError;

/// What a [`Context`] is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    None,
    SignOnly,
    VerifyOnly,
    All,
}

impl Capability {
    #[inline]
    pub fn can_sign(self) -> bool {
        matches!(self, Capability::SignOnly | Capability::All)
    }

    #[inline]
    pub fn can_verify(self) -> bool {
        matches!(self, Capability::VerifyOnly | Capability::All)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::None => "none",
            Capability::SignOnly => "signing",
            Capability::VerifyOnly => "verification",
            Capability::All => "signing and verification",
        };
        f.write_str(name)
    }
}

/// Receives a message each time an operation rejects an illegal argument.
pub trait DiagnosticSink: Send + Sync {
    fn illegal_argument(&self, message: &str);
}

/// Default sink: logs through `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn illegal_argument(&self, message: &str) {
        warn!(target: "musig", %message, "illegal argument");
    }
}

/// Sink that only counts how often it was called.
#[derive(Debug, Default)]
pub struct CountingSink {
    count: AtomicUsize,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl DiagnosticSink for CountingSink {
    fn illegal_argument(&self, _message: &str) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Entry point for every MuSig operation.
///
/// A context records which classes of operation it may perform and where
/// illegal-argument diagnostics go. Cloning is cheap and clones share the
/// sink.
///
/// # Example
///
/// ```
/// use musig::{Capability, Context};
///
/// let signer = Context::signing_only();
/// assert!(signer.capability().can_sign());
/// assert!(!signer.capability().can_verify());
///
/// let ctx = Context::new(Capability::All);
/// assert!(ctx.capability().can_verify());
/// ```
#[derive(Clone)]
pub struct Context {
    capability: Capability,
    sink: Arc<dyn DiagnosticSink>,
}

impl Context {
    pub fn new(capability: Capability) -> Self {
        Context {
            capability,
            sink: Arc::new(TracingSink),
        }
    }

    pub fn none() -> Self {
        Self::new(Capability::None)
    }

    pub fn signing_only() -> Self {
        Self::new(Capability::SignOnly)
    }

    pub fn verification_only() -> Self {
        Self::new(Capability::VerifyOnly)
    }

    pub fn all() -> Self {
        Self::new(Capability::All)
    }

    /// Replaces the diagnostic sink.
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    #[inline]
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Reports `err` to the sink and hands it back.
    pub(crate) fn illegal(&self, err: MusigError) -> MusigError {
        self.sink.illegal_argument(&err.to_string());
        err
    }

    /// Fails with an illegal argument unless `condition` holds.
    pub(crate) fn arg_check(&self, condition: bool, message: &'static str) -> Result<(), MusigError> {
        if condition {
            Ok(())
        } else {
            Err(self.illegal(MusigError::IllegalArgument(message)))
        }
    }

    pub(crate) fn require_sign(&self) -> Result<(), MusigError> {
        if self.capability.can_sign() {
            return Ok(());
        }
        Err(self.illegal(MusigError::IncapableContext {
            required: Capability::SignOnly,
            actual: self.capability,
        }))
    }

    pub(crate) fn require_verify(&self) -> Result<(), MusigError> {
        if self.capability.can_verify() {
            return Ok(());
        }
        Err(self.illegal(MusigError::IncapableContext {
            required: Capability::VerifyOnly,
            actual: self.capability,
        }))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}
