use thiserror::Error;

/// Errors raised while decoding field elements and curve points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CurveError {
    #[error("field element is not below the field modulus")]
    FieldOutOfRange,

    #[error("scalar is not below the group order")]
    ScalarOutOfRange,

    #[error("invalid point encoding of {0} bytes")]
    InvalidEncoding(usize),

    #[error("point is not on the curve")]
    NotOnCurve,
}

/// Errors raised by the scratch arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScratchError {
    #[error("scratch space exhausted: requested {requested} bytes, {available} available")]
    Exhausted { requested: usize, available: usize },

    #[error("scratch frame limit of {0} reached")]
    TooManyFrames(usize),

    #[error("no scratch frame is active")]
    NoFrame,
}
