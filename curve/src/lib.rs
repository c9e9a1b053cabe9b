//! The secp256k1 elliptic curve group.
//!
//! This crate provides the base and scalar fields in Montgomery form, affine
//! and Jacobian points with SEC1 encodings, a fixed-base generator table, and
//! multi-scalar multiplication bounded by a caller-provided scratch arena.

mod affine;
mod basefield;
mod errors;
mod generator_table;
mod group;
mod montgomery;
mod msm;
mod projective;
mod random;
mod scalarfield;
mod scratch;

pub use affine::Affine;
pub use basefield::BaseField;
pub use errors::{CurveError, ScratchError};
pub use generator_table::mul_generator;
pub use group::{Group, ScalarBits};
pub use msm::{
    WNAF_MAX_DIGITS, WNAF_WINDOW, double_scalar_mul_basepoint, ecmult_multi, msm_working_size,
    wnaf_mul,
};
pub use projective::Projective;
pub use random::RandomField;
pub use scalarfield::ScalarField;
pub use scratch::{MAX_FRAMES, ScratchArray, ScratchElement, ScratchFrame, ScratchSpace};
