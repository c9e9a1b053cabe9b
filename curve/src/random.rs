use rand::Rng;
use rand::distr::{Distribution, StandardUniform};

use crate::{BaseField, ScalarField};

/// Uniform sampling of field elements by rejection.
pub trait RandomField: Sized {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self;

    /// Samples until the value is nonzero, as required for secret keys.
    fn random_nonzero<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

impl RandomField for BaseField {
    #[inline]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardUniform.sample(rng)
    }

    fn random_nonzero<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let value: BaseField = StandardUniform.sample(rng);
            if !value.is_zero() {
                return value;
            }
        }
    }
}

impl RandomField for ScalarField {
    #[inline]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardUniform.sample(rng)
    }

    fn random_nonzero<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let value: ScalarField = StandardUniform.sample(rng);
            if !value.is_zero() {
                return value;
            }
        }
    }
}
