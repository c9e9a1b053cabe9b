//! Scalar field of the curve. n = 0xfffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141
//!
//! This implementation uses Montgomery form for efficient modular arithmetic.
//! The field element is represented as [u64; 4] in little-endian order.

use core::hash::{Hash, Hasher};
use num_bigint::BigUint;
use rand::Rng;
use rand::distr::{Distribution, StandardUniform};
use serde::{Deserialize, Serialize};

use crate::basefield::limbs_to_u32;
use crate::errors::CurveError;
use crate::group::ScalarBits;
use crate::montgomery::{self, Limbs, impl_field_ops};

/// Scalar field element for the curve
/// Represented in Montgomery form with [u64; 4]
#[derive(Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[u8; 32]", into = "[u8; 32]")]
pub struct ScalarField {
    /// Montgomery form: value * R mod n, where R = 2^256
    limbs: Limbs,
}

// Group order: n = 0xfffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141
pub(crate) const MODULUS: Limbs = [
    0xbfd25e8cd0364141,
    0xbaaedce6af48a03b,
    0xfffffffffffffffe,
    0xffffffffffffffff,
];

// R = 2^256 mod n (Montgomery parameter)
const R: Limbs = [
    0x402da1732fc9bebf,
    0x4551231950b75fc4,
    0x0000000000000001,
    0x0000000000000000,
];

// R^2 = 2^512 mod n (for Montgomery conversion)
const R2: Limbs = [
    0x896cf21467d7d140,
    0x741496c20e7cf878,
    0xe697f5e45bcd07c6,
    0x9d671cd581c69bc5,
];

// -n^{-1} mod 2^64 (Montgomery parameter mu)
const MU: u64 = 0x4b0dff665588b13f;

const N_MINUS_2: Limbs = [
    0xbfd25e8cd036413f,
    0xbaaedce6af48a03b,
    0xfffffffffffffffe,
    0xffffffffffffffff,
];

impl ScalarField {
    /// Zero element (in Montgomery form)
    pub const ZERO: Self = ScalarField {
        limbs: [0, 0, 0, 0],
    };

    /// One element (in Montgomery form: R mod n)
    pub const ONE: Self = ScalarField { limbs: R };

    /// Create a new scalar field element from a u64 value
    #[inline]
    pub fn from_canonical_u64(val: u64) -> Self {
        Self::from_canonical_limbs([val, 0, 0, 0])
    }

    /// Convert canonical limbs into Montgomery form. Inputs up to 2^256 - 1
    /// are reduced mod n.
    #[inline]
    pub fn from_canonical_limbs(limbs: Limbs) -> Self {
        ScalarField {
            limbs: montgomery::montgomery_mul(&limbs, &R2, &MODULUS, MU),
        }
    }

    /// Convert from Montgomery form to canonical form
    #[inline]
    pub fn to_canonical_limbs(&self) -> Limbs {
        montgomery::montgomery_mul(&self.limbs, &[1, 0, 0, 0], &MODULUS, MU)
    }

    /// Parses a 32-byte big-endian integer, rejecting values `>= n`.
    pub fn from_be_bytes_checked(bytes: &[u8; 32]) -> Option<Self> {
        let limbs = montgomery::limbs_from_be_bytes(bytes);
        if montgomery::is_less_than(&limbs, &MODULUS) {
            Some(Self::from_canonical_limbs(limbs))
        } else {
            None
        }
    }

    /// Interprets 32 big-endian bytes as an integer and reduces it mod n.
    ///
    /// Returns the reduced scalar and whether a reduction took place.
    pub fn from_be_bytes_reduced(bytes: &[u8; 32]) -> (Self, bool) {
        let limbs = montgomery::limbs_from_be_bytes(bytes);
        let overflow = !montgomery::is_less_than(&limbs, &MODULUS);
        (Self::from_canonical_limbs(limbs), overflow)
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        montgomery::limbs_to_be_bytes(&self.to_canonical_limbs())
    }

    #[inline]
    pub(crate) fn to_raw(&self) -> Limbs {
        self.limbs
    }

    #[inline]
    pub(crate) fn from_raw(limbs: Limbs) -> Self {
        ScalarField { limbs }
    }

    /// Check if this field element is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        montgomery::is_zero(&self.limbs)
    }

    /// Compute multiplicative inverse using Fermat's little theorem: a^{n-2}
    pub fn inverse(&self) -> Self {
        self.pow_vartime(&N_MINUS_2)
    }

    /// Variable-time exponentiation
    pub fn pow_vartime(&self, exp: &Limbs) -> Self {
        let mut result = Self::ONE;
        for &limb in exp.iter().rev() {
            for bit in (0..64).rev() {
                result = result * result;
                if (limb >> bit) & 1 == 1 {
                    result *= *self;
                }
            }
        }
        result
    }

    pub fn modulus() -> BigUint {
        BigUint::from_slice(&limbs_to_u32(&MODULUS))
    }

    pub fn as_canonical_biguint(&self) -> BigUint {
        BigUint::from_slice(&limbs_to_u32(&self.to_canonical_limbs()))
    }

    #[inline]
    fn add_limbs(&self, rhs: &Self) -> Self {
        ScalarField {
            limbs: montgomery::add_mod(&self.limbs, &rhs.limbs, &MODULUS),
        }
    }

    #[inline]
    fn sub_limbs(&self, rhs: &Self) -> Self {
        ScalarField {
            limbs: montgomery::sub_mod(&self.limbs, &rhs.limbs, &MODULUS),
        }
    }

    #[inline]
    fn neg_limbs(&self) -> Self {
        ScalarField {
            limbs: montgomery::neg_mod(&self.limbs, &MODULUS),
        }
    }

    #[inline]
    fn mul_limbs(&self, rhs: &Self) -> Self {
        ScalarField {
            limbs: montgomery::montgomery_mul(&self.limbs, &rhs.limbs, &MODULUS, MU),
        }
    }
}

impl_field_ops!(ScalarField);

impl ScalarBits for ScalarField {
    #[inline]
    fn to_u64_limbs(&self) -> [u64; 4] {
        self.to_canonical_limbs()
    }
}

impl Hash for ScalarField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.limbs.hash(state);
    }
}

impl TryFrom<[u8; 32]> for ScalarField {
    type Error = CurveError;

    fn try_from(bytes: [u8; 32]) -> Result<Self, Self::Error> {
        Self::from_be_bytes_checked(&bytes).ok_or(CurveError::ScalarOutOfRange)
    }
}

impl From<ScalarField> for [u8; 32] {
    fn from(value: ScalarField) -> Self {
        value.to_be_bytes()
    }
}

impl Distribution<ScalarField> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ScalarField {
        loop {
            let bytes: [u8; 32] = rng.random();
            if let Some(value) = ScalarField::from_be_bytes_checked(&bytes) {
                return value;
            }
        }
    }
}
