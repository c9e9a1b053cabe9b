//! Base field of secp256k1. p = 2^256 - 2^32 - 977
//!
//! Elements are kept in Montgomery form as [u64; 4] in little-endian order.

use core::hash::{Hash, Hasher};
use num_bigint::BigUint;
use rand::Rng;
use rand::distr::{Distribution, StandardUniform};
use serde::{Deserialize, Serialize};

use crate::errors::CurveError;
use crate::montgomery::{self, Limbs, impl_field_ops};

/// Base field element of the curve.
#[derive(Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[u8; 32]", into = "[u8; 32]")]
pub struct BaseField {
    /// Montgomery form: value * R mod p, where R = 2^256
    limbs: Limbs,
}

pub(crate) const MODULUS: Limbs = [
    0xfffffffefffffc2f,
    0xffffffffffffffff,
    0xffffffffffffffff,
    0xffffffffffffffff,
];

// R = 2^256 mod p
const R: Limbs = [0x00000001000003d1, 0, 0, 0];

// R^2 = 2^512 mod p
const R2: Limbs = [0x000007a2000e90a1, 0x1, 0, 0];

// -p^{-1} mod 2^64
const MU: u64 = 0xd838091dd2253531;

const P_MINUS_2: Limbs = [
    0xfffffffefffffc2d,
    0xffffffffffffffff,
    0xffffffffffffffff,
    0xffffffffffffffff,
];

// (p + 1) / 4, the square root exponent since p = 3 mod 4
const SQRT_EXP: Limbs = [
    0xffffffffbfffff0c,
    0xffffffffffffffff,
    0xffffffffffffffff,
    0x3fffffffffffffff,
];

// (p - 1) / 2, the Euler criterion exponent
const LEGENDRE_EXP: Limbs = [
    0xffffffff7ffffe17,
    0xffffffffffffffff,
    0xffffffffffffffff,
    0x7fffffffffffffff,
];

impl BaseField {
    pub const ZERO: Self = BaseField { limbs: [0, 0, 0, 0] };

    pub const ONE: Self = BaseField { limbs: R };

    /// Builds an element straight from Montgomery limbs.
    #[inline]
    pub(crate) const fn from_montgomery(limbs: Limbs) -> Self {
        BaseField { limbs }
    }

    #[inline]
    pub fn from_canonical_u64(val: u64) -> Self {
        Self::from_canonical_limbs([val, 0, 0, 0])
    }

    /// Converts canonical limbs into Montgomery form, reducing mod p.
    #[inline]
    pub fn from_canonical_limbs(limbs: Limbs) -> Self {
        BaseField {
            limbs: montgomery::montgomery_mul(&limbs, &R2, &MODULUS, MU),
        }
    }

    #[inline]
    pub fn to_canonical_limbs(&self) -> Limbs {
        montgomery::montgomery_mul(&self.limbs, &[1, 0, 0, 0], &MODULUS, MU)
    }

    /// Parses a 32-byte big-endian integer, rejecting values `>= p`.
    pub fn from_be_bytes_checked(bytes: &[u8; 32]) -> Option<Self> {
        let limbs = montgomery::limbs_from_be_bytes(bytes);
        if montgomery::is_less_than(&limbs, &MODULUS) {
            Some(Self::from_canonical_limbs(limbs))
        } else {
            None
        }
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        montgomery::limbs_to_be_bytes(&self.to_canonical_limbs())
    }

    /// Raw Montgomery limbs, for lossless in-memory encodings.
    #[inline]
    pub(crate) fn to_raw(&self) -> Limbs {
        self.limbs
    }

    #[inline]
    pub(crate) fn from_raw(limbs: Limbs) -> Self {
        BaseField { limbs }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        montgomery::is_zero(&self.limbs)
    }

    #[inline]
    pub fn is_odd(&self) -> bool {
        self.to_canonical_limbs()[0] & 1 == 1
    }

    #[inline]
    pub fn square(&self) -> Self {
        *self * *self
    }

    #[inline]
    pub fn double(&self) -> Self {
        *self + *self
    }

    /// Multiplicative inverse via Fermat, a^(p-2). Zero maps to zero.
    pub fn inverse(&self) -> Self {
        self.pow_vartime(&P_MINUS_2)
    }

    /// Square root, if one exists.
    pub fn sqrt(&self) -> Option<Self> {
        let candidate = self.pow_vartime(&SQRT_EXP);
        if candidate.square() == *self {
            Some(candidate)
        } else {
            None
        }
    }

    /// Euler criterion. Zero is not counted as a residue.
    pub fn is_quadratic_residue(&self) -> bool {
        self.pow_vartime(&LEGENDRE_EXP) == Self::ONE
    }

    pub fn pow_vartime(&self, exp: &Limbs) -> Self {
        let mut result = Self::ONE;
        for &limb in exp.iter().rev() {
            for bit in (0..64).rev() {
                result = result.square();
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
        BaseField {
            limbs: montgomery::add_mod(&self.limbs, &rhs.limbs, &MODULUS),
        }
    }

    #[inline]
    fn sub_limbs(&self, rhs: &Self) -> Self {
        BaseField {
            limbs: montgomery::sub_mod(&self.limbs, &rhs.limbs, &MODULUS),
        }
    }

    #[inline]
    fn neg_limbs(&self) -> Self {
        BaseField {
            limbs: montgomery::neg_mod(&self.limbs, &MODULUS),
        }
    }

    #[inline]
    fn mul_limbs(&self, rhs: &Self) -> Self {
        BaseField {
            limbs: montgomery::montgomery_mul(&self.limbs, &rhs.limbs, &MODULUS, MU),
        }
    }
}

pub(crate) fn limbs_to_u32(limbs: &Limbs) -> [u32; 8] {
    let mut out = [0u32; 8];
    for (i, limb) in limbs.iter().enumerate() {
        out[2 * i] = *limb as u32;
        out[2 * i + 1] = (*limb >> 32) as u32;
    }
    out
}

impl_field_ops!(BaseField);

impl Hash for BaseField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.limbs.hash(state);
    }
}

impl TryFrom<[u8; 32]> for BaseField {
    type Error = CurveError;

    fn try_from(bytes: [u8; 32]) -> Result<Self, Self::Error> {
        Self::from_be_bytes_checked(&bytes).ok_or(CurveError::FieldOutOfRange)
    }
}

impl From<BaseField> for [u8; 32] {
    fn from(value: BaseField) -> Self {
        value.to_be_bytes()
    }
}

impl Distribution<BaseField> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BaseField {
        loop {
            let bytes: [u8; 32] = rng.random();
            if let Some(value) = BaseField::from_be_bytes_checked(&bytes) {
                return value;
            }
        }
    }
}
