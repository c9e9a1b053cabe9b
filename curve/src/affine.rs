// secp256k1 : y^2 = x^3 + 7 over GF(p), p = 2^256 - 2^32 - 977
// Group order n (prime): 0xfffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141
// Cofactor: 1
// Generator (SEC 2):
//   x = 0x79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798
//   y = 0x483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8

use crate::basefield::BaseField;
use crate::errors::CurveError;
use crate::msm::wnaf_mul;
use crate::{Group, Projective, ScalarField, mul_generator};
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};

/// Tag bytes of the SEC1 point encodings.
pub const TAG_EVEN: u8 = 0x02;
pub const TAG_ODD: u8 = 0x03;
pub const TAG_UNCOMPRESSED: u8 = 0x04;
pub const TAG_HYBRID_EVEN: u8 = 0x06;
pub const TAG_HYBRID_ODD: u8 = 0x07;

/// Affine point on the elliptic curve.
/// Represents a point in affine coordinates (x, y) or the point at infinity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affine {
    pub x: BaseField,
    pub y: BaseField,
    /// Whether this point is the point at infinity (identity element)
    pub is_infinity: bool,
}

const GENERATOR: Affine = Affine {
    x: BaseField::from_montgomery([
        0xd7362e5a487e2097,
        0x231e295329bc66db,
        0x979f48c033fd129c,
        0x9981e643e9089f48,
    ]),
    y: BaseField::from_montgomery([
        0xb15ea6d2d3dbabe2,
        0x8dfc5d5d1f1dc64d,
        0x70b6b59aac19c136,
        0xcf3f851fd4a582d6,
    ]),
    is_infinity: false,
};

// b = 7 in Montgomery form
const CURVE_B: BaseField = BaseField::from_montgomery([0x0000000700001ab7, 0, 0, 0]);

impl Affine {
    /// The point at infinity (identity element)
    pub const INFINITY: Self = Affine {
        x: BaseField::ZERO,
        y: BaseField::ZERO,
        is_infinity: true,
    };

    pub fn new(x: BaseField, y: BaseField) -> Self {
        Affine {
            x,
            y,
            is_infinity: false,
        }
    }

    #[inline]
    pub(crate) fn curve_b() -> BaseField {
        CURVE_B
    }

    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.is_infinity
    }

    /// Check if a point is on the curve: y^2 = x^3 + 7.
    pub fn is_on_curve(&self) -> bool {
        if self.is_infinity {
            return true;
        }
        self.y.square() == self.x.square() * self.x + CURVE_B
    }

    pub fn generator() -> Self {
        GENERATOR
    }

    /// Finds the point with the given x-coordinate and y-parity.
    pub fn lift_x(x: &BaseField, odd: bool) -> Option<Self> {
        let rhs = x.square() * *x + CURVE_B;
        let y = rhs.sqrt()?;
        let y = if y.is_odd() == odd { y } else { -y };
        Some(Affine::new(*x, y))
    }

    /// Finds the point with the given x-coordinate whose y is a quadratic
    /// residue.
    pub fn lift_x_quad(x: &BaseField) -> Option<Self> {
        let rhs = x.square() * *x + CURVE_B;
        // (p + 1) / 4 is even, so the root returned by sqrt is itself a square.
        let y = rhs.sqrt()?;
        Some(Affine::new(*x, y))
    }

    #[inline]
    pub fn has_odd_y(&self) -> bool {
        self.y.is_odd()
    }

    #[inline]
    pub fn has_quad_y(&self) -> bool {
        !self.is_infinity && self.y.is_quadratic_residue()
    }

    /// Point doubling: 2*P.
    pub fn double(&self) -> Self {
        if self.is_infinity || self.y.is_zero() {
            return Self::INFINITY;
        }

        // λ = 3x^2 / 2y
        let x2 = self.x.square();
        let numerator = x2 + x2 + x2;
        let lambda = numerator * self.y.double().inverse();

        let x_r = lambda.square() - self.x.double();
        let y_r = lambda * (self.x - x_r) - self.y;

        Affine::new(x_r, y_r)
    }

    pub fn negate(&self) -> Self {
        if self.is_infinity {
            return *self;
        }
        Affine::new(self.x, -self.y)
    }

    /// Multiply the fixed generator using a precomputed table.
    pub fn mul_generator(scalar: &ScalarField) -> Self {
        mul_generator(scalar).to_affine()
    }

    /// Decodes a SEC1 compressed (33 bytes), uncompressed or hybrid (65 bytes)
    /// point. The point at infinity has no encoding.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CurveError> {
        let coordinate = |slice: &[u8]| -> Result<BaseField, CurveError> {
            let mut buf = [0u8; 32];
            buf.copy_from_slice(slice);
            BaseField::from_be_bytes_checked(&buf).ok_or(CurveError::NotOnCurve)
        };

        match (bytes.len(), bytes.first().copied()) {
            (33, Some(tag @ (TAG_EVEN | TAG_ODD))) => {
                let x = coordinate(&bytes[1..33])?;
                Self::lift_x(&x, tag == TAG_ODD).ok_or(CurveError::NotOnCurve)
            }
            (65, Some(tag @ (TAG_UNCOMPRESSED | TAG_HYBRID_EVEN | TAG_HYBRID_ODD))) => {
                let point = Affine::new(coordinate(&bytes[1..33])?, coordinate(&bytes[33..65])?);
                if tag != TAG_UNCOMPRESSED && point.has_odd_y() != (tag == TAG_HYBRID_ODD) {
                    return Err(CurveError::NotOnCurve);
                }
                if !point.is_on_curve() {
                    return Err(CurveError::NotOnCurve);
                }
                Ok(point)
            }
            (len, _) => Err(CurveError::InvalidEncoding(len)),
        }
    }

    /// SEC1 compressed encoding. The point at infinity encodes as all zeros.
    pub fn to_compressed(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        if self.is_infinity {
            return out;
        }
        out[0] = if self.has_odd_y() { TAG_ODD } else { TAG_EVEN };
        out[1..].copy_from_slice(&self.x.to_be_bytes());
        out
    }

    /// SEC1 uncompressed encoding. The point at infinity encodes as all zeros.
    pub fn to_uncompressed(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        if self.is_infinity {
            return out;
        }
        out[0] = TAG_UNCOMPRESSED;
        out[1..33].copy_from_slice(&self.x.to_be_bytes());
        out[33..].copy_from_slice(&self.y.to_be_bytes());
        out
    }
}

impl Group for Affine {
    type Scalar = ScalarField;

    #[inline]
    fn identity() -> Self {
        Self::INFINITY
    }

    #[inline]
    fn is_identity(&self) -> bool {
        self.is_infinity
    }

    #[inline]
    fn generator() -> Self {
        GENERATOR
    }

    #[inline]
    fn mul_generator(scalar: &ScalarField) -> Self {
        Affine::mul_generator(scalar)
    }

    #[inline]
    fn double(&self) -> Self {
        Self::double(self)
    }

    #[inline]
    fn negate(&self) -> Self {
        Self::negate(self)
    }
}

impl Add for Affine {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        if self.is_infinity {
            return other;
        }
        if other.is_infinity {
            return self;
        }

        if self.x == other.x {
            if self.y == other.y {
                return self.double();
            }
            return Self::INFINITY;
        }

        // λ = (y2 - y1) / (x2 - x1)
        let lambda = (other.y - self.y) * (other.x - self.x).inverse();
        let x_r = lambda.square() - self.x - other.x;
        let y_r = lambda * (self.x - x_r) - self.y;

        Affine::new(x_r, y_r)
    }
}

impl AddAssign for Affine {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Sub for Affine {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + other.negate()
    }
}

impl SubAssign for Affine {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Affine {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

impl Mul<ScalarField> for Affine {
    type Output = Self;

    fn mul(self, scalar: ScalarField) -> Self {
        wnaf_mul(&Projective::from_affine(&self), &scalar).to_affine()
    }
}

impl Mul<&ScalarField> for Affine {
    type Output = Self;

    fn mul(self, scalar: &ScalarField) -> Self {
        wnaf_mul(&Projective::from_affine(&self), scalar).to_affine()
    }
}

impl Mul<Affine> for ScalarField {
    type Output = Affine;

    fn mul(self, point: Affine) -> Affine {
        point * self
    }
}
