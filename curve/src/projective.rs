use crate::affine::Affine;
use crate::basefield::BaseField;
use crate::msm::wnaf_mul;
use crate::{Group, ScalarField, mul_generator};
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Point in Jacobian coordinates (X:Y:Z) where (x,y) = (X/Z^2, Y/Z^3).
/// The point at infinity is represented with Z = 0.
#[derive(Copy, Clone, Debug)]
pub struct Projective {
    pub x: BaseField,
    pub y: BaseField,
    pub z: BaseField,
}

impl Projective {
    /// The point at infinity (identity element): (0:1:0)
    pub const INFINITY: Self = Projective {
        x: BaseField::ZERO,
        y: BaseField::ONE,
        z: BaseField::ZERO,
    };

    pub fn new(x: BaseField, y: BaseField, z: BaseField) -> Self {
        Projective { x, y, z }
    }

    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    pub fn to_affine(&self) -> Affine {
        if self.is_infinity() {
            return Affine::INFINITY;
        }

        let z_inv = self.z.inverse();
        let z_inv2 = z_inv.square();
        Affine::new(self.x * z_inv2, self.y * z_inv2 * z_inv)
    }

    pub fn from_affine(point: &Affine) -> Self {
        if point.is_infinity() {
            return Self::INFINITY;
        }
        Projective::new(point.x, point.y, BaseField::ONE)
    }

    /// Check if a point is on the curve: Y^2 = X^3 + 7*Z^6.
    pub fn is_on_curve(&self) -> bool {
        if self.is_infinity() {
            return true;
        }
        let z2 = self.z.square();
        let z6 = z2.square() * z2;
        self.y.square() == self.x.square() * self.x + Affine::curve_b() * z6
    }

    pub fn generator() -> Self {
        Self::from_affine(&Affine::generator())
    }

    /// Point doubling for a = 0 (dbl-2009-l).
    pub fn double(&self) -> Self {
        if self.is_infinity() || self.y.is_zero() {
            return Self::INFINITY;
        }

        let xx = self.x.square();
        let yy = self.y.square();
        let yyyy = yy.square();
        // S = 4 * X * Y^2
        let s = (self.x * yy).double().double();
        // M = 3 * X^2
        let m = xx.double() + xx;

        let x3 = m.square() - s.double();
        let y3 = m * (s - x3) - yyyy.double().double().double();
        let z3 = (self.y * self.z).double();

        Projective::new(x3, y3, z3)
    }

    pub fn negate(&self) -> Self {
        Projective::new(self.x, -self.y, self.z)
    }

    /// Mixed addition with an affine point (madd-2004-hmv).
    pub fn add_affine(&self, other: &Affine) -> Self {
        if other.is_infinity() {
            return *self;
        }
        if self.is_infinity() {
            return Self::from_affine(other);
        }

        let z1z1 = self.z.square();
        let u2 = other.x * z1z1;
        let s2 = other.y * z1z1 * self.z;
        let h = u2 - self.x;
        let r = s2 - self.y;

        if h.is_zero() {
            if r.is_zero() {
                return self.double();
            }
            return Self::INFINITY;
        }

        let hh = h.square();
        let hhh = hh * h;
        let v = self.x * hh;

        let x3 = r.square() - hhh - v.double();
        let y3 = r * (v - x3) - self.y * hhh;
        let z3 = self.z * h;

        Projective::new(x3, y3, z3)
    }

    /// Multiply the fixed generator using the precomputed comb table.
    pub fn mul_generator(scalar: &ScalarField) -> Self {
        mul_generator(scalar)
    }

    /// Converts many points to affine with a single field inversion.
    pub fn batch_normalize(points: &[Self]) -> Vec<Affine> {
        let mut prefix = Vec::with_capacity(points.len());
        let mut acc = BaseField::ONE;
        for point in points {
            prefix.push(acc);
            if !point.is_infinity() {
                acc *= point.z;
            }
        }

        let mut inv = acc.inverse();
        let mut out = vec![Affine::INFINITY; points.len()];
        for (i, point) in points.iter().enumerate().rev() {
            if point.is_infinity() {
                continue;
            }
            let z_inv = inv * prefix[i];
            inv *= point.z;
            let z_inv2 = z_inv.square();
            out[i] = Affine::new(point.x * z_inv2, point.y * z_inv2 * z_inv);
        }
        out
    }
}

impl PartialEq for Projective {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_infinity(), other.is_infinity()) {
            (true, true) => return true,
            (true, false) | (false, true) => return false,
            (false, false) => {}
        }

        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        self.x * z2z2 == other.x * z1z1
            && self.y * z2z2 * other.z == other.y * z1z1 * self.z
    }
}

impl Eq for Projective {}

impl Group for Projective {
    type Scalar = ScalarField;

    #[inline]
    fn identity() -> Self {
        Self::INFINITY
    }

    #[inline]
    fn is_identity(&self) -> bool {
        self.is_infinity()
    }

    #[inline]
    fn generator() -> Self {
        Projective::generator()
    }

    #[inline]
    fn mul_generator(scalar: &ScalarField) -> Self {
        mul_generator(scalar)
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

// add-1998-cmo-2
impl Add for Projective {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        if self.is_infinity() {
            return other;
        }
        if other.is_infinity() {
            return self;
        }

        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x * z2z2;
        let u2 = other.x * z1z1;
        let s1 = self.y * z2z2 * other.z;
        let s2 = other.y * z1z1 * self.z;
        let h = u2 - u1;
        let r = s2 - s1;

        if h.is_zero() {
            if r.is_zero() {
                return self.double();
            }
            return Self::INFINITY;
        }

        let hh = h.square();
        let hhh = hh * h;
        let v = u1 * hh;

        let x3 = r.square() - hhh - v.double();
        let y3 = r * (v - x3) - s1 * hhh;
        let z3 = self.z * other.z * h;

        Projective::new(x3, y3, z3)
    }
}

impl AddAssign for Projective {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Sub for Projective {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + other.negate()
    }
}

impl SubAssign for Projective {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Projective {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

impl Mul<ScalarField> for Projective {
    type Output = Self;

    fn mul(self, scalar: ScalarField) -> Self {
        wnaf_mul(&self, &scalar)
    }
}

impl Mul<&ScalarField> for Projective {
    type Output = Self;

    fn mul(self, scalar: &ScalarField) -> Self {
        wnaf_mul(&self, scalar)
    }
}

impl Mul<Projective> for ScalarField {
    type Output = Projective;

    fn mul(self, point: Projective) -> Projective {
        wnaf_mul(&point, &self)
    }
}

impl From<Affine> for Projective {
    fn from(point: Affine) -> Self {
        Projective::from_affine(&point)
    }
}

impl From<&Affine> for Projective {
    fn from(point: &Affine) -> Self {
        Projective::from_affine(point)
    }
}

impl From<Projective> for Affine {
    fn from(point: Projective) -> Self {
        point.to_affine()
    }
}

impl From<&Projective> for Affine {
    fn from(point: &Projective) -> Self {
        point.to_affine()
    }
}
