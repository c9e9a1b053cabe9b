use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

pub trait ScalarBits {
    /// Canonical little-endian limbs of the scalar.
    fn to_u64_limbs(&self) -> [u64; 4];
}

/// Generic group operations shared by the affine and Jacobian representations.
///
/// The provided methods are variable-time reference implementations. The
/// concrete types override `mul_generator` with table-based versions.
pub trait Group:
    Sized + Copy + Add<Output = Self> + AddAssign + Sub<Output = Self> + SubAssign + Neg<Output = Self>
{
    type Scalar: ScalarBits;

    fn identity() -> Self;
    fn is_identity(&self) -> bool;
    fn generator() -> Self;
    fn double(&self) -> Self;
    fn negate(&self) -> Self;

    fn mul_generator(scalar: &Self::Scalar) -> Self {
        Self::generator().scalar_mul(scalar)
    }

    /// Left-to-right double-and-add.
    #[inline]
    fn scalar_mul(&self, scalar: &Self::Scalar) -> Self {
        let scalar_limbs = scalar.to_u64_limbs();
        let mut result = Self::identity();

        for &limb in scalar_limbs.iter().rev() {
            for bit in (0..64).rev() {
                result = result.double();
                if (limb >> bit) & 1 == 1 {
                    result += *self;
                }
            }
        }

        result
    }

    /// Fixed 4-bit window multiplication.
    fn scalar_mul_windowed(&self, scalar: &Self::Scalar) -> Self {
        if self.is_identity() {
            return Self::identity();
        }

        let mut table = [Self::identity(); 16];
        table[1] = *self;
        for i in 2..16 {
            table[i] = table[i - 1] + *self;
        }

        let scalar_limbs = scalar.to_u64_limbs();
        let mut result = Self::identity();

        for &limb in scalar_limbs.iter().rev() {
            for shift in (0..64).step_by(4).rev() {
                for _ in 0..4 {
                    result = result.double();
                }

                let window = ((limb >> shift) & 0xF) as usize;
                if window != 0 {
                    result += table[window];
                }
            }
        }

        result
    }

    fn mul_u64(&self, n: u64) -> Self {
        let mut result = Self::identity();
        for bit in (0..(64 - n.leading_zeros())).rev() {
            result = result.double();
            if (n >> bit) & 1 == 1 {
                result += *self;
            }
        }
        result
    }

    /// Sum of `scalars[i] * points[i]` with one shared doubling chain.
    ///
    /// Extra entries in the longer slice are ignored.
    fn multi_scalar_mul(points: &[Self], scalars: &[Self::Scalar]) -> Self {
        debug_assert_eq!(
            points.len(),
            scalars.len(),
            "Points and scalars must have same length"
        );

        let limbs: Vec<[u64; 4]> = scalars.iter().map(ScalarBits::to_u64_limbs).collect();
        let mut result = Self::identity();

        for limb_idx in (0..4).rev() {
            for bit in (0..64).rev() {
                result = result.double();
                for (point, scalar) in points.iter().zip(limbs.iter()) {
                    if (scalar[limb_idx] >> bit) & 1 == 1 {
                        result += *point;
                    }
                }
            }
        }

        result
    }
}
