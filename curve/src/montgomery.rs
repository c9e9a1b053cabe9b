//! Shared 256-bit limb arithmetic for the Montgomery-form prime fields.
//!
//! Both secp256k1 moduli sit just below 2^256, so sums and Montgomery
//! products can exceed 256 bits before their final reduction. Every helper
//! here keeps that extra carry instead of dropping it.

/// Little-endian 256-bit integer.
pub(crate) type Limbs = [u64; 4];

#[inline]
pub(crate) const fn carrying_add(a: u64, b: u64, carry: bool) -> (u64, bool) {
    let (sum, overflow1) = a.overflowing_add(b);
    let (sum, overflow2) = sum.overflowing_add(carry as u64);
    (sum, overflow1 || overflow2)
}

#[inline]
pub(crate) const fn borrowing_sub(a: u64, b: u64, borrow: bool) -> (u64, bool) {
    let (diff, overflow1) = a.overflowing_sub(b);
    let (diff, overflow2) = diff.overflowing_sub(borrow as u64);
    (diff, overflow1 || overflow2)
}

/// `a - b` over 256 bits, returning the final borrow.
#[inline]
pub(crate) const fn sub_with_borrow(a: &Limbs, b: &Limbs) -> (Limbs, bool) {
    let (r0, borrow) = borrowing_sub(a[0], b[0], false);
    let (r1, borrow) = borrowing_sub(a[1], b[1], borrow);
    let (r2, borrow) = borrowing_sub(a[2], b[2], borrow);
    let (r3, borrow) = borrowing_sub(a[3], b[3], borrow);
    ([r0, r1, r2, r3], borrow)
}

/// `a + b` over 256 bits, returning the final carry.
#[inline]
pub(crate) const fn add_with_carry(a: &Limbs, b: &Limbs) -> (Limbs, bool) {
    let (r0, carry) = carrying_add(a[0], b[0], false);
    let (r1, carry) = carrying_add(a[1], b[1], carry);
    let (r2, carry) = carrying_add(a[2], b[2], carry);
    let (r3, carry) = carrying_add(a[3], b[3], carry);
    ([r0, r1, r2, r3], carry)
}

/// Returns true when `a < m`.
#[inline]
pub(crate) const fn is_less_than(a: &Limbs, m: &Limbs) -> bool {
    sub_with_borrow(a, m).1
}

#[inline]
pub(crate) const fn is_zero(a: &Limbs) -> bool {
    a[0] == 0 && a[1] == 0 && a[2] == 0 && a[3] == 0
}

/// `(a + b) mod m` for `a, b < m`.
#[inline]
pub(crate) const fn add_mod(a: &Limbs, b: &Limbs, m: &Limbs) -> Limbs {
    let (sum, carry) = add_with_carry(a, b);
    let (reduced, borrow) = sub_with_borrow(&sum, m);
    if carry || !borrow { reduced } else { sum }
}

/// `(a - b) mod m` for `a, b < m`.
#[inline]
pub(crate) const fn sub_mod(a: &Limbs, b: &Limbs, m: &Limbs) -> Limbs {
    let (diff, borrow) = sub_with_borrow(a, b);
    if borrow {
        add_with_carry(&diff, m).0
    } else {
        diff
    }
}

#[inline]
pub(crate) const fn neg_mod(a: &Limbs, m: &Limbs) -> Limbs {
    if is_zero(a) {
        return [0, 0, 0, 0];
    }
    sub_with_borrow(m, a).0
}

/// Montgomery multiplication `a * b * 2^-256 mod m`.
///
/// Accepts any `a < 2^256` as long as `b < m`, which lets canonical
/// conversion reduce out-of-range inputs for free. `mu` is `-m^-1 mod 2^64`.
#[inline]
pub(crate) fn montgomery_mul(a: &Limbs, b: &Limbs, m: &Limbs, mu: u64) -> Limbs {
    let mut t = [0u64; 9];

    for i in 0..4 {
        let mut carry = 0u128;
        for j in 0..4 {
            let product = (a[i] as u128) * (b[j] as u128) + (t[i + j] as u128) + carry;
            t[i + j] = product as u64;
            carry = product >> 64;
        }
        t[i + 4] = carry as u64;
    }

    for i in 0..4 {
        let k = t[i].wrapping_mul(mu);
        let mut carry = 0u128;
        for j in 0..4 {
            let product = (k as u128) * (m[j] as u128) + (t[i + j] as u128) + carry;
            t[i + j] = product as u64;
            carry = product >> 64;
        }

        let mut idx = i + 4;
        while carry != 0 && idx < t.len() {
            let sum = (t[idx] as u128) + carry;
            t[idx] = sum as u64;
            carry = sum >> 64;
            idx += 1;
        }
    }

    // t / 2^256 < 2m, so one conditional subtraction is enough.
    let result = [t[4], t[5], t[6], t[7]];
    let (reduced, borrow) = sub_with_borrow(&result, m);
    if t[8] != 0 || !borrow { reduced } else { result }
}

#[inline]
pub(crate) fn limbs_from_be_bytes(bytes: &[u8; 32]) -> Limbs {
    let mut limbs = [0u64; 4];
    for (i, chunk) in bytes.chunks_exact(8).enumerate() {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        limbs[3 - i] = u64::from_be_bytes(word);
    }
    limbs
}

#[inline]
pub(crate) fn limbs_to_be_bytes(limbs: &Limbs) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    for (i, chunk) in bytes.chunks_exact_mut(8).enumerate() {
        chunk.copy_from_slice(&limbs[3 - i].to_be_bytes());
    }
    bytes
}

#[inline]
pub(crate) fn limbs_from_le_bytes(bytes: &[u8]) -> Limbs {
    let mut limbs = [0u64; 4];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        *limb = u64::from_le_bytes(word);
    }
    limbs
}

#[inline]
pub(crate) fn limbs_to_le_bytes(limbs: &Limbs, out: &mut [u8]) {
    for (limb, chunk) in limbs.iter().zip(out.chunks_exact_mut(8)) {
        chunk.copy_from_slice(&limb.to_le_bytes());
    }
}

/// Implements the arithmetic operator traits for a Montgomery field type
/// exposing `add_limbs`, `sub_limbs`, `neg_limbs` and `mul_limbs`.
macro_rules! impl_field_ops {
    ($field:ident) => {
        impl core::ops::Add for $field {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                self.add_limbs(&rhs)
            }
        }

        impl core::ops::AddAssign for $field {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl core::ops::Sub for $field {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                self.sub_limbs(&rhs)
            }
        }

        impl core::ops::SubAssign for $field {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl core::ops::Neg for $field {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                self.neg_limbs()
            }
        }

        impl core::ops::Mul for $field {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                self.mul_limbs(&rhs)
            }
        }

        impl core::ops::MulAssign for $field {
            #[inline]
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        impl core::iter::Sum for $field {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, |acc, x| acc + x)
            }
        }

        impl core::iter::Product for $field {
            fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ONE, |acc, x| acc * x)
            }
        }

        impl core::fmt::Display for $field {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let canonical = self.to_canonical_limbs();
                write!(
                    f,
                    "0x{:016x}{:016x}{:016x}{:016x}",
                    canonical[3], canonical[2], canonical[1], canonical[0]
                )
            }
        }

        impl core::fmt::Debug for $field {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}({})", stringify!($field), self)
            }
        }
    };
}

pub(crate) use impl_field_ops;
