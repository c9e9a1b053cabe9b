//! Variable-base scalar multiplication.
//!
//! Single and double multiplications keep their wNAF tables on the stack.
//! [`ecmult_multi`] runs Straus' interleaved method over many points with
//! all of its tables placed in a caller-provided [`ScratchSpace`].

use crate::errors::ScratchError;
use crate::group::ScalarBits;
use crate::scratch::{ScratchArray, ScratchElement, ScratchSpace};
use crate::{Affine, Projective, ScalarField, mul_generator};

/// wNAF window width.
pub const WNAF_WINDOW: usize = 5;

/// Odd multiples `P, 3P, ..., 15P` kept per point.
const TABLE_SIZE: usize = 1 << (WNAF_WINDOW - 2);

/// A 256-bit scalar has at most 257 wNAF digits.
pub const WNAF_MAX_DIGITS: usize = 257;

type Wnaf = [i8; WNAF_MAX_DIGITS];

/// Width-`WNAF_WINDOW` non-adjacent form, least significant digit first.
/// Every nonzero digit is odd and lies in `(-16, 16)`.
pub(crate) fn wnaf(scalar: &ScalarField) -> Wnaf {
    let limbs = scalar.to_u64_limbs();
    let mut k = [limbs[0], limbs[1], limbs[2], limbs[3], 0u64];
    let mut digits = [0i8; WNAF_MAX_DIGITS];
    let width = 1u64 << WNAF_WINDOW;

    let mut i = 0;
    while i < WNAF_MAX_DIGITS && k.iter().any(|&limb| limb != 0) {
        if k[0] & 1 == 1 {
            let m = k[0] & (width - 1);
            if m >= width / 2 {
                digits[i] = (m as i64 - width as i64) as i8;
                add_small(&mut k, width - m);
            } else {
                digits[i] = m as i8;
                sub_small(&mut k, m);
            }
        }
        shr1(&mut k);
        i += 1;
    }

    digits
}

fn add_small(k: &mut [u64; 5], v: u64) {
    let mut carry = v;
    for limb in k.iter_mut() {
        let (sum, overflow) = limb.overflowing_add(carry);
        *limb = sum;
        if !overflow {
            return;
        }
        carry = 1;
    }
}

fn sub_small(k: &mut [u64; 5], v: u64) {
    let mut borrow = v;
    for limb in k.iter_mut() {
        let (diff, underflow) = limb.overflowing_sub(borrow);
        *limb = diff;
        if !underflow {
            return;
        }
        borrow = 1;
    }
}

fn shr1(k: &mut [u64; 5]) {
    for i in 0..4 {
        k[i] = (k[i] >> 1) | (k[i + 1] << 63);
    }
    k[4] >>= 1;
}

fn odd_multiples(point: &Projective) -> [Projective; TABLE_SIZE] {
    let mut table = [*point; TABLE_SIZE];
    let twice = point.double();
    for i in 1..TABLE_SIZE {
        table[i] = table[i - 1] + twice;
    }
    table
}

#[inline]
fn table_lookup(table: &[Projective; TABLE_SIZE], digit: i8) -> Projective {
    if digit > 0 {
        table[(digit / 2) as usize]
    } else {
        -table[(-digit / 2) as usize]
    }
}

/// Computes `scalar * point` with a width-5 wNAF.
pub fn wnaf_mul(point: &Projective, scalar: &ScalarField) -> Projective {
    if point.is_infinity() {
        return Projective::INFINITY;
    }

    let digits = wnaf(scalar);
    let Some(top) = digits.iter().rposition(|&d| d != 0) else {
        return Projective::INFINITY;
    };
    let table = odd_multiples(point);

    let mut acc = Projective::INFINITY;
    for &digit in digits[..=top].iter().rev() {
        acc = acc.double();
        if digit != 0 {
            acc += table_lookup(&table, digit);
        }
    }
    acc
}

/// Compute a * G + b * P, where G is the fixed generator.
pub fn double_scalar_mul_basepoint(a: &ScalarField, b: &ScalarField, point: &Affine) -> Projective {
    mul_generator(a) + wnaf_mul(&Projective::from_affine(point), b)
}

/// Bytes of scratch memory [`ecmult_multi`] needs for `n_points` points.
pub fn msm_working_size(n_points: usize) -> usize {
    n_points.saturating_mul(TABLE_SIZE * Projective::ENCODED_SIZE + WNAF_MAX_DIGITS)
}

/// Computes `g_scalar * G + sum(scalars[i] * points[i])`.
///
/// `points` and `scalars` are read from scratch memory reserved by the caller.
/// The wNAF digits and odd-multiple tables live in a new frame of exactly
/// [`msm_working_size`] bytes, released before returning.
pub fn ecmult_multi(
    scratch: &mut ScratchSpace,
    g_scalar: &ScalarField,
    points: ScratchArray<Affine>,
    scalars: ScratchArray<ScalarField>,
) -> Result<Projective, ScratchError> {
    debug_assert_eq!(points.len(), scalars.len());
    let n = points.len().min(scalars.len());

    let mut frame = scratch.push_frame(msm_working_size(n))?;
    let tables = frame.alloc_array::<Projective>(n * TABLE_SIZE)?;
    let digits = frame.alloc_array::<i8>(n * WNAF_MAX_DIGITS)?;

    let mut top = 0;
    for i in 0..n {
        let point = points.get(&frame, i);
        let naf = if point.is_infinity() {
            [0i8; WNAF_MAX_DIGITS]
        } else {
            wnaf(&scalars.get(&frame, i))
        };
        if let Some(pos) = naf.iter().rposition(|&d| d != 0) {
            top = top.max(pos + 1);
        }
        for (j, digit) in naf.iter().enumerate() {
            digits.set(&mut frame, i * WNAF_MAX_DIGITS + j, digit);
        }

        let table = odd_multiples(&Projective::from_affine(&point));
        for (j, entry) in table.iter().enumerate() {
            tables.set(&mut frame, i * TABLE_SIZE + j, entry);
        }
    }

    let mut acc = Projective::INFINITY;
    for bit in (0..top).rev() {
        acc = acc.double();
        for i in 0..n {
            let digit = digits.get(&frame, i * WNAF_MAX_DIGITS + bit);
            if digit > 0 {
                acc += tables.get(&frame, i * TABLE_SIZE + (digit / 2) as usize);
            } else if digit < 0 {
                acc -= tables.get(&frame, i * TABLE_SIZE + (-digit / 2) as usize);
            }
        }
    }

    Ok(acc + mul_generator(g_scalar))
}
