//! Fixed-base comb table for multiplying the generator.
//!
//! Row `i` holds `j * 16^i * G` for `j` in `0..16`, so a multiplication is
//! 64 mixed additions and no doublings. The table is built once per process.

use std::sync::OnceLock;

use crate::group::ScalarBits;
use crate::{Affine, Projective, ScalarField};

const WINDOW_BITS: usize = 4;
const ROW_SIZE: usize = 1 << WINDOW_BITS;
const ROWS: usize = 256 / WINDOW_BITS;

static GENERATOR_TABLE: OnceLock<Vec<[Affine; ROW_SIZE]>> = OnceLock::new();

fn build_table() -> Vec<[Affine; ROW_SIZE]> {
    let mut flat = Vec::with_capacity(ROWS * ROW_SIZE);
    let mut base = Projective::generator();

    for _ in 0..ROWS {
        let mut entry = Projective::INFINITY;
        for _ in 0..ROW_SIZE {
            flat.push(entry);
            entry += base;
        }
        // entry now holds 16 * base
        base = entry;
    }

    Projective::batch_normalize(&flat)
        .chunks_exact(ROW_SIZE)
        .map(|chunk| {
            let mut row = [Affine::INFINITY; ROW_SIZE];
            row.copy_from_slice(chunk);
            row
        })
        .collect()
}

pub(crate) fn generator_table() -> &'static [[Affine; ROW_SIZE]] {
    GENERATOR_TABLE.get_or_init(build_table)
}

/// Computes `scalar * G` using the comb table.
///
/// Runs in variable time: zero nibbles are skipped and the table index
/// depends on the scalar.
pub fn mul_generator(scalar: &ScalarField) -> Projective {
    let table = generator_table();
    let limbs = scalar.to_u64_limbs();
    let mut acc = Projective::INFINITY;

    for (i, row) in table.iter().enumerate() {
        let bit = i * WINDOW_BITS;
        let nibble = ((limbs[bit / 64] >> (bit % 64)) & 0xF) as usize;
        if nibble != 0 {
            acc = acc.add_affine(&row[nibble]);
        }
    }

    acc
}
