//! Randomized score-matrix generation.
//!
//! Fresh matrices are uniform draws normalized per row (L1). Regeneration
//! matrices additionally get a self/local-context bias and are pushed through
//! softmax, so biased cells grow super-linearly.

use rand::Rng;

use crate::constants::{DIAGONAL_BIAS, LOCAL_CONTEXT_RADIUS};
use crate::matrix::AttentionMatrix;

/// n×n uniform(0,1) draws, each row divided by its sum.
///
/// # Panics
/// If `n == 0`.
pub fn generate(n: usize, rng: &mut impl Rng) -> AttentionMatrix {
    let cells = (0..n * n).map(|_| rng.random::<f64>()).collect();
    let mut matrix = AttentionMatrix::from_cells(n, cells);
    matrix.normalize_rows();
    matrix
}

/// Bonus for cell (i, j): 1.0 on the diagonal, plus (3 - |i-j|) / 3 within
/// the local-context radius. The diagonal gets both.
pub fn structural_bias(i: usize, j: usize) -> f64 {
    let dist = i.abs_diff(j);
    let mut bonus = 0.0;
    if dist == 0 {
        bonus += DIAGONAL_BIAS;
    }
    if dist <= LOCAL_CONTEXT_RADIUS {
        bonus += (LOCAL_CONTEXT_RADIUS + 1 - dist) as f64 / (LOCAL_CONTEXT_RADIUS + 1) as f64;
    }
    bonus
}

/// Add the structural bias to `matrix` and softmax every row.
pub fn apply_structural_bias(mut matrix: AttentionMatrix) -> AttentionMatrix {
    matrix.add_bias(structural_bias);
    matrix.softmax_rows();
    matrix
}

/// A fresh matrix with structural bias applied; what a regenerating head blends in.
pub fn generate_biased(n: usize, rng: &mut impl Rng) -> AttentionMatrix {
    apply_structural_bias(generate(n, rng))
}
