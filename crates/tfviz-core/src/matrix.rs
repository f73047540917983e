use serde::{Deserialize, Serialize};

use crate::constants::EPSILON;

/// Square, row-stochastic score grid.
///
/// Every row is a discrete probability distribution over attended-to tokens.
/// Cells are stored row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttentionMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl AttentionMatrix {
    /// Wrap raw row-major cells without normalizing them.
    ///
    /// # Panics
    /// If `n == 0` or `cells.len() != n * n`.
    pub fn from_cells(n: usize, cells: Vec<f64>) -> Self {
        assert!(n > 0, "attention matrix needs at least one token");
        assert_eq!(cells.len(), n * n, "expected {n}x{n} cells");
        Self { n, cells }
    }

    /// Build from nested rows. Same panics as [`Self::from_cells`].
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let n = rows.len();
        let cells: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::from_cells(n, cells)
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.cells[i * self.n..(i + 1) * self.n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks_exact(self.n)
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    pub fn row_sums(&self) -> Vec<f64> {
        self.rows().map(|r| r.iter().sum()).collect()
    }

    /// True when every entry is non-negative and every row sums to 1 within `tolerance`.
    pub fn is_row_stochastic(&self, tolerance: f64) -> bool {
        self.cells.iter().all(|&c| c >= 0.0)
            && self.row_sums().iter().all(|s| (s - 1.0).abs() <= tolerance)
    }

    /// Add `bonus(i, j)` to every cell.
    pub fn add_bias(&mut self, bonus: impl Fn(usize, usize) -> f64) {
        let n = self.n;
        for (idx, cell) in self.cells.iter_mut().enumerate() {
            *cell += bonus(idx / n, idx % n);
        }
    }

    /// L1 row normalization. A row summing to ~0 becomes uniform.
    pub fn normalize_rows(&mut self) {
        let n = self.n;
        for row in self.cells.chunks_exact_mut(n) {
            let sum: f64 = row.iter().sum();
            if !sum.is_finite() || sum <= EPSILON {
                row.fill(1.0 / n as f64);
                continue;
            }
            for c in row.iter_mut() {
                *c /= sum;
            }
        }
    }

    /// Row-wise softmax, max-subtracted for stability.
    pub fn softmax_rows(&mut self) {
        let n = self.n;
        for row in self.cells.chunks_exact_mut(n) {
            let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            for c in row.iter_mut() {
                *c = (*c - max).exp();
            }
            let sum: f64 = row.iter().sum();
            if !sum.is_finite() || sum <= 0.0 {
                row.fill(1.0 / n as f64);
                continue;
            }
            for c in row.iter_mut() {
                *c /= sum;
            }
        }
    }

    /// `ratio * self + (1 - ratio) * other`, L1-normalized per row.
    ///
    /// # Panics
    /// If the two matrices differ in size.
    pub fn blend(&self, other: &Self, ratio: f64) -> Self {
        assert_eq!(self.n, other.n, "cannot blend matrices of different size");
        let cells = self
            .cells
            .iter()
            .zip(&other.cells)
            .map(|(old, new)| ratio * old + (1.0 - ratio) * new)
            .collect();
        let mut blended = Self { n: self.n, cells };
        blended.normalize_rows();
        blended
    }
}
