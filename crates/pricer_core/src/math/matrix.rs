//! Transition-probability matrices for trinomial layers.
//!
//! A layer with `2i+1` nodes carries a `(2i+1) × 3` matrix whose row `j`
//! holds the (down, middle, up) probabilities of node `j`. Rows are stored
//! contiguously in a single row-major buffer.

/// Column index of the down probability.
pub const DOWN: usize = 0;
/// Column index of the middle probability.
pub const MIDDLE: usize = 1;
/// Column index of the up probability.
pub const UP: usize = 2;

/// A single (down, middle, up) probability triple.
///
/// # Examples
/// ```
/// use pricer_core::math::UniformProbabilities;
///
/// let probs = UniformProbabilities::new(0.25, 0.5, 0.25);
/// assert_eq!(probs.as_row(), [0.25, 0.5, 0.25]);
/// assert!((probs.sum() - 1.0).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformProbabilities {
    /// Probability of moving to node `j`
    pub down: f64,
    /// Probability of moving to node `j+1`
    pub middle: f64,
    /// Probability of moving to node `j+2`
    pub up: f64,
}

impl UniformProbabilities {
    /// Creates a probability triple.
    #[inline]
    pub fn new(down: f64, middle: f64, up: f64) -> Self {
        Self { down, middle, up }
    }

    /// All mass on the middle branch.
    #[inline]
    pub fn middle_only() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    /// Returns the triple in matrix-row order (down, middle, up).
    #[inline]
    pub fn as_row(&self) -> [f64; 3] {
        [self.down, self.middle, self.up]
    }

    /// Sum of the three probabilities.
    #[inline]
    pub fn sum(&self) -> f64 {
        self.down + self.middle + self.up
    }
}

/// Dense `rows × 3` transition-probability matrix.
///
/// Row validity (non-negative entries summing to one) is the tree provider's
/// responsibility and is not rechecked here.
///
/// # Examples
/// ```
/// use pricer_core::math::{TransitionMatrix, UniformProbabilities};
///
/// let matrix = TransitionMatrix::uniform(3, UniformProbabilities::new(0.2, 0.6, 0.2));
/// assert_eq!(matrix.rows(), 3);
/// assert_eq!(matrix.row(2), [0.2, 0.6, 0.2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    data: Vec<f64>,
}

impl TransitionMatrix {
    /// Builds a matrix from explicit rows.
    pub fn from_rows(rows: &[[f64; 3]]) -> Self {
        Self {
            data: rows.iter().flatten().copied().collect(),
        }
    }

    /// Broadcasts the same probability triple to every row.
    pub fn uniform(rows: usize, probabilities: UniformProbabilities) -> Self {
        let row = probabilities.as_row();
        let mut data = Vec::with_capacity(rows * 3);
        for _ in 0..rows {
            data.extend_from_slice(&row);
        }
        Self { data }
    }

    /// Number of rows (nodes).
    #[inline]
    pub fn rows(&self) -> usize {
        self.data.len() / 3
    }

    /// Returns row `j` as (down, middle, up).
    ///
    /// # Panics
    /// Panics if `j >= self.rows()`.
    #[inline]
    pub fn row(&self, j: usize) -> [f64; 3] {
        let base = 3 * j;
        [self.data[base], self.data[base + 1], self.data[base + 2]]
    }

    /// Returns a single entry; `column` is one of [`DOWN`], [`MIDDLE`], [`UP`].
    #[inline]
    pub fn get(&self, j: usize, column: usize) -> f64 {
        self.data[3 * j + column]
    }

    /// Iterates over the rows in node order.
    pub fn iter_rows(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.data.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_preserves_order() {
        let matrix = TransitionMatrix::from_rows(&[[0.1, 0.8, 0.1], [0.3, 0.4, 0.3]]);
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.row(0), [0.1, 0.8, 0.1]);
        assert_eq!(matrix.get(1, DOWN), 0.3);
        assert_eq!(matrix.get(1, MIDDLE), 0.4);
        assert_eq!(matrix.get(1, UP), 0.3);
    }

    #[test]
    fn test_uniform_broadcast() {
        let probs = UniformProbabilities::new(0.25, 0.5, 0.25);
        let matrix = TransitionMatrix::uniform(5, probs);
        assert_eq!(matrix.rows(), 5);
        assert!(matrix.iter_rows().all(|row| row == [0.25, 0.5, 0.25]));
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = TransitionMatrix::from_rows(&[]);
        assert_eq!(matrix.rows(), 0);
        assert_eq!(matrix.iter_rows().count(), 0);
    }

    #[test]
    fn test_middle_only() {
        let probs = UniformProbabilities::middle_only();
        assert_eq!(probs.as_row(), [0.0, 1.0, 0.0]);
        assert_eq!(probs.sum(), 1.0);
    }
}
