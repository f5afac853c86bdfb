use serde::{Deserialize, Serialize};

/// Dense row-major `f32` matrix.
///
/// Stored as nested rows so model files stay readable when pretty-printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f32>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix { rows, cols, data: vec![vec![0.0; cols]; rows] }
    }

    /// Builds a matrix from rows; `None` when rows are ragged or empty.
    pub fn from_data(data: Vec<Vec<f32>>) -> Option<Matrix> {
        let cols = data.first()?.len();
        if data.iter().any(|row| row.len() != cols) {
            return None;
        }
        Some(Matrix { rows: data.len(), cols, data })
    }

    /// True when `rows`/`cols` agree with the stored data.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.rows && self.data.iter().all(|r| r.len() == self.cols)
    }

    /// Row vector × matrix: `input` has length `rows`, result has length `cols`.
    ///
    /// # Panics
    /// Panics if `input.len() != self.rows`.
    pub fn vec_mul(&self, input: &[f32]) -> Vec<f32> {
        assert_eq!(input.len(), self.rows, "vector length must equal matrix rows");
        let mut out = vec![0.0f32; self.cols];
        for (x, row) in input.iter().zip(&self.data) {
            if *x == 0.0 {
                continue;
            }
            for (o, w) in out.iter_mut().zip(row) {
                *o += x * w;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_mul_matches_hand_computation() {
        let m = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(m.vec_mul(&[1.0, 0.0, 2.0]), vec![11.0, 14.0]);
    }

    #[test]
    fn from_data_rejects_ragged_rows() {
        assert!(Matrix::from_data(vec![vec![1.0], vec![1.0, 2.0]]).is_none());
        assert!(Matrix::from_data(vec![]).is_none());
    }

    #[test]
    fn consistency_check_catches_bad_dims() {
        let mut m = Matrix::zeros(2, 3);
        assert!(m.is_consistent());
        m.cols = 4;
        assert!(!m.is_consistent());
    }
}
