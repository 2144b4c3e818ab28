use crate::error::{check_len, Error, Result};
use crate::utils::ZeroOut;

use rand::distributions::Distribution;
use rand::Rng;

/// A dense matrix of `rows` output neurons by `cols` inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mat {
    rows: usize,
    cols: usize,
    data: Vec<f64>, // row-major array
}

impl Mat {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Mat {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn random<D, R>(distribution: D, rows: usize, cols: usize, rng: &mut R) -> Self
    where
        D: Distribution<f64>,
        R: Rng + ?Sized,
    {
        Mat {
            rows,
            cols,
            data: distribution.sample_iter(rng).take(rows * cols).collect(),
        }
    }

    /// Builds a matrix from a list of rows, which must all have equal length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in &rows {
            check_len("matrix row", cols, row.len())?;
            data.extend_from_slice(row);
        }
        Ok(Mat {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Checks that the buffer holds exactly `rows * cols` values, as it may
    /// not after decoding.
    pub fn validate(&self) -> Result<()> {
        let len = self
            .rows
            .checked_mul(self.cols)
            .ok_or_else(|| Error::shape("matrix data", usize::MAX, self.data.len()))?;
        check_len("matrix data", len, self.data.len())
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.cols.max(1)).map(<[f64]>::to_vec).collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Computes the dot product of row `i` with `x`.
    pub fn row_dot(&self, i: usize, x: &[f64]) -> f64 {
        self.row(i).iter().zip(x).map(|(w, x)| w * x).sum()
    }

    /// Computes `y = W^T x`, for propagating a signal from the outputs back to
    /// the inputs.
    pub fn dot_transposed(&self, x: &[f64], y: &mut [f64]) {
        assert_eq!(x.len(), self.rows);
        assert_eq!(y.len(), self.cols);
        y.zero_out();
        for (i, &xi) in x.iter().enumerate() {
            for (yj, w) in y.iter_mut().zip(self.row(i)) {
                *yj += xi * w;
            }
        }
    }

    /// Accumulates the scaled outer product `alpha * x y^T` into the matrix.
    pub fn add_outer(&mut self, alpha: f64, x: &[f64], y: &[f64]) {
        assert_eq!(x.len(), self.rows);
        assert_eq!(y.len(), self.cols);
        for (row, &xi) in self.data.chunks_mut(self.cols.max(1)).zip(x) {
            for (m, &yj) in row.iter_mut().zip(y) {
                *m += alpha * xi * yj;
            }
        }
    }
}

impl ZeroOut for Mat {
    fn zero_out(&mut self) {
        self.data.zero_out();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::distributions::Uniform;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> Mat {
        Mat::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn from_rows_is_row_major() {
        let m = sample();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.get(1, 0), 4.0);
        assert_eq!(m.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(Mat::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn row_dot_and_transposed_dot() {
        let m = sample();
        assert_eq!(m.row_dot(1, &[1.0, 0.0, 1.0]), 10.0);

        let mut y = vec![7.0; 3];
        m.dot_transposed(&[1.0, 2.0], &mut y);
        assert_eq!(y, vec![9.0, 12.0, 15.0]);
    }

    #[test]
    fn add_outer_accumulates() {
        let mut m = Mat::zeros(2, 2);
        m.add_outer(0.5, &[1.0, 2.0], &[2.0, 4.0]);
        m.add_outer(0.5, &[1.0, 2.0], &[2.0, 4.0]);
        assert_eq!(m.values(), &[2.0, 4.0, 4.0, 8.0]);
    }

    #[test]
    fn random_respects_distribution_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Mat::random(Uniform::new_inclusive(-1.0, 1.0), 4, 5, &mut rng);
        assert_eq!(m.values().len(), 20);
        assert!(m.values().iter().all(|w| (-1.0..=1.0).contains(w)));
    }

    #[test]
    fn validate_rejects_short_buffer() {
        assert!(sample().validate().is_ok());
        let short = Mat {
            rows: 2,
            cols: 2,
            data: vec![1.0],
        };
        assert!(matches!(
            short.validate(),
            Err(Error::ShapeMismatch {
                expected: 4,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn zero_out_clears_values() {
        let mut m = sample();
        m.zero_out();
        assert!(m.values().iter().all(|&w| w == 0.0));
    }
}
