use crate::error::{AqtError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense row-major f32 matrix. Serialized as nested rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f32>>", into = "Vec<Vec<f32>>")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(AqtError::ShapeMismatch { op: "matrix", expected: rows * cols, actual: data.len() });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// `0, 1, 2, ...` laid out row-major into `rows x cols`.
    pub fn arange(rows: usize, cols: usize) -> Self {
        let data = (0..rows * cols).map(|i| i as f32).collect();
        Self { rows, cols, data }
    }

    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let n = rows.len();
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(n * cols);
        for (i, r) in rows.into_iter().enumerate() {
            if r.len() != cols {
                return Err(AqtError::RaggedRows { row: i, expected: cols, actual: r.len() });
            }
            data.extend(r);
        }
        Ok(Self { rows: n, cols, data })
    }

    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }
    pub fn shape(&self) -> (usize, usize) { (self.rows, self.cols) }
    pub fn as_slice(&self) -> &[f32] { &self.data }

    pub fn get(&self, r: usize, c: usize) -> Option<f32> {
        if r < self.rows && c < self.cols { Some(self.data[r * self.cols + c]) } else { None }
    }

    pub(crate) fn row(&self, r: usize) -> &[f32] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        if self.cols == 0 { return vec![Vec::new(); self.rows]; }
        self.data.chunks(self.cols).map(|c| c.to_vec()).collect()
    }

    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Self {
        Self { rows: self.rows, cols: self.cols, data: self.data.iter().map(|&v| f(v)).collect() }
    }

    pub fn scale(&self, s: f32) -> Self { self.map(|v| v * s) }

    /// Largest absolute element; 0.0 for an empty matrix. NaN propagates.
    pub fn max_abs(&self) -> f32 {
        let mut m = 0f32;
        for &v in &self.data {
            let a = v.abs();
            if a.is_nan() { return f32::NAN; }
            if a > m { m = a; }
        }
        m
    }

    pub fn is_finite(&self) -> bool { self.data.iter().all(|v| v.is_finite()) }

    /// `self @ rhs`. Output rows are computed in parallel; each row accumulates
    /// in a fixed order so the result does not depend on the thread count.
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(AqtError::ShapeMismatch { op: "matmul", expected: rhs.rows, actual: self.cols });
        }
        let (m, k, n) = (self.rows, self.cols, rhs.cols);
        let mut out = vec![0f32; m * n];
        if n > 0 {
            out.par_chunks_mut(n).enumerate().for_each(|(i, out_row)| {
                let a_row = &self.data[i * k..(i + 1) * k];
                for (j, o) in out_row.iter_mut().enumerate() {
                    *o = dot_col(a_row, &rhs.data, j, n);
                }
            });
        }
        Ok(Matrix { rows: m, cols: n, data: out })
    }

    /// Adds `bias` to every row.
    pub fn add_row_broadcast(&self, bias: &[f32]) -> Result<Matrix> {
        if bias.len() != self.cols {
            return Err(AqtError::ShapeMismatch { op: "bias add", expected: self.cols, actual: bias.len() });
        }
        let mut data = self.data.clone();
        if self.cols > 0 {
            for row in data.chunks_mut(self.cols) {
                for (v, b) in row.iter_mut().zip(bias) { *v += *b; }
            }
        }
        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    /// Largest element-wise absolute difference, or None when shapes differ.
    pub fn max_abs_diff(&self, other: &Matrix) -> Option<f32> {
        if self.shape() != other.shape() { return None; }
        Some(self.data.iter().zip(&other.data).fold(0f32, |m, (a, b)| m.max((a - b).abs())))
    }
}

#[inline]
fn dot_col(a_row: &[f32], b: &[f32], col: usize, stride: usize) -> f32 {
    let mut acc = 0f32;
    for (i, &a) in a_row.iter().enumerate() { acc += a * b[i * stride + col]; }
    acc
}

impl TryFrom<Vec<Vec<f32>>> for Matrix {
    type Error = AqtError;
    fn try_from(rows: Vec<Vec<f32>>) -> Result<Self> { Matrix::from_rows(rows) }
}

impl From<Matrix> for Vec<Vec<f32>> {
    fn from(m: Matrix) -> Self { m.to_rows() }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[")?;
        for r in 0..self.rows {
            let cells: Vec<String> = self.row(r).iter().map(|v| format!("{:>12.6}", v)).collect();
            writeln!(f, "  [{}]", cells.join(", "))?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matmul_small() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::from_rows(vec![vec![5.0, 6.0, 7.0], vec![8.0, 9.0, 10.0]]).unwrap();
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.shape(), (2, 3));
        assert_eq!(c.to_rows(), vec![vec![21.0, 24.0, 27.0], vec![47.0, 54.0, 61.0]]);
    }

    #[test]
    fn matmul_rejects_inner_dim_mismatch() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        assert_eq!(a.matmul(&b), Err(AqtError::ShapeMismatch { op: "matmul", expected: 2, actual: 3 }));
    }

    #[test]
    fn ragged_rows_rejected() {
        let e = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(e, AqtError::RaggedRows { row: 1, expected: 2, actual: 1 });
    }

    #[test]
    fn bias_broadcasts_per_column() {
        let m = Matrix::zeros(2, 2).add_row_broadcast(&[1.0, -1.0]).unwrap();
        assert_eq!(m.to_rows(), vec![vec![1.0, -1.0], vec![1.0, -1.0]]);
        assert!(Matrix::zeros(2, 2).add_row_broadcast(&[1.0]).is_err());
    }

    #[test]
    fn out_of_range_access_is_none() {
        let m = Matrix::arange(2, 2);
        assert_eq!(m.get(1, 1), Some(3.0));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 2), None);
        let text = m.to_string();
        assert_eq!(text.lines().count(), 4);
        assert_eq!(Matrix::zeros(0, 3).to_string(), "[\n]");
    }

    #[test]
    fn max_abs_uses_magnitude() {
        let m = Matrix::from_rows(vec![vec![0.5, -3.0], vec![2.0, 1.0]]).unwrap();
        assert_eq!(m.max_abs(), 3.0);
        assert_eq!(Matrix::zeros(0, 0).max_abs(), 0.0);
    }
}
