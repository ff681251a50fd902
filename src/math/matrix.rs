use rand::Rng;
use std::f64::consts::PI;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Dense, immutable 2-D matrix of `f64`.
///
/// Elements live in one shared row-major buffer. The logical element `(i, j)`
/// sits at `i * row_stride + j * col_stride`, so a transpose only swaps the
/// shape and the strides and never copies or touches the buffer.
#[derive(Debug, Clone)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    row_stride: usize,
    col_stride: usize,
    data: Arc<[f64]>,
}

impl Matrix {
    /// Builds a matrix from a non-empty rectangular array of rows.
    pub fn new(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        if rows == 0 {
            return Err(Error::InvalidConstruction("matrix has no rows".into()));
        }
        let cols = data[0].len();
        if cols == 0 {
            return Err(Error::InvalidConstruction("matrix has an empty row".into()));
        }
        if let Some(i) = data.iter().position(|row| row.len() != cols) {
            return Err(Error::InvalidConstruction(format!(
                "row {i} has {} columns, expected {cols}",
                data[i].len()
            )));
        }

        Matrix::from_vec(rows, cols, data.into_iter().flatten().collect())
    }

    /// Builds a `rows x cols` matrix from a row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Matrix> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidConstruction(format!(
                "matrix dimensions must be positive, got {rows}x{cols}"
            )));
        }
        if data.len() != rows * cols {
            return Err(Error::InvalidConstruction(format!(
                "{rows}x{cols} matrix needs {} values, got {}",
                rows * cols,
                data.len()
            )));
        }

        Ok(Matrix {
            rows,
            cols,
            row_stride: cols,
            col_stride: 1,
            data: data.into(),
        })
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<Matrix> {
        Matrix::from_vec(rows, cols, vec![value; rows * cols])
    }

    pub fn zeros(rows: usize, cols: usize) -> Result<Matrix> {
        Matrix::filled(rows, cols, 0.0)
    }

    pub fn identity(n: usize) -> Result<Matrix> {
        Matrix::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    /// Builds a matrix by evaluating `f(i, j)` for every position.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Result<Matrix>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Matrix::from_vec(rows, cols, data)
    }

    /// Samples every entry uniformly from `[-limit, limit)`.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, limit: f64, rng: &mut R) -> Result<Matrix> {
        Matrix::from_fn(rows, cols, |_, _| (rng.gen::<f64>() * 2.0 - 1.0) * limit)
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // Both uniforms are drawn from (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// He initialization: samples from N(0, sqrt(2 / rows)).
    ///
    /// Shape: (rows, cols). Weights here are stored `(in, out)`, so `rows` is
    /// the fan-in.
    pub fn he<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Result<Matrix> {
        let std_dev = (2.0 / rows as f64).sqrt();
        Matrix::from_fn(rows, cols, |_, _| Matrix::sample_standard_normal(rng) * std_dev)
    }

    /// Xavier (Glorot) initialization: samples from N(0, sqrt(1 / rows)).
    ///
    /// Suited to sigmoid layers; keeps activation variance roughly constant
    /// across layers.
    pub fn xavier<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Result<Matrix> {
        let std_dev = (1.0 / rows as f64).sqrt();
        Matrix::from_fn(rows, cols, |_, _| Matrix::sample_standard_normal(rng) * std_dev)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.row_stride + j * self.col_stride]
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        (i < self.rows && j < self.cols).then(|| self.at(i, j))
    }

    /// Entries of row `i`. Panics if `i` is out of range, like `Index`.
    pub fn row(&self, i: usize) -> impl Iterator<Item = f64> + '_ {
        assert!(i < self.rows, "row {i} out of bounds for {}x{} matrix", self.rows, self.cols);
        (0..self.cols).map(move |j| self.at(i, j))
    }

    /// Entries of column `j`. Panics if `j` is out of range.
    pub fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        assert!(j < self.cols, "column {j} out of bounds for {}x{} matrix", self.rows, self.cols);
        (0..self.rows).map(move |i| self.at(i, j))
    }

    /// All entries in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.rows).flat_map(move |i| self.row(i))
    }

    pub fn to_vec(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|i| self.row(i).collect()).collect()
    }

    /// Swaps rows and columns. O(1): the result shares this matrix's buffer.
    pub fn transpose(&self) -> Matrix {
        Matrix {
            rows: self.cols,
            cols: self.rows,
            row_stride: self.col_stride,
            col_stride: self.row_stride,
            data: Arc::clone(&self.data),
        }
    }

    /// Standard matrix product `self · rhs`.
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(Error::ShapeMismatch(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            )));
        }

        Matrix::from_fn(self.rows, rhs.cols, |i, j| {
            (0..self.cols).map(|k| self.at(i, k) * rhs.at(k, j)).sum()
        })
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        let data: Vec<f64> = self.iter().map(functor).collect();
        Matrix {
            rows: self.rows,
            cols: self.cols,
            row_stride: self.cols,
            col_stride: 1,
            data: data.into(),
        }
    }

    /// Combines two same-shape matrices entry by entry.
    pub fn zip_with<F>(&self, rhs: &Matrix, functor: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != rhs.shape() {
            return Err(Error::ShapeMismatch(format!(
                "elementwise operation on {}x{} and {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            )));
        }

        Matrix::from_fn(self.rows, self.cols, |i, j| functor(self.at(i, j), rhs.at(i, j)))
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, |a, b| a - b)
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, |a, b| a * b)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Combines this matrix with a scalar (`1x1`), row vector (`1xC`) or
    /// column vector (`Rx1`), repeating the vector across the other dimension.
    ///
    /// A `1x1` operand is always treated as a scalar, even when this matrix is
    /// itself a single row or column.
    pub fn broadcast<F>(&self, vector: &Matrix, functor: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        match vector.shape() {
            (1, 1) => {
                let c = vector.at(0, 0);
                Ok(self.map(|x| functor(x, c)))
            }
            (1, n) if n == self.cols => {
                Matrix::from_fn(self.rows, self.cols, |i, j| functor(self.at(i, j), vector.at(0, j)))
            }
            (m, 1) if m == self.rows => {
                Matrix::from_fn(self.rows, self.cols, |i, j| functor(self.at(i, j), vector.at(i, 0)))
            }
            (m, n) => Err(Error::ShapeMismatch(format!(
                "cannot broadcast {m}x{n} over {}x{}",
                self.rows, self.cols
            ))),
        }
    }

    /// Sums along `axis`: 0 collapses rows into one row of column sums,
    /// 1 collapses columns into one column of row sums.
    pub fn sum_axis(&self, axis: usize) -> Result<Matrix> {
        match axis {
            0 => Matrix::from_fn(1, self.cols, |_, j| self.column(j).sum()),
            1 => Matrix::from_fn(self.rows, 1, |i, _| self.row(i).sum()),
            _ => Err(Error::ShapeMismatch(format!(
                "axis {axis} is out of bounds for a 2-D matrix"
            ))),
        }
    }

    pub fn sum(&self) -> f64 {
        self.iter().sum()
    }

    /// Copies rows `start..end` into a new matrix.
    pub fn slice_rows(&self, start: usize, end: usize) -> Result<Matrix> {
        if start >= end || end > self.rows {
            return Err(Error::ShapeMismatch(format!(
                "row range {start}..{end} is invalid for {} rows",
                self.rows
            )));
        }
        Matrix::from_fn(end - start, self.cols, |i, j| self.at(start + i, j))
    }

    /// Inverse by Gauss-Jordan elimination with partial pivoting.
    ///
    /// A pivot counts as zero when it is within `n * EPSILON` of the largest
    /// entry's magnitude, so the check does not depend on the matrix's scale.
    pub fn inverse(&self) -> Result<Matrix> {
        if self.rows != self.cols {
            return Err(Error::ShapeMismatch(format!(
                "cannot invert non-square {}x{} matrix",
                self.rows, self.cols
            )));
        }

        let n = self.rows;
        let mut a = self.to_vec();
        let mut inv = Matrix::identity(n)?.to_vec();
        let scale = self.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
        let tol = n as f64 * f64::EPSILON * scale;

        for col in 0..n {
            let pivot = (col..n)
                .max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))
                .unwrap_or(col);
            if a[pivot][col].abs() <= tol {
                return Err(Error::Singular(format!("zero pivot in column {col}")));
            }
            a.swap(col, pivot);
            inv.swap(col, pivot);

            let p = a[col][col];
            for j in 0..n {
                a[col][j] /= p;
                inv[col][j] /= p;
            }

            for row in 0..n {
                if row == col {
                    continue;
                }
                let factor = a[row][col];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..n {
                    a[row][j] -= factor * a[col][j];
                    inv[row][j] -= factor * inv[col][j];
                }
            }
        }

        Matrix::new(inv)
    }

    pub fn is_finite(&self) -> bool {
        self.iter().all(f64::is_finite)
    }

    /// Same shape and every entry within `tol`.
    pub fn approx_eq(&self, other: &Matrix, tol: f64) -> bool {
        self.shape() == other.shape()
            && self.iter().zip(other.iter()).all(|(a, b)| (a - b).abs() <= tol)
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.iter().eq(other.iter())
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.data[i * self.row_stride + j * self.col_stride]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:?}", self.row(i).collect::<Vec<_>>())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(data: &[&[f64]]) -> Matrix {
        Matrix::new(data.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn new_rejects_empty_and_jagged_input() {
        assert!(matches!(Matrix::new(vec![]), Err(Error::InvalidConstruction(_))));
        assert!(matches!(Matrix::new(vec![vec![]]), Err(Error::InvalidConstruction(_))));
        assert!(matches!(
            Matrix::new(vec![vec![1.0, 2.0], vec![3.0]]),
            Err(Error::InvalidConstruction(_))
        ));
    }

    #[test]
    fn transpose_shares_buffer_and_keeps_original() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let t = a.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.to_vec(), vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]);
        assert!(Arc::ptr_eq(&a.data, &t.data));
        assert_eq!(a.to_vec(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn matmul_computes_dot_products() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = m(&[&[5.0, 6.0, 7.0], &[8.0, 9.0, 10.0]]);
        let c = a.matmul(&b).unwrap();
        assert_eq!(c, m(&[&[21.0, 24.0, 27.0], &[47.0, 54.0, 61.0]]));
    }

    #[test]
    fn matmul_works_on_transposed_views() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        // aᵀ·a is 3x3 and symmetric.
        let g = a.transpose().matmul(&a).unwrap();
        assert_eq!(g.shape(), (3, 3));
        assert_eq!(g, g.transpose());
        assert_eq!(g[(0, 0)], 17.0);
        assert_eq!(g[(1, 2)], 2.0 * 3.0 + 5.0 * 6.0);
    }

    #[test]
    fn matmul_rejects_inner_dimension_mismatch() {
        let a = Matrix::zeros(2, 3).unwrap();
        let b = Matrix::zeros(2, 3).unwrap();
        assert!(matches!(a.matmul(&b), Err(Error::ShapeMismatch(_))));
    }

    #[test]
    fn zip_with_requires_same_shape() {
        let a = Matrix::zeros(2, 2).unwrap();
        let b = Matrix::zeros(2, 1).unwrap();
        assert!(matches!(a.add(&b), Err(Error::ShapeMismatch(_))));
        let c = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(c.hadamard(&c).unwrap(), m(&[&[1.0, 4.0], &[9.0, 16.0]]));
        assert_eq!(c.sub(&c).unwrap(), Matrix::zeros(2, 2).unwrap());
    }

    #[test]
    fn broadcast_row_and_column_vectors() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let row = m(&[&[10.0, 20.0, 30.0]]);
        let col = m(&[&[100.0], &[200.0]]);
        assert_eq!(
            a.broadcast(&row, |x, y| x + y).unwrap(),
            m(&[&[11.0, 22.0, 33.0], &[14.0, 25.0, 36.0]])
        );
        assert_eq!(
            a.broadcast(&col, |x, y| x + y).unwrap(),
            m(&[&[101.0, 102.0, 103.0], &[204.0, 205.0, 206.0]])
        );
    }

    #[test]
    fn broadcast_one_by_one_is_scalar_even_for_single_column() {
        let a = m(&[&[1.0], &[2.0], &[3.0]]);
        let s = m(&[&[10.0]]);
        assert_eq!(a.broadcast(&s, |x, y| x * y).unwrap(), m(&[&[10.0], &[20.0], &[30.0]]));
    }

    #[test]
    fn broadcast_rejects_mismatched_vectors() {
        let a = Matrix::zeros(2, 3).unwrap();
        assert!(a.broadcast(&Matrix::zeros(1, 2).unwrap(), |x, y| x + y).is_err());
        assert!(a.broadcast(&Matrix::zeros(3, 1).unwrap(), |x, y| x + y).is_err());
        assert!(a.broadcast(&Matrix::zeros(2, 3).unwrap(), |x, y| x + y).is_err());
    }

    #[test]
    fn sum_axis_and_sum() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        assert_eq!(a.sum_axis(0).unwrap(), m(&[&[5.0, 7.0, 9.0]]));
        assert_eq!(a.sum_axis(1).unwrap(), m(&[&[6.0], &[15.0]]));
        assert!(matches!(a.sum_axis(2), Err(Error::ShapeMismatch(_))));
        assert_eq!(a.sum(), 21.0);
    }

    #[test]
    fn slice_rows_bounds() {
        let a = m(&[&[1.0], &[2.0], &[3.0]]);
        assert_eq!(a.slice_rows(1, 3).unwrap(), m(&[&[2.0], &[3.0]]));
        assert!(a.slice_rows(2, 2).is_err());
        assert!(a.slice_rows(0, 4).is_err());
    }

    #[test]
    fn inverse_of_known_matrix() {
        let a = m(&[&[4.0, 7.0], &[2.0, 6.0]]);
        let inv = a.inverse().unwrap();
        assert!(inv.approx_eq(&m(&[&[0.6, -0.7], &[-0.2, 0.4]]), 1e-12));
        assert!(a.matmul(&inv).unwrap().approx_eq(&Matrix::identity(2).unwrap(), 1e-12));
    }

    #[test]
    fn inverse_rejects_singular_and_non_square() {
        let singular = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
        assert!(matches!(singular.inverse(), Err(Error::Singular(_))));
        assert!(matches!(Matrix::zeros(2, 3).unwrap().inverse(), Err(Error::ShapeMismatch(_))));
        assert!(matches!(Matrix::zeros(2, 2).unwrap().inverse(), Err(Error::Singular(_))));
    }

    #[test]
    fn inverse_of_tiny_diagonal_is_not_singular() {
        let a = Matrix::identity(2).unwrap().scale(1e-17);
        let inv = a.inverse().unwrap();
        assert!((inv[(0, 0)] - 1e17).abs() < 1e5);
        assert!((inv[(1, 1)] - 1e17).abs() < 1e5);
        assert_eq!(inv[(0, 1)], 0.0);
    }

    #[test]
    fn row_and_column_read_in_range() {
        let a = m(&[&[1.0], &[2.0], &[3.0]]);
        assert_eq!(a.column(0).collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
        assert_eq!(a.row(2).collect::<Vec<_>>(), vec![3.0]);
    }

    #[test]
    #[should_panic(expected = "column 1 out of bounds")]
    fn column_out_of_range_panics() {
        let a = m(&[&[1.0], &[2.0], &[3.0]]);
        let _ = a.column(1).take(1).collect::<Vec<_>>();
    }

    #[test]
    #[should_panic(expected = "row 3 out of bounds")]
    fn row_out_of_range_panics() {
        let a = m(&[&[1.0], &[2.0], &[3.0]]);
        let _ = a.row(3);
    }

    #[test]
    fn display_prints_one_row_per_line() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(a.to_string(), "[1.0, 2.0]\n[3.0, 4.0]");
    }
}
