use crate::error::{Error, Result};
use crate::math::Matrix;

/// Feature matrix `(n, features)` paired with a label column `(n, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub features: Matrix,
    pub labels: Matrix,
}

impl Dataset {
    pub fn new(features: Matrix, labels: Matrix) -> Result<Dataset> {
        if labels.cols() != 1 || labels.rows() != features.rows() {
            return Err(Error::InvalidData(format!(
                "{} feature rows need a {}x1 label column, got {:?}",
                features.rows(),
                features.rows(),
                labels.shape()
            )));
        }
        Ok(Dataset { features, labels })
    }

    pub fn len(&self) -> usize {
        self.features.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn feature_count(&self) -> usize {
        self.features.cols()
    }

    /// Splits into the first `n` rows and the rest, in file order.
    pub fn split_at(&self, n: usize) -> Result<(Dataset, Dataset)> {
        if n == 0 || n >= self.len() {
            return Err(Error::InvalidData(format!(
                "cannot split {} rows at {n}: both halves must be non-empty",
                self.len()
            )));
        }
        let head = Dataset {
            features: self.features.slice_rows(0, n)?,
            labels: self.labels.slice_rows(0, n)?,
        };
        let tail = Dataset {
            features: self.features.slice_rows(n, self.len())?,
            labels: self.labels.slice_rows(n, self.len())?,
        };
        Ok((head, tail))
    }
}
