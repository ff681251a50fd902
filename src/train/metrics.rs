use crate::error::{Error, Result};
use crate::math::Matrix;

/// Maps every prediction to 1.0 if it is strictly above `threshold`, else 0.0.
pub fn binarize(predictions: &Matrix, threshold: f64) -> Matrix {
    predictions.map(|p| if p > threshold { 1.0 } else { 0.0 })
}

/// Fraction of rows whose binarized prediction equals the target.
pub fn accuracy(predictions: &Matrix, targets: &Matrix, threshold: f64) -> Result<f64> {
    if predictions.shape() != targets.shape() {
        return Err(Error::ShapeMismatch(format!(
            "accuracy of {:?} predictions against {:?} targets",
            predictions.shape(),
            targets.shape()
        )));
    }
    let hits = binarize(predictions, threshold).zip_with(targets, |p, t| if p == t { 1.0 } else { 0.0 })?;
    Ok(hits.sum() / (hits.rows() * hits.cols()) as f64)
}
