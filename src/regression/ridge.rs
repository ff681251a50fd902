use crate::error::{Error, Result};
use crate::math::Matrix;

/// Closed-form L2-regularised least squares.
///
/// `fit` solves `W = (XᵀX + λI)⁻¹ Xᵀ t` directly; there is no bias term, so
/// append a constant feature column if one is wanted.
#[derive(Debug, Clone, Default)]
pub struct RidgeRegression {
    weights: Option<Matrix>,
}

impl RidgeRegression {
    pub fn new() -> RidgeRegression {
        RidgeRegression::default()
    }

    /// Fitted weights, shape `(features, 1)`.
    pub fn weights(&self) -> Option<&Matrix> {
        self.weights.as_ref()
    }

    pub fn fit(&mut self, features: &Matrix, targets: &Matrix, lambda: f64) -> Result<()> {
        if targets.shape() != (features.rows(), 1) {
            return Err(Error::ShapeMismatch(format!(
                "ridge targets must be {}x1, got {:?}",
                features.rows(),
                targets.shape()
            )));
        }
        if !(lambda.is_finite() && lambda >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "ridge lambda must be non-negative, got {lambda}"
            )));
        }

        let xt = features.transpose();
        let penalty = Matrix::identity(features.cols())?.scale(lambda);
        let gram = xt.matmul(features)?.add(&penalty)?;
        let weights = gram.inverse()?.matmul(&xt)?.matmul(targets)?;

        log::debug!("ridge fit on {} rows, lambda {lambda}", features.rows());
        self.weights = Some(weights);
        Ok(())
    }

    pub fn predict(&self, features: &Matrix) -> Result<Matrix> {
        let weights = self
            .weights
            .as_ref()
            .ok_or_else(|| Error::StaleState("ridge regression used before fit".into()))?;
        features.matmul(weights)
    }
}
