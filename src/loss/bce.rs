use crate::error::{Error, Result};
use crate::math::Matrix;

/// Binary cross-entropy over a column of sigmoid outputs.
///
/// `loss` remembers the `(predictions, targets)` pair it was called with so
/// that `gradient` can be queried afterwards without passing them again.
///
/// By default predictions are used as-is: a prediction of exactly 0 or 1
/// yields an infinite or NaN loss. `with_epsilon` clamps predictions to
/// `[ε, 1-ε]` in both the loss and its gradient.
#[derive(Debug, Clone, Default)]
pub struct BinaryCrossEntropy {
    epsilon: Option<f64>,
    cache: Option<(Matrix, Matrix)>,
}

impl BinaryCrossEntropy {
    pub fn new() -> BinaryCrossEntropy {
        BinaryCrossEntropy::default()
    }

    pub fn with_epsilon(epsilon: f64) -> Result<BinaryCrossEntropy> {
        if !(epsilon > 0.0 && epsilon < 0.5) {
            return Err(Error::InvalidConfig(format!(
                "clipping epsilon must lie in (0, 0.5), got {epsilon}"
            )));
        }
        Ok(BinaryCrossEntropy {
            epsilon: Some(epsilon),
            cache: None,
        })
    }

    pub fn epsilon(&self) -> Option<f64> {
        self.epsilon
    }

    fn clip(&self, predictions: &Matrix) -> Matrix {
        match self.epsilon {
            Some(eps) => predictions.map(|y| y.clamp(eps, 1.0 - eps)),
            None => predictions.clone(),
        }
    }

    /// Scalar BCE: `-mean(t·ln(y) + (1-t)·ln(1-y))` over the `n` rows.
    pub fn loss(&mut self, predictions: &Matrix, targets: &Matrix) -> Result<f64> {
        if predictions.shape() != targets.shape() || predictions.cols() != 1 {
            return Err(Error::ShapeMismatch(format!(
                "binary cross-entropy needs two n x 1 matrices, got {:?} and {:?}",
                predictions.shape(),
                targets.shape()
            )));
        }

        let y = self.clip(predictions);
        let n = y.rows() as f64;
        let total = y
            .zip_with(targets, |y, t| t * y.ln() + (1.0 - t) * (1.0 - y).ln())?
            .sum();
        let loss = -total / n;
        if !loss.is_finite() {
            log::warn!("binary cross-entropy is {loss}; predictions reached 0 or 1");
        }

        self.cache = Some((y, targets.clone()));
        Ok(loss)
    }

    /// `∂L/∂y = -(t/y - (1-t)/(1-y)) / n` for the pair last passed to `loss`.
    pub fn gradient(&self) -> Result<Matrix> {
        let (y, t) = self.cache.as_ref().ok_or_else(|| {
            Error::StaleState("gradient requested before any loss evaluation".into())
        })?;
        let n = y.rows() as f64;
        t.zip_with(y, |t, y| -(t / y - (1.0 - t) / (1.0 - y)) / n)
    }
}
