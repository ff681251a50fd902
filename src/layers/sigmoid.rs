use rand::RngCore;

use crate::error::{Error, Result};
use crate::layers::{Layer, LayerCache};
use crate::math::{Initializer, Matrix};

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Element-wise logistic activation. No learnable parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sigmoid;

impl Sigmoid {
    pub fn new() -> Sigmoid {
        Sigmoid
    }
}

impl Layer for Sigmoid {
    fn name(&self) -> &'static str {
        "sigmoid"
    }

    fn initialize(&mut self, _init: &Initializer, _rng: &mut dyn RngCore) -> Result<()> {
        Ok(())
    }

    fn forward(&self, input: &Matrix) -> Result<(Matrix, LayerCache)> {
        let output = input.map(sigmoid);
        Ok((output.clone(), LayerCache::Sigmoid { output }))
    }

    /// `∂L/∂x = ∂L/∂y ⊙ y ⊙ (1 - y)`, using the cached `y`.
    fn backward(&mut self, cache: LayerCache, grad_output: &Matrix) -> Result<Matrix> {
        match cache {
            LayerCache::Sigmoid { output } => {
                grad_output.zip_with(&output, |g, y| g * y * (1.0 - y))
            }
            other => Err(Error::StaleState(format!(
                "sigmoid layer was handed a {} cache",
                other.kind()
            ))),
        }
    }

    fn update(&mut self, _learning_rate: f64) -> Result<()> {
        Ok(())
    }
}
