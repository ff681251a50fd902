use rand::RngCore;

use crate::error::{Error, Result};
use crate::layers::{Layer, LayerCache};
use crate::math::{Initializer, Matrix};

/// Learnable state of an affine layer.
#[derive(Debug, Clone)]
pub struct Parameters {
    /// Shape `(in_size, out_size)`.
    pub weights: Matrix,
    /// Shape `(out_size, 1)`.
    pub bias: Matrix,
}

/// ∂L/∂weights and ∂L/∂bias from the last backward pass.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub weights: Matrix,
    pub bias: Matrix,
}

/// Affine layer: `output = input · W + bᵀ`.
#[derive(Debug)]
pub struct Linear {
    in_size: usize,
    out_size: usize,
    params: Option<Parameters>,
    gradients: Option<Gradients>,
}

impl Linear {
    /// Creates an uninitialized layer; call `initialize` (or
    /// `set_parameters`) before the first forward pass.
    pub fn new(in_size: usize, out_size: usize) -> Linear {
        Linear {
            in_size,
            out_size,
            params: None,
            gradients: None,
        }
    }

    pub fn in_size(&self) -> usize {
        self.in_size
    }

    pub fn out_size(&self) -> usize {
        self.out_size
    }

    /// Replaces weights and bias after checking their shapes.
    pub fn set_parameters(&mut self, weights: Matrix, bias: Matrix) -> Result<()> {
        if weights.shape() != (self.in_size, self.out_size) || bias.shape() != (self.out_size, 1) {
            return Err(Error::ShapeMismatch(format!(
                "linear {}->{} needs weights {}x{} and bias {}x1, got {:?} and {:?}",
                self.in_size,
                self.out_size,
                self.in_size,
                self.out_size,
                self.out_size,
                weights.shape(),
                bias.shape()
            )));
        }
        self.params = Some(Parameters { weights, bias });
        self.gradients = None;
        Ok(())
    }

    fn params(&self) -> Result<&Parameters> {
        self.params.as_ref().ok_or_else(|| {
            Error::StaleState(format!(
                "linear {}->{} used before initialize",
                self.in_size, self.out_size
            ))
        })
    }
}

impl Layer for Linear {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn parameters(&self) -> Option<&Parameters> {
        self.params.as_ref()
    }

    fn gradients(&self) -> Option<&Gradients> {
        self.gradients.as_ref()
    }

    fn initialize(&mut self, init: &Initializer, rng: &mut dyn RngCore) -> Result<()> {
        let (weights, bias) = init.parameters(self.in_size, self.out_size, rng)?;
        self.set_parameters(weights, bias)
    }

    fn forward(&self, input: &Matrix) -> Result<(Matrix, LayerCache)> {
        let params = self.params()?;
        let output = input
            .matmul(&params.weights)?
            .broadcast(&params.bias.transpose(), |z, b| z + b)?;
        Ok((output, LayerCache::Linear { input: input.clone() }))
    }

    fn backward(&mut self, cache: LayerCache, grad_output: &Matrix) -> Result<Matrix> {
        let input = match cache {
            LayerCache::Linear { input } => input,
            other => {
                return Err(Error::StaleState(format!(
                    "linear layer was handed a {} cache",
                    other.kind()
                )))
            }
        };
        if grad_output.shape() != (input.rows(), self.out_size) {
            return Err(Error::ShapeMismatch(format!(
                "linear {}->{} expected output gradient {}x{}, got {:?}",
                self.in_size,
                self.out_size,
                input.rows(),
                self.out_size,
                grad_output.shape()
            )));
        }

        let params = self.params()?;
        let weights_grad = input.transpose().matmul(grad_output)?;
        let bias_grad = grad_output.sum_axis(0)?.transpose();
        let input_grad = grad_output.matmul(&params.weights.transpose())?;

        self.gradients = Some(Gradients {
            weights: weights_grad,
            bias: bias_grad,
        });
        Ok(input_grad)
    }

    /// `W -= lr·∂W`, `b -= lr·∂b`. Consumes the pending gradients.
    fn update(&mut self, learning_rate: f64) -> Result<()> {
        let grads = self.gradients.take().ok_or_else(|| {
            Error::StaleState(format!(
                "linear {}->{} updated without a backward pass",
                self.in_size, self.out_size
            ))
        })?;
        let params = self.params()?;

        let weights = params.weights.sub(&grads.weights.scale(learning_rate))?;
        let bias = params.bias.sub(&grads.bias.scale(learning_rate))?;
        self.params = Some(Parameters { weights, bias });
        Ok(())
    }
}
