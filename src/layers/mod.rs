pub mod linear;
pub mod sigmoid;

use std::fmt;

use rand::RngCore;

use crate::error::Result;
use crate::math::{Initializer, Matrix};

pub use linear::{Gradients, Linear, Parameters};
pub use sigmoid::Sigmoid;

/// What a layer's forward pass leaves behind for its backward pass.
///
/// Returned by [`Layer::forward`] and consumed by [`Layer::backward`], so a
/// backward step can only run on the output of a forward step.
#[derive(Debug, Clone)]
pub enum LayerCache {
    /// The input an affine layer was fed.
    Linear { input: Matrix },
    /// The activations a sigmoid layer produced.
    Sigmoid { output: Matrix },
}

impl LayerCache {
    pub fn kind(&self) -> &'static str {
        match self {
            LayerCache::Linear { .. } => "linear",
            LayerCache::Sigmoid { .. } => "sigmoid",
        }
    }
}

/// One stage of a feed-forward network.
///
/// A training step drives each layer through `forward → backward → update`.
pub trait Layer: fmt::Debug {
    fn name(&self) -> &'static str;

    /// Learnable parameters, for layers that have any.
    fn parameters(&self) -> Option<&Parameters> {
        None
    }

    /// Gradients kept by the last `backward`, cleared by `update`.
    fn gradients(&self) -> Option<&Gradients> {
        None
    }

    /// Sets learnable parameters (if any) and drops pending gradients.
    fn initialize(&mut self, init: &Initializer, rng: &mut dyn RngCore) -> Result<()>;

    fn forward(&self, input: &Matrix) -> Result<(Matrix, LayerCache)>;

    /// Takes ∂L/∂output and returns ∂L/∂input, keeping any parameter
    /// gradients for the next `update`.
    fn backward(&mut self, cache: LayerCache, grad_output: &Matrix) -> Result<Matrix>;

    fn update(&mut self, learning_rate: f64) -> Result<()>;
}
