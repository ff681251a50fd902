use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::math::matrix::Matrix;

/// How an affine layer's parameters are set before training.
///
/// `Constant` fills every weight and bias with the same value. It is fully
/// reproducible but every unit in a layer starts (and stays) identical, so it
/// cannot break symmetry between hidden units. The random strategies draw from
/// a seeded RNG and start biases at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Initializer {
    Constant { weight: f64, bias: f64 },
    Uniform { limit: f64, seed: u64 },
    Xavier { seed: u64 },
    He { seed: u64 },
}

impl Default for Initializer {
    fn default() -> Self {
        Initializer::Constant { weight: 1.0, bias: 0.5 }
    }
}

impl Initializer {
    /// Seed for the RNG a network threads through its layers. Constant
    /// initialization never draws from it.
    pub fn seed(&self) -> u64 {
        match self {
            Initializer::Constant { .. } => 0,
            Initializer::Uniform { seed, .. }
            | Initializer::Xavier { seed }
            | Initializer::He { seed } => *seed,
        }
    }

    /// Returns `(weights, bias)` with shapes `(in_size, out_size)` and
    /// `(out_size, 1)`.
    pub fn parameters<R: Rng + ?Sized>(
        &self,
        in_size: usize,
        out_size: usize,
        rng: &mut R,
    ) -> Result<(Matrix, Matrix)> {
        let weights = match self {
            Initializer::Constant { weight, .. } => Matrix::filled(in_size, out_size, *weight)?,
            Initializer::Uniform { limit, .. } => Matrix::random(in_size, out_size, *limit, rng)?,
            Initializer::Xavier { .. } => Matrix::xavier(in_size, out_size, rng)?,
            Initializer::He { .. } => Matrix::he(in_size, out_size, rng)?,
        };
        let bias = match self {
            Initializer::Constant { bias, .. } => Matrix::filled(out_size, 1, *bias)?,
            _ => Matrix::zeros(out_size, 1)?,
        };
        Ok((weights, bias))
    }
}
