use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::layers::{Layer, LayerCache, Linear, Sigmoid};
use crate::math::{Initializer, Matrix};
use crate::network::spec::{LayerSpec, NetworkSpec};

/// Result of a network forward pass: the final output plus one cache per
/// layer, in layer order. `Network::backward` consumes it.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    output: Matrix,
    caches: Vec<LayerCache>,
}

impl ForwardPass {
    pub fn output(&self) -> &Matrix {
        &self.output
    }

    pub fn into_output(self) -> Matrix {
        self.output
    }
}

/// Ordered stack of layers.
#[derive(Debug, Default)]
pub struct Network {
    layers: Vec<Box<dyn Layer>>,
}

impl Network {
    pub fn new(layers: Vec<Box<dyn Layer>>) -> Network {
        Network { layers }
    }

    /// Builds the layers a spec describes. Parameters still need
    /// `initialize`.
    pub fn from_spec(spec: &NetworkSpec) -> Network {
        let layers = spec
            .layers
            .iter()
            .map(|layer| -> Box<dyn Layer> {
                match *layer {
                    LayerSpec::Linear { in_size, out_size } => Box::new(Linear::new(in_size, out_size)),
                    LayerSpec::Sigmoid => Box::new(Sigmoid::new()),
                }
            })
            .collect();
        Network { layers }
    }

    pub fn push(&mut self, layer: Box<dyn Layer>) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Initializes every layer in order from a single RNG seeded by `init`.
    pub fn initialize(&mut self, init: &Initializer) -> Result<()> {
        let mut rng = StdRng::seed_from_u64(init.seed());
        for layer in &mut self.layers {
            layer.initialize(init, &mut rng)?;
        }
        log::debug!("initialized {} layers with {:?}", self.layers.len(), init);
        Ok(())
    }

    /// Threads `input` through every layer in order.
    pub fn forward(&self, input: &Matrix) -> Result<ForwardPass> {
        let mut current = input.clone();
        let mut caches = Vec::with_capacity(self.layers.len());
        for (i, layer) in self.layers.iter().enumerate() {
            let (output, cache) = layer.forward(&current)?;
            log::trace!("layer {i} ({}) -> {:?}", layer.name(), output.shape());
            caches.push(cache);
            current = output;
        }
        Ok(ForwardPass { output: current, caches })
    }

    /// Forward pass without keeping the caches.
    pub fn predict(&self, input: &Matrix) -> Result<Matrix> {
        self.forward(input).map(ForwardPass::into_output)
    }

    /// Threads ∂L/∂output back through the layers in reverse order, each
    /// layer feeding its input gradient to the one before it.
    pub fn backward(&mut self, pass: ForwardPass, grad_output: &Matrix) -> Result<()> {
        if pass.caches.len() != self.layers.len() {
            return Err(Error::StaleState(format!(
                "forward pass has {} caches for {} layers",
                pass.caches.len(),
                self.layers.len()
            )));
        }

        let mut grad = grad_output.clone();
        for (layer, cache) in self.layers.iter_mut().zip(pass.caches).rev() {
            grad = layer.backward(cache, &grad)?;
        }
        Ok(())
    }

    pub fn update(&mut self, learning_rate: f64) -> Result<()> {
        for layer in &mut self.layers {
            layer.update(learning_rate)?;
        }
        Ok(())
    }
}
