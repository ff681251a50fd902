use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::math::init::Initializer;
use crate::train::train_config::TrainConfig;

/// Describes one layer in a network specification.
///
/// For `linear`, `in_size` must equal the `out_size` of the previous linear
/// layer (or the dataset's feature count for the first one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSpec {
    Linear { in_size: usize, out_size: usize },
    Sigmoid,
}

/// A serializable description of a network architecture plus how to
/// initialize and train it.
///
/// ```json
/// {
///   "name": "classifier",
///   "layers": [
///     { "type": "linear", "in_size": 7, "out_size": 16 },
///     { "type": "sigmoid" },
///     { "type": "linear", "in_size": 16, "out_size": 1 },
///     { "type": "sigmoid" }
///   ],
///   "initializer": { "type": "xavier", "seed": 42 },
///   "train": { "epochs": 1000, "learning_rate": 0.1 }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name used in log output.
    pub name: String,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub initializer: Initializer,
    /// Clamp predictions to `[ε, 1-ε]` inside the loss; `None` disables it.
    #[serde(default)]
    pub clip_epsilon: Option<f64>,
    #[serde(default)]
    pub train: TrainConfig,
}

impl NetworkSpec {
    /// `inputs → hidden → 1` with a sigmoid after each affine layer.
    pub fn binary_classifier(name: &str, inputs: usize, hidden: usize) -> NetworkSpec {
        NetworkSpec {
            name: name.to_string(),
            layers: vec![
                LayerSpec::Linear { in_size: inputs, out_size: hidden },
                LayerSpec::Sigmoid,
                LayerSpec::Linear { in_size: hidden, out_size: 1 },
                LayerSpec::Sigmoid,
            ],
            initializer: Initializer::default(),
            clip_epsilon: None,
            train: TrainConfig::default(),
        }
    }

    /// Checks that the affine layers chain from `input_features` and
    /// returns the network's output width.
    pub fn validate(&self, input_features: usize) -> Result<usize> {
        if self.layers.is_empty() {
            return Err(Error::InvalidConfig(format!("network '{}' has no layers", self.name)));
        }

        let mut width = input_features;
        for (i, layer) in self.layers.iter().enumerate() {
            if let LayerSpec::Linear { in_size, out_size } = *layer {
                if in_size == 0 || out_size == 0 {
                    return Err(Error::InvalidConfig(format!(
                        "layer {i}: linear sizes must be positive, got {in_size}->{out_size}"
                    )));
                }
                if in_size != width {
                    return Err(Error::InvalidConfig(format!(
                        "layer {i}: linear expects {in_size} inputs but receives {width}"
                    )));
                }
                width = out_size;
            }
        }
        Ok(width)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> std::io::Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}
