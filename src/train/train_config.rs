use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hyperparameters for a `train_loop` run.
///
/// # Fields
/// - `epochs`        — number of full-batch training steps
/// - `learning_rate` — step size applied against each gradient
/// - `threshold`     — predictions above it count as class 1 for accuracy
/// - `log_every`     — emit an `info!` progress line every this many epochs
///                     (0 disables periodic logging)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub threshold: f64,
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 1000,
            learning_rate: 0.1,
            threshold: 0.5,
            log_every: 50,
        }
    }
}

impl TrainConfig {
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            ..TrainConfig::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be at least 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "threshold must lie in (0, 1), got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}
