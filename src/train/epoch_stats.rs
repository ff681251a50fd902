use serde::{Deserialize, Serialize};

/// Statistics for one completed epoch of `train_loop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Loss of the forward pass that started this epoch's step.
    pub train_loss: f64,
    /// Threshold accuracy of those same predictions, in [0, 1].
    pub train_accuracy: f64,
    /// Wall-clock duration of the step in milliseconds.
    pub elapsed_ms: u64,
}
