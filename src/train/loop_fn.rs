use std::time::Instant;

use crate::error::Result;
use crate::loss::bce::BinaryCrossEntropy;
use crate::math::Matrix;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::metrics;
use crate::train::train_config::TrainConfig;

/// What one training step observed before it changed the parameters.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub loss: f64,
    pub predictions: Matrix,
}

/// Runs one full-batch step: forward → loss → gradient → backward → update.
///
/// The returned loss and predictions come from the forward pass, i.e. they
/// describe the parameters as they were before the update.
pub fn train_step(
    network: &mut Network,
    loss_fn: &mut BinaryCrossEntropy,
    inputs: &Matrix,
    targets: &Matrix,
    learning_rate: f64,
) -> Result<StepOutcome> {
    let pass = network.forward(inputs)?;
    let loss = loss_fn.loss(pass.output(), targets)?;
    let grad = loss_fn.gradient()?;
    let predictions = pass.output().clone();
    network.backward(pass, &grad)?;
    network.update(learning_rate)?;
    Ok(StepOutcome { loss, predictions })
}

/// Trains `network` for `config.epochs` full-batch steps and returns the
/// per-epoch statistics.
///
/// Any error aborts the run; parameters keep whatever updates completed
/// before it.
pub fn train_loop(
    network: &mut Network,
    loss_fn: &mut BinaryCrossEntropy,
    inputs: &Matrix,
    targets: &Matrix,
    config: &TrainConfig,
) -> Result<Vec<EpochStats>> {
    config.validate()?;
    log::info!(
        "training {} layers on {} samples for {} epochs (lr {})",
        network.len(),
        inputs.rows(),
        config.epochs,
        config.learning_rate
    );

    let mut history = Vec::with_capacity(config.epochs);
    for epoch in 1..=config.epochs {
        let t_start = Instant::now();
        let step = train_step(network, loss_fn, inputs, targets, config.learning_rate)?;
        let train_accuracy = metrics::accuracy(&step.predictions, targets, config.threshold)?;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss: step.loss,
            train_accuracy,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        if config.log_every > 0 && (epoch == 1 || epoch % config.log_every == 0) {
            log::info!(
                "epoch {}/{}: loss = {:.6}, accuracy = {:.4}",
                stats.epoch,
                stats.total_epochs,
                stats.train_loss,
                stats.train_accuracy
            );
        }
        history.push(stats);
    }

    Ok(history)
}

/// Threshold accuracy of `network` on a held-out set.
pub fn evaluate(network: &Network, inputs: &Matrix, targets: &Matrix, threshold: f64) -> Result<f64> {
    let predictions = network.predict(inputs)?;
    metrics::accuracy(&predictions, targets, threshold)
}
