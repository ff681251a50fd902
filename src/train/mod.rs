pub mod epoch_stats;
pub mod loop_fn;
pub mod metrics;
pub mod train_config;

pub use epoch_stats::EpochStats;
pub use loop_fn::{evaluate, train_loop, train_step, StepOutcome};
pub use train_config::TrainConfig;
