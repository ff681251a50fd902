pub mod data;
pub mod error;
pub mod layers;
pub mod loss;
pub mod math;
pub mod network;
pub mod regression;
pub mod train;

// Convenience re-exports
pub use data::{load_delimited, Dataset};
pub use error::{Error, Result};
pub use layers::{Layer, LayerCache, Linear, Sigmoid};
pub use loss::bce::BinaryCrossEntropy;
pub use math::{Initializer, Matrix};
pub use network::{ForwardPass, LayerSpec, Network, NetworkSpec};
pub use regression::RidgeRegression;
pub use train::{evaluate, train_loop, train_step, EpochStats, TrainConfig};
