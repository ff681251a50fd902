pub mod dataset;
pub mod delimited;

pub use dataset::Dataset;
pub use delimited::load_delimited;
