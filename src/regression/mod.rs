pub mod ridge;

pub use ridge::RidgeRegression;
