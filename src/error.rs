use std::fmt;

/// Every failure the numeric core and its wrappers can report.
///
/// All variants are fatal to the operation that produced them: no partial
/// result is returned and nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operand dimensions violate an operation's precondition (including an
    /// unsupported reduction axis).
    ShapeMismatch(String),
    /// A matrix was built from empty or non-rectangular input.
    InvalidConstruction(String),
    /// A step ran without the step it depends on (backward before forward,
    /// gradient before loss, update before backward).
    StaleState(String),
    /// Matrix inversion hit a zero pivot.
    Singular(String),
    InvalidConfig(String),
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ShapeMismatch(msg) => write!(f, "shape mismatch: {msg}"),
            Error::InvalidConstruction(msg) => write!(f, "invalid construction: {msg}"),
            Error::StaleState(msg) => write!(f, "stale state: {msg}"),
            Error::Singular(msg) => write!(f, "singular matrix: {msg}"),
            Error::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Error::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
