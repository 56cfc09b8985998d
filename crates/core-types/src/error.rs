use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Shape mismatch: expected {expected} indicator positions, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Arithmetic overflow while {0}")]
    Overflow(&'static str),
}
