use thiserror::Error;

pub type Result<T> = std::result::Result<T, AqtError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AqtError {
    #[error("shape mismatch in {op}: expected {expected}, got {actual}")]
    ShapeMismatch { op: &'static str, expected: usize, actual: usize },

    #[error("ragged matrix: row {row} has {actual} columns, expected {expected}")]
    RaggedRows { row: usize, expected: usize, actual: usize },

    #[error("degenerate weights: all zero")]
    DegenerateWeights,

    #[error("activation scale must be positive and finite, got {0}")]
    NonPositiveScale(f32),

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("unsupported bit width: {0} (expected 2..=24)")]
    UnsupportedBitWidth(u32),

    #[error("model has no layers")]
    EmptyModel,

    #[error("unsupported model file version: {0}")]
    UnsupportedVersion(u32),
}
