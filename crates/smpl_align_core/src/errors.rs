use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while loading a frame record or driving a
/// body model from it.
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("frame parameters not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse frame parameters: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("malformed frame parameters: {0}")]
    Malformed(String),
    #[error("invalid camera intrinsics: {0}")]
    InvalidIntrinsics(String),
    #[error("rotation vector has {actual} joints but the skeleton expects {expected}")]
    PoseTopologyMismatch { expected: usize, actual: usize },
    #[error("rotation for joint {joint} is not finite")]
    NonFiniteRotation { joint: String },
    #[error("shape has {actual} betas but the model expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("expression has {actual} coefficients but the model expects {expected}")]
    ExpressionMismatch { expected: usize, actual: usize },
}

impl AlignError {
    /// Load failures abort the whole frame, everything else is scoped to a
    /// single operation on a single human.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Io { .. } | Self::Parse(_) | Self::Malformed(_))
    }
}
