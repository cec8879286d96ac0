use thiserror::Error;

/// Reasons a shape's backing point data never becomes renderable.
///
/// None of these reach the frame loop as a panic or an `Err`: the scene
/// records them on the shape's slot and keeps the shape inactive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("failed to load points for {shape}: {reason}")]
    LoadFailure { shape: String, reason: String },
    #[error("{shape} has no vertices")]
    EmptyGeometry { shape: String },
    #[error("vertex cache of {len} bytes is not a whole number of f32 triples")]
    CorruptCache { len: usize },
    #[error("point buffer of {len} floats is not a whole number of xyz triples")]
    RaggedBuffer { len: usize },
}

impl ShapeError {
    pub fn load_failure(shape: impl Into<String>, reason: impl ToString) -> Self {
        Self::LoadFailure {
            shape: shape.into(),
            reason: reason.to_string(),
        }
    }

    /// `true` for the "asset is valid but useless" case, which is logged
    /// separately from transport and decode failures.
    pub fn is_empty_geometry(&self) -> bool {
        matches!(self, Self::EmptyGeometry { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("source contains no vertices")]
    NoVertices,
}
