use crate::scene::NodeId;

/// Scene graph misuse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("scene node {0:?} does not exist")]
    UnknownNode(NodeId),
}

/// Rejected writes from a tuning collaborator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TuningError {
    #[error("unknown tuning parameter `{0}`")]
    UnknownParam(String),
    #[error("tuning parameter `{name}` rejected non-finite value {value}")]
    NotFinite { name: String, value: f32 },
    #[error("malformed tuning preset: {0}")]
    Preset(String),
}

/// Decoded image data that does not describe a usable texture.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    #[error("image has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error("expected {expected} bytes of RGBA8 pixels, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}
