use std::path::PathBuf;

use thiserror::Error;

use crate::model::variant::ModelVariant;

/// Every failure the classification pipeline can report.
///
/// All variants are local conditions the caller can recover from (usually by
/// asking the user to redraw); nothing here is retried internally.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("no image was supplied")]
    ImageMissing,

    #[error("failed to decode image: {0}")]
    ImageDecode(String),

    #[error("invalid target size {width}x{height}")]
    InvalidTargetSize { width: u32, height: u32 },

    #[error("cannot extract {requested} channel(s) from an image with {available} component(s)")]
    UnsupportedChannelCount { requested: usize, available: usize },

    #[error("invalid inference results: {0}")]
    InvalidResults(String),

    #[error("top_k must be at least 1")]
    InvalidTopK,

    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("invalid model: {0}")]
    ModelShape(String),

    #[error("label table is empty")]
    LabelsEmpty,

    #[error("model variant '{0}' is not loaded")]
    VariantNotLoaded(ModelVariant),

    #[error("no model is loaded")]
    NoModelLoaded,

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClassifyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ClassifyError::Io { path: path.into(), source }
    }

    /// True for failures caused by the caller's input rather than by the
    /// loaded model or the filesystem.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ClassifyError::ImageMissing
                | ClassifyError::ImageDecode(_)
                | ClassifyError::InvalidTargetSize { .. }
                | ClassifyError::UnsupportedChannelCount { .. }
                | ClassifyError::InvalidTopK
        )
    }
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
