use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AscentError>;

/// Failures raised while loading artifacts or ranking against them.
///
/// All of these are fatal when raised during startup.
#[derive(Debug, Error)]
pub enum AscentError {
    /// Missing or corrupt vocabulary, corpus matrix, or metadata.
    #[error("failed to load artifact {}: {reason}", path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    /// Corpus matrix columns do not match the vocabulary size.
    #[error("corpus has {actual} columns but vocabulary has {expected} terms")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("corpus contains no documents")]
    EmptyCorpus,

    /// Invalid feature width, window bounds or similar startup settings.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
}

impl AscentError {
    pub(crate) fn artifact(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        AscentError::ArtifactLoad { path: path.into(), reason: reason.to_string() }
    }
}
