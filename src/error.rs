// File: src/error.rs
use thiserror::Error;

/// Failure to classify a single span.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("span {0:?} has no classifiable symbols")]
    EmptySpan(String),
}

/// Failure to read a vocabulary, character or sentence table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no level files (L1..L6) found in {}", .0.display())]
    MissingLevels(std::path::PathBuf),
}

/// Failure to save or restore an index snapshot.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("could not move snapshot into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}
