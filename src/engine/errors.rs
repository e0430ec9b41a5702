use thiserror::Error;

/// Broad classification of an [`EngineError`], used by the transport to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    StateConflict,
    InsufficientResource,
    Persistence,
}

/// Errors that can arise while applying an operation to the game document or persisting it.
///
/// The first three variants are rejections: the operation was refused and nothing changed.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing or out-of-range index, empty required field, unknown name.
    #[error("{0}")]
    Validation(String),

    /// Already completed, already claimed, quest not ready, duplicate delete.
    #[error("{0}")]
    StateConflict(String),

    /// Not enough coins or stat points.
    #[error("{0}")]
    InsufficientResource(String),

    /// Wrapper around IO errors (directory creation, locking, rename).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around JSON serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Returned when loading a document written by a different schema version.
    #[error("schema mismatch for game document: expected {expected}, got {found}")]
    SchemaMismatch { expected: u8, found: u8 },
}

impl EngineError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::StateConflict(reason.into())
    }

    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self::InsufficientResource(reason.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Validation(_) => ErrorKind::Validation,
            EngineError::StateConflict(_) => ErrorKind::StateConflict,
            EngineError::InsufficientResource(_) => ErrorKind::InsufficientResource,
            EngineError::Io(_) | EngineError::Json(_) | EngineError::SchemaMismatch { .. } => {
                ErrorKind::Persistence
            }
        }
    }

    /// True when the operation was refused by a game rule (as opposed to a storage failure).
    pub fn is_rejection(&self) -> bool {
        self.kind() != ErrorKind::Persistence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_render_bare_reason() {
        let err = EngineError::insufficient("Insufficient coins");
        assert_eq!(err.to_string(), "Insufficient coins");
        assert_eq!(err.kind(), ErrorKind::InsufficientResource);
        assert!(err.is_rejection());
    }

    #[test]
    fn io_errors_are_persistence_failures() {
        let err: EngineError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert!(!err.is_rejection());
    }
}
