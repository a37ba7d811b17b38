use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrellisError>;

#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("{child} is not in the order of {parent}")]
    ChildNotInOrder { parent: String, child: String },

    #[error("Duplicate ID {child} in the order of {parent}")]
    DuplicateId { parent: String, child: String },

    #[error("Invalid {field}: {message}")]
    InvalidInput { field: &'static str, message: String },

    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    #[error("A drag is already in progress")]
    DragInProgress,

    #[error("No drag in progress")]
    NoActiveDrag,

    #[error("Invalid drag: {0}")]
    InvalidDrag(String),

    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("Storage not initialized")]
    StorageNotInitialized,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl TrellisError {
    /// True for every variant that reports a stale or unknown reference.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BoardNotFound(_)
                | Self::ListNotFound(_)
                | Self::CardNotFound(_)
                | Self::ChildNotInOrder { .. }
        )
    }

    pub(crate) fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }
}
