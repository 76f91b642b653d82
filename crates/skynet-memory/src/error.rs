use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("memory not found: {category}/{key}")]
    NotFound { category: String, key: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<MemoryError> for skynet_core::error::SkynetError {
    fn from(e: MemoryError) -> Self {
        match e {
            MemoryError::NotFound { .. } => skynet_core::error::SkynetError::NotFound(e.to_string()),
            other => skynet_core::error::SkynetError::Database(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, MemoryError>;
