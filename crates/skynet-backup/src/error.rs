use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error(transparent)]
    Graph(#[from] skynet_graph::GraphError),

    #[error(transparent)]
    Vector(#[from] skynet_vector::VectorError),

    #[error(transparent)]
    Memory(#[from] skynet_memory::MemoryError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("backup not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, BackupError>;

impl From<BackupError> for skynet_core::error::SkynetError {
    fn from(e: BackupError) -> Self {
        match e {
            BackupError::NotFound(msg) => skynet_core::error::SkynetError::NotFound(msg),
            other => skynet_core::error::SkynetError::BackendUnavailable(other.to_string()),
        }
    }
}
