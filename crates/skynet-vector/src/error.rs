use thiserror::Error;

#[derive(Debug, Error)]
pub enum VectorError {
    #[error("qdrant error: {0}")]
    Qdrant(#[from] qdrant_client::QdrantError),

    #[error("embedding request failed: {0}")]
    Embed(#[from] reqwest::Error),

    #[error("embedding response malformed: {0}")]
    EmbedMalformed(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VectorError>;

impl From<VectorError> for skynet_core::error::SkynetError {
    fn from(e: VectorError) -> Self {
        skynet_core::error::SkynetError::BackendUnavailable(e.to_string())
    }
}
