use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error(transparent)]
    Graph(#[from] skynet_graph::GraphError),

    #[error(transparent)]
    Vector(#[from] skynet_vector::VectorError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KnowledgeError>;

impl From<KnowledgeError> for skynet_core::error::SkynetError {
    fn from(e: KnowledgeError) -> Self {
        match e {
            KnowledgeError::NotFound(msg) => skynet_core::error::SkynetError::NotFound(msg),
            KnowledgeError::Validation(msg) => skynet_core::error::SkynetError::ValidationError(msg),
            other => skynet_core::error::SkynetError::BackendUnavailable(other.to_string()),
        }
    }
}
