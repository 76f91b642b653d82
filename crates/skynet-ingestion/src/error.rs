use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error(transparent)]
    Knowledge(#[from] skynet_knowledge::KnowledgeError),

    #[error(transparent)]
    Vector(#[from] skynet_vector::VectorError),

    #[error("translation call failed: {0}")]
    Translation(String),

    #[error("enrichment call failed: {0}")]
    Enrichment(String),

    #[error("fact extraction call failed: {0}")]
    Extraction(String),

    #[error("fact extraction output malformed: {0}")]
    Malformed(String),

    #[error("validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, IngestionError>;

impl From<IngestionError> for skynet_core::error::SkynetError {
    fn from(e: IngestionError) -> Self {
        match e {
            IngestionError::Validation(msg) => skynet_core::error::SkynetError::ValidationError(msg),
            IngestionError::Malformed(msg) => skynet_core::error::SkynetError::LlmMalformed(msg),
            IngestionError::Translation(msg) | IngestionError::Enrichment(msg) | IngestionError::Extraction(msg) => {
                skynet_core::error::SkynetError::LlmMalformed(msg)
            }
            other => skynet_core::error::SkynetError::BackendUnavailable(other.to_string()),
        }
    }
}
