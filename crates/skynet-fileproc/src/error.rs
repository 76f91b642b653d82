use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileprocError {
    #[error(transparent)]
    Ingestion(#[from] skynet_ingestion::IngestionError),

    #[error(transparent)]
    Knowledge(#[from] skynet_knowledge::KnowledgeError),

    #[error(transparent)]
    Vector(#[from] skynet_vector::VectorError),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("image decode failed: {0}")]
    Image(String),

    #[error("ASR call failed: {0}")]
    Asr(String),

    #[error("vision call failed: {0}")]
    Vision(String),

    #[error("vision output malformed: {0}")]
    Malformed(String),

    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("unsupported or unresolvable URL: {0}")]
    UnsupportedUrl(String),

    #[error("text could not be decoded with any supported encoding")]
    UndecodableText,
}

pub type Result<T> = std::result::Result<T, FileprocError>;

impl From<FileprocError> for skynet_core::error::SkynetError {
    fn from(e: FileprocError) -> Self {
        match e {
            FileprocError::UnsupportedUrl(msg) => skynet_core::error::SkynetError::ValidationError(msg),
            FileprocError::UndecodableText => {
                skynet_core::error::SkynetError::ValidationError("undecodable text".to_string())
            }
            FileprocError::Malformed(msg) => skynet_core::error::SkynetError::LlmMalformed(msg),
            other => skynet_core::error::SkynetError::BackendUnavailable(other.to_string()),
        }
    }
}
