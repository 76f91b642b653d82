use thiserror::Error;

#[derive(Debug, Error)]
pub enum NerError {
    #[error("extraction call failed: {0}")]
    Extraction(String),

    #[error("extraction output malformed: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, NerError>;

impl From<NerError> for skynet_core::error::SkynetError {
    fn from(e: NerError) -> Self {
        match e {
            NerError::Extraction(msg) => skynet_core::error::SkynetError::LlmMalformed(msg),
            NerError::Malformed(msg) => skynet_core::error::SkynetError::LlmMalformed(msg),
        }
    }
}
