use thiserror::Error;

/// Error taxonomy shared across every service crate (§7).
///
/// Crate-local error enums `#[from]`-convert into this one at the gateway
/// boundary; `code()` gives the REST edge a stable string independent of the
/// human-readable message.
#[derive(Debug, Error)]
pub enum SkynetError {
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("LLM call timed out after {ms}ms")]
    LlmTimeout { ms: u64 },

    #[error("LLM returned malformed output: {0}")]
    LlmMalformed(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate: {0}")]
    ConflictDuplicate(String),

    #[error("extraction produced no entities")]
    ExtractionEmpty,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("fatal: {0}")]
    Fatal(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl SkynetError {
    /// Stable string for REST edges and logs. Never changes across releases.
    pub fn code(&self) -> &'static str {
        match self {
            SkynetError::ValidationError(_) => "VALIDATION_ERROR",
            SkynetError::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
            SkynetError::LlmTimeout { .. } => "LLM_TIMEOUT",
            SkynetError::LlmMalformed(_) => "LLM_MALFORMED",
            SkynetError::NotFound(_) => "NOT_FOUND",
            SkynetError::ConflictDuplicate(_) => "CONFLICT_DUPLICATE",
            SkynetError::ExtractionEmpty => "EXTRACTION_EMPTY",
            SkynetError::Config(_) => "CONFIG_ERROR",
            SkynetError::AuthFailed(_) => "AUTH_FAILED",
            SkynetError::Database(_) => "DATABASE_ERROR",
            SkynetError::Serialization(_) => "SERIALIZATION_ERROR",
            SkynetError::Io(_) => "IO_ERROR",
            SkynetError::Fatal(_) => "FATAL",
            SkynetError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the §7 taxonomy treats this as a genuine error (vs. a
    /// legitimate outcome like a duplicate upload or an empty extraction).
    pub fn is_error_outcome(&self) -> bool {
        !matches!(
            self,
            SkynetError::ConflictDuplicate(_) | SkynetError::ExtractionEmpty
        )
    }
}

pub type Result<T> = std::result::Result<T, SkynetError>;
