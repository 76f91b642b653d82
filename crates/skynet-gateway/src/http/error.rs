//! Maps `SkynetError` (§7's error taxonomy) onto HTTP status codes and a
//! stable `{code, message}` JSON body. Every handler in this module
//! returns `ApiResult<T>` so error handling is centralised here rather
//! than repeated per-handler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use skynet_core::error::SkynetError;

pub type ApiResult<T> = Result<T, ApiError>;

pub struct ApiError(pub SkynetError);

impl From<SkynetError> for ApiError {
    fn from(e: SkynetError) -> Self {
        ApiError(e)
    }
}

impl From<skynet_knowledge::KnowledgeError> for ApiError {
    fn from(e: skynet_knowledge::KnowledgeError) -> Self {
        ApiError(e.into())
    }
}

impl From<skynet_ingestion::IngestionError> for ApiError {
    fn from(e: skynet_ingestion::IngestionError) -> Self {
        ApiError(e.into())
    }
}

impl From<skynet_fileproc::FileprocError> for ApiError {
    fn from(e: skynet_fileproc::FileprocError) -> Self {
        ApiError(e.into())
    }
}

impl From<skynet_backup::BackupError> for ApiError {
    fn from(e: skynet_backup::BackupError) -> Self {
        ApiError(e.into())
    }
}

impl From<skynet_vector::VectorError> for ApiError {
    fn from(e: skynet_vector::VectorError) -> Self {
        ApiError(SkynetError::BackendUnavailable(e.to_string()))
    }
}

impl From<skynet_graph::GraphError> for ApiError {
    fn from(e: skynet_graph::GraphError) -> Self {
        ApiError(SkynetError::BackendUnavailable(e.to_string()))
    }
}

impl From<skynet_agent::provider::ProviderError> for ApiError {
    fn from(e: skynet_agent::provider::ProviderError) -> Self {
        use skynet_agent::provider::ProviderError;
        let mapped = match e {
            ProviderError::RateLimited { retry_after_ms } => SkynetError::LlmTimeout { ms: retry_after_ms },
            ProviderError::Parse(msg) => SkynetError::LlmMalformed(msg),
            other => SkynetError::BackendUnavailable(other.to_string()),
        };
        ApiError(mapped)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError(SkynetError::Internal(e.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let e = self.0;
        // ConflictDuplicate/ExtractionEmpty are legitimate outcomes (§7), not
        // errors — surfaced as 200 with their status in the body by callers
        // that expect them; reaching here means an un-special-cased path hit
        // one, so fall back to 200/ok rather than an error status.
        let status = if !e.is_error_outcome() {
            StatusCode::OK
        } else {
            match &e {
                SkynetError::ValidationError(_) => StatusCode::BAD_REQUEST,
                SkynetError::NotFound(_) => StatusCode::NOT_FOUND,
                SkynetError::AuthFailed(_) => StatusCode::UNAUTHORIZED,
                SkynetError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                SkynetError::LlmTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                SkynetError::LlmMalformed(_) => StatusCode::BAD_GATEWAY,
                SkynetError::Config(_) | SkynetError::Fatal(_) | SkynetError::Internal(_) | SkynetError::Database(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                SkynetError::Serialization(_) | SkynetError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
                SkynetError::ConflictDuplicate(_) | SkynetError::ExtractionEmpty => StatusCode::OK,
            }
        };
        (status, Json(json!({"code": e.code(), "message": e.to_string()}))).into_response()
    }
}
