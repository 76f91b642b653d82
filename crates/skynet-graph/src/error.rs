use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("neo4j connection failed: {0}")]
    Connect(neo4rs::Error),

    #[error("cypher query failed: {0}")]
    Query(neo4rs::Error),

    #[error("row deserialization failed: {0}")]
    Row(neo4rs::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;

impl From<GraphError> for skynet_core::error::SkynetError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::NotFound(msg) => skynet_core::error::SkynetError::NotFound(msg),
            other => skynet_core::error::SkynetError::BackendUnavailable(other.to_string()),
        }
    }
}
