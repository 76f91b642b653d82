pub mod chunk;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod types;

pub use error::{IngestionError, Result};
pub use pipeline::{sha256_hex, IngestionPipeline};
pub use ports::Completion;
pub use types::{IngestFileRequest, IngestRequest, IngestResult, IngestStatus};
