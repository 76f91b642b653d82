pub mod client;
pub mod error;
pub mod types;

pub use client::VectorStore;
pub use error::{Result, VectorError};
pub use types::{entity_name_namespace, ScrollPoint, SearchHit, VectorPayload};
