pub mod client;
pub mod error;
pub mod types;

pub use client::GraphClient;
pub use error::{GraphError, Result};
pub use types::{normalize_properties, normalize_property, EdgeRecord, NodeRecord, PropertyMap, Row};
