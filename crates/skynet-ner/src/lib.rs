pub mod client;
pub mod error;
pub mod extractor;
pub mod types;

pub use client::NerClient;
pub use error::{NerError, Result};
pub use extractor::Extractor;
pub use types::{EntityLabel, NamedEntity};
