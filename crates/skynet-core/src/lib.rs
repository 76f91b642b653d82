//! `skynet-core` — shared configuration, error taxonomy, and domain
//! vocabulary used by every other crate in the workspace.

pub mod config;
pub mod error;
pub mod reminder;
pub mod types;

pub use config::SkynetConfig;
pub use error::{Result, SkynetError};
