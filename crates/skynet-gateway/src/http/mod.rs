//! The full §6 REST surface, one module per facet. `app::build_router`
//! wires these into the actual route tree; `error::ApiError` centralises
//! `SkynetError` → HTTP status mapping so every handler just returns
//! `error::ApiResult<T>`.

pub mod backup;
pub mod chat;
pub mod error;
pub mod financial;
pub mod graphviz;
pub mod health;
pub mod ingest;
pub mod inventory;
pub mod knowledge;
pub mod notifications;
pub mod proactive;
pub mod productivity;
pub mod projects;
pub mod reminders;
pub mod search;
pub mod tasks;
pub mod ui;
