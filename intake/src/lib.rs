//! Inbound side of the relay: the HTTP intake endpoints and the request
//! filtering that decides whether a payload is forwarded to Notion.

pub mod api;
pub mod config;
pub mod dedup;
mod errors;
pub mod metrics_defs;
mod payload;
pub mod signature;
mod state;
pub mod trigger;

pub use api::{ServeError, router, serve};
pub use errors::IntakeError;
pub use state::AppState;
