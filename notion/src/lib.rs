//! Client for the Notion REST API.
//!
//! Only the two calls the relay needs are implemented: creating a page in a
//! database and retrieving the database to check that the credentials work.

mod client;
pub mod config;
mod database_id;
mod errors;
pub mod metrics_defs;
mod schema;

pub use client::NotionClient;
pub use database_id::DatabaseId;
pub use errors::NotionError;
pub use schema::{RecordId, combined_body};

use async_trait::async_trait;

/// Destination for records derived from inbound payloads.
///
/// Implemented by [`NotionClient`]. The intake service only depends on this
/// trait so it can run against an in-memory sink in tests.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn create_record(
        &self,
        title: &str,
        summary: &str,
        content: &str,
    ) -> Result<RecordId, NotionError>;
}

#[async_trait]
impl RecordSink for NotionClient {
    async fn create_record(
        &self,
        title: &str,
        summary: &str,
        content: &str,
    ) -> Result<RecordId, NotionError> {
        NotionClient::create_record(self, title, summary, content).await
    }
}
