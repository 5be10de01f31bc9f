use crate::config::{NotionConfig, SchemaConfig};
use crate::database_id::DatabaseId;
use crate::errors::NotionError;
use crate::metrics_defs::{CREATE_PAGE_DURATION, CREATE_PAGE_FAILURE, CREATE_PAGE_SUCCESS};
use crate::schema::{ApiErrorBody, CreatePageRequest, PageResponse, RecordId, combined_body};
use chrono::Local;
use reqwest::StatusCode;
use shared::redact::redact;
use shared::{counter, histogram};
use std::time::{Duration, Instant};
use url::Url;

pub const NOTION_VERSION: &str = "2022-06-28";
const NOTION_VERSION_HEADER: &str = "Notion-Version";

/// Authenticated client bound to a single database.
#[derive(Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    token: String,
    database_id: DatabaseId,
    schema: SchemaConfig,
    pages_url: Url,
    database_url: Url,
    // Suppresses response bodies in logs
    production: bool,
}

impl NotionClient {
    pub fn new(config: &NotionConfig, production: bool) -> Result<Self, NotionError> {
        let token = config.token.trim();
        if token.is_empty() {
            return Err(NotionError::MissingToken);
        }

        let database_id = DatabaseId::parse(&config.database_id)?;
        let pages_url = config.base_url.join("v1/pages")?;
        let database_url = config
            .base_url
            .join(&format!("v1/databases/{database_id}"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(NotionClient {
            client,
            token: token.to_string(),
            database_id,
            schema: config.schema.clone(),
            pages_url,
            database_url,
            production,
        })
    }

    pub fn database_id(&self) -> &DatabaseId {
        &self.database_id
    }

    /// Creates a page in the configured database and returns its id.
    pub async fn create_record(
        &self,
        title: &str,
        summary: &str,
        content: &str,
    ) -> Result<RecordId, NotionError> {
        let body = combined_body(summary, content);
        let request = CreatePageRequest::new(
            &self.database_id,
            &self.schema,
            title,
            &body,
            Local::now().fixed_offset(),
        );

        let start = Instant::now();
        let result = self.send_create(&request).await;
        histogram!(CREATE_PAGE_DURATION).record(start.elapsed().as_secs_f64());

        match &result {
            Ok(id) => {
                counter!(CREATE_PAGE_SUCCESS).increment(1);
                tracing::info!(page_id = %id, "Created Notion page");
            }
            Err(e) => {
                counter!(CREATE_PAGE_FAILURE, "reason" => failure_reason(e)).increment(1);
                tracing::error!(error = %e, "Failed to create Notion page");
            }
        }

        result
    }

    async fn send_create(&self, request: &CreatePageRequest) -> Result<RecordId, NotionError> {
        let response = self
            .client
            .post(self.pages_url.clone())
            .bearer_auth(&self.token)
            .header(NOTION_VERSION_HEADER, NOTION_VERSION)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::OK || status == StatusCode::CREATED {
            let page: PageResponse = serde_json::from_str(&text).map_err(|e| {
                tracing::warn!(
                    response = redact(self.production, &text),
                    "Unparseable page response"
                );
                NotionError::InvalidResponse(e.to_string())
            })?;
            return page.into_record_id();
        }

        tracing::warn!(
            status = status.as_u16(),
            response = redact(self.production, &text),
            "Notion rejected page creation"
        );

        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .unwrap_or_default()
            .message
            .unwrap_or_else(|| format!("API error: {}", status.as_u16()));

        Err(NotionError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Retrieves the configured database to check the token and id.
    ///
    /// Only meant for startup checks; the result is not cached.
    pub async fn test_connection(&self) -> bool {
        let result = self
            .client
            .get(self.database_url.clone())
            .bearer_auth(&self.token)
            .header(NOTION_VERSION_HEADER, NOTION_VERSION)
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status();
                let ok = status == StatusCode::OK || status == StatusCode::CREATED;
                let text = response.text().await.unwrap_or_default();
                tracing::info!(
                    status = status.as_u16(),
                    response = redact(self.production, &text),
                    database_id = %self.database_id,
                    "Notion connection test"
                );
                ok
            }
            Err(e) => {
                tracing::error!(error = %e, "Notion connection test failed");
                false
            }
        }
    }
}

fn failure_reason(error: &NotionError) -> &'static str {
    match error {
        NotionError::Api { .. } => "api",
        NotionError::InvalidResponse(_) => "invalid_response",
        NotionError::Transport(_) => "transport",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DATABASE_ID: &str = "1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d";

    fn test_config(base_url: &str) -> NotionConfig {
        NotionConfig {
            token: "test-token".into(),
            database_id: DATABASE_ID.into(),
            base_url: Url::parse(base_url).unwrap(),
            timeout_secs: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_requires_token() {
        let config = NotionConfig {
            database_id: DATABASE_ID.into(),
            ..Default::default()
        };
        assert!(matches!(
            NotionClient::new(&config, false),
            Err(NotionError::MissingToken)
        ));
    }

    #[test]
    fn test_new_rejects_bad_database_id() {
        let config = NotionConfig {
            token: "t".into(),
            database_id: "nope".into(),
            ..Default::default()
        };
        assert!(matches!(
            NotionClient::new(&config, false),
            Err(NotionError::InvalidDatabaseId(_))
        ));
    }

    #[tokio::test]
    async fn test_create_record_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .and(header("authorization", "Bearer test-token"))
            .and(header("notion-version", NOTION_VERSION))
            .and(body_partial_json(json!({
                "parent": {"database_id": "1a2b3c4d-5e6f-7a8b-9c0d-1e2f3a4b5c6d"},
                "properties": {"Name": {"title": [{"text": {"content": "T"}}]}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "page",
                "id": "page-123",
                "properties": {}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = NotionClient::new(&test_config(&mock_server.uri()), false).unwrap();
        let id = client.create_record("T", "S", "C").await.unwrap();
        assert_eq!(id.as_str(), "page-123");

        let requests = mock_server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        let text = body["properties"]["Text"]["rich_text"][0]["text"]["content"]
            .as_str()
            .unwrap();
        assert!(text.contains('S'));
        assert!(text.contains('C'));
        assert!(body["properties"]["Date"]["date"]["start"].is_string());
    }

    #[tokio::test]
    async fn test_create_record_accepts_201() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "object": "page",
                "id": "page-201",
                "properties": {"Name": {}}
            })))
            .mount(&mock_server)
            .await;

        let client = NotionClient::new(&test_config(&mock_server.uri()), true).unwrap();
        let id = client.create_record("T", "", "").await.unwrap();
        assert_eq!(id.to_string(), "page-201");
    }

    #[tokio::test]
    async fn test_create_record_surfaces_api_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "object": "error",
                "status": 400,
                "code": "validation_error",
                "message": "Name is not a property that exists."
            })))
            .mount(&mock_server)
            .await;

        let client = NotionClient::new(&test_config(&mock_server.uri()), false).unwrap();
        let err = client.create_record("T", "S", "C").await.unwrap_err();
        assert!(matches!(err, NotionError::Api { status: 400, .. }));
        assert_eq!(err.to_string(), "Name is not a property that exists.");
    }

    #[tokio::test]
    async fn test_create_record_generic_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = NotionClient::new(&test_config(&mock_server.uri()), false).unwrap();
        let err = client.create_record("T", "S", "C").await.unwrap_err();
        assert_eq!(err.to_string(), "API error: 500");
    }

    #[tokio::test]
    async fn test_create_record_rejects_non_page_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/pages"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "x", "object": "page"})),
            )
            .mount(&mock_server)
            .await;

        let client = NotionClient::new(&test_config(&mock_server.uri()), false).unwrap();
        let err = client.create_record("T", "S", "C").await.unwrap_err();
        assert!(matches!(err, NotionError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_create_record_transport_error() {
        // Nothing listens on port 9 of localhost
        let client = NotionClient::new(&test_config("http://127.0.0.1:9/"), false).unwrap();
        let err = client.create_record("T", "S", "C").await.unwrap_err();
        assert!(matches!(err, NotionError::Transport(_)));
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_connection_checks_database() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/databases/1a2b3c4d-5e6f-7a8b-9c0d-1e2f3a4b5c6d"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"object": "database"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = NotionClient::new(&test_config(&mock_server.uri()), false).unwrap();
        assert!(client.test_connection().await);
    }

    #[tokio::test]
    async fn test_connection_reports_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = NotionClient::new(&test_config(&mock_server.uri()), false).unwrap();
        assert!(!client.test_connection().await);

        let unreachable = NotionClient::new(&test_config("http://127.0.0.1:9/"), false).unwrap();
        assert!(!unreachable.test_connection().await);
    }
}
