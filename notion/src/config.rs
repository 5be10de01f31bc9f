use serde::Deserialize;
use std::fmt;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Deserialize, PartialEq)]
pub struct NotionConfig {
    /// Integration token, sent as a bearer credential.
    #[serde(default)]
    pub token: String,
    /// Target database, compact or hyphenated.
    #[serde(default)]
    pub database_id: String,
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub schema: SchemaConfig,
}

impl NotionConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("timeout_secs must be greater than zero")]
    InvalidTimeout,
}

impl Default for NotionConfig {
    fn default() -> Self {
        NotionConfig {
            token: String::new(),
            database_id: String::new(),
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            schema: SchemaConfig::default(),
        }
    }
}

// Keep the token out of debug output.
impl fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionConfig")
            .field("token", &if self.token.is_empty() { "" } else { "***" })
            .field("database_id", &self.database_id)
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .field("schema", &self.schema)
            .finish()
    }
}

/// Property names of the target database.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SchemaConfig {
    pub title_property: String,
    pub body_property: String,
    pub date_property: String,
    pub status: Option<StatusConfig>,
    pub source_url: Option<SourceUrlConfig>,
    /// Also append the combined body as a paragraph block in the page content.
    pub append_body_block: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        SchemaConfig {
            title_property: "Name".into(),
            body_property: "Text".into(),
            date_property: "Date".into(),
            status: None,
            source_url: None,
            append_body_block: false,
        }
    }
}

/// A select property set to a fixed option on every created page.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StatusConfig {
    pub property: String,
    pub name: String,
}

/// A rich text property holding a fixed source URL.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SourceUrlConfig {
    pub property: String,
    pub url: String,
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base url is valid")
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config: NotionConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, NotionConfig::default());
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.schema.title_property, "Name");
    }

    #[test]
    fn test_parse_schema_overrides() {
        let yaml = r#"
token: secret-token
database_id: 1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d
timeout_secs: 5
schema:
    title_property: Title
    status:
        property: Status
        name: Done
    source_url:
        property: URL
        url: https://chat.openai.com
    append_body_block: true
"#;
        let config: NotionConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.schema.title_property, "Title");
        // Unset fields keep their defaults
        assert_eq!(config.schema.body_property, "Text");
        assert_eq!(
            config.schema.status,
            Some(StatusConfig {
                property: "Status".into(),
                name: "Done".into()
            })
        );
        assert!(config.schema.append_body_block);
    }

    #[test]
    fn test_debug_hides_token() {
        let config = NotionConfig {
            token: "secret-token".into(),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        assert!(NotionConfig::default().validate().is_ok());

        let config: NotionConfig = serde_yaml::from_str("timeout_secs: 0").unwrap();
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }
}
