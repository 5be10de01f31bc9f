//! Wire types for the Notion pages API.

use crate::config::SchemaConfig;
use crate::database_id::DatabaseId;
use crate::errors::NotionError;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Notion rejects text objects longer than this many characters.
pub const MAX_TEXT_CHARS: usize = 2000;
/// Notion rejects rich text arrays with more items than this.
pub const MAX_RICH_TEXT_ITEMS: usize = 100;

/// Identifier of a page created in Notion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Joins summary and content into the text stored on the page.
pub fn combined_body(summary: &str, content: &str) -> String {
    format!("Summary:\n{summary}\n\nContent:\n{content}")
}

#[derive(Serialize, Debug)]
pub(crate) struct CreatePageRequest {
    parent: Parent,
    properties: BTreeMap<String, PropertyValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Block>,
}

#[derive(Serialize, Debug)]
struct Parent {
    database_id: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "snake_case")]
enum PropertyValue {
    Title(Vec<RichText>),
    RichText(Vec<RichText>),
    Date(DateValue),
    Select(SelectValue),
}

#[derive(Serialize, Debug)]
struct RichText {
    text: TextContent,
}

#[derive(Serialize, Debug)]
struct TextContent {
    content: String,
}

#[derive(Serialize, Debug)]
struct DateValue {
    start: String,
}

#[derive(Serialize, Debug)]
struct SelectValue {
    name: String,
}

#[derive(Serialize, Debug)]
struct Block {
    object: &'static str,
    r#type: &'static str,
    paragraph: Paragraph,
}

#[derive(Serialize, Debug)]
struct Paragraph {
    rich_text: Vec<RichText>,
}

impl CreatePageRequest {
    pub(crate) fn new(
        database_id: &DatabaseId,
        schema: &SchemaConfig,
        title: &str,
        body: &str,
        created_at: DateTime<FixedOffset>,
    ) -> Self {
        let mut properties = BTreeMap::new();

        properties.insert(
            schema.title_property.clone(),
            PropertyValue::Title(rich_text(title)),
        );
        properties.insert(
            schema.body_property.clone(),
            PropertyValue::RichText(rich_text(body)),
        );
        properties.insert(
            schema.date_property.clone(),
            PropertyValue::Date(DateValue {
                start: created_at.to_rfc3339_opts(SecondsFormat::Secs, false),
            }),
        );

        if let Some(status) = &schema.status {
            properties.insert(
                status.property.clone(),
                PropertyValue::Select(SelectValue {
                    name: status.name.clone(),
                }),
            );
        }

        if let Some(source) = &schema.source_url {
            properties.insert(
                source.property.clone(),
                PropertyValue::RichText(rich_text(&source.url)),
            );
        }

        let children = if schema.append_body_block {
            vec![Block {
                object: "block",
                r#type: "paragraph",
                paragraph: Paragraph {
                    rich_text: rich_text(body),
                },
            }]
        } else {
            Vec::new()
        };

        CreatePageRequest {
            parent: Parent {
                database_id: database_id.to_string(),
            },
            properties,
            children,
        }
    }
}

/// Splits text into as many text objects as the length limit requires.
///
/// Text beyond `MAX_RICH_TEXT_ITEMS * MAX_TEXT_CHARS` characters is dropped.
fn rich_text(text: &str) -> Vec<RichText> {
    if text.is_empty() {
        return vec![RichText {
            text: TextContent {
                content: String::new(),
            },
        }];
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.len() > MAX_RICH_TEXT_ITEMS * MAX_TEXT_CHARS {
        tracing::warn!(
            chars = chars.len(),
            kept = MAX_RICH_TEXT_ITEMS * MAX_TEXT_CHARS,
            "Truncating text to fit Notion's rich text limit"
        );
    }
    chars
        .chunks(MAX_TEXT_CHARS)
        .take(MAX_RICH_TEXT_ITEMS)
        .map(|chunk| RichText {
            text: TextContent {
                content: chunk.iter().collect(),
            },
        })
        .collect()
}

/// The fields of a page object the relay checks for.
#[derive(Deserialize, Debug)]
pub(crate) struct PageResponse {
    id: Option<String>,
    object: Option<String>,
    properties: Option<serde_json::Map<String, serde_json::Value>>,
}

impl PageResponse {
    pub(crate) fn into_record_id(self) -> Result<RecordId, NotionError> {
        match (self.id, self.object, self.properties) {
            (Some(id), Some(_), Some(_)) => Ok(RecordId(id)),
            (None, _, _) => Err(NotionError::InvalidResponse("missing id".into())),
            (_, None, _) => Err(NotionError::InvalidResponse("missing object".into())),
            (_, _, None) => Err(NotionError::InvalidResponse("missing properties".into())),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct ApiErrorBody {
    pub(crate) message: Option<String>,
}
