use serde::Deserialize;

pub const DEFAULT_TITLE: &str = "Untitled conversation";
pub const DEFAULT_MESSAGE: &str = "No message";
pub const URL_VERIFICATION: &str = "url_verification";

/// Fields of an inbound webhook or chat body. Anything else is ignored.
#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct InboundPayload {
    pub message: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub verification_token: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub challenge: Option<String>,
}

impl InboundPayload {
    /// The challenge to echo back, for URL verification requests.
    pub fn url_verification_challenge(&self) -> Option<&str> {
        match self.kind.as_deref() {
            Some(URL_VERIFICATION) => Some(self.challenge.as_deref().unwrap_or_default()),
            _ => None,
        }
    }

    /// Lower-cased message text, with a placeholder when there is none.
    pub fn normalized_message(&self) -> String {
        match self.message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_lowercase(),
            _ => DEFAULT_MESSAGE.to_lowercase(),
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or_default()
    }

    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}
