use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotionError {
    #[error("missing Notion token")]
    MissingToken,

    #[error("invalid database id: {0}")]
    InvalidDatabaseId(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Notion answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Notion answered with a success status but the body is not a page.
    #[error("invalid response from Notion: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}
