use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use notion::NotionError;
use serde::Serialize;
use thiserror::Error;

/// Errors that end the handling of an intake request.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("unsupported content type, expected application/json")]
    UnsupportedMediaType,

    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("request body must be a JSON object")]
    NotAnObject,

    /// Well-formed JSON whose known fields have the wrong type.
    #[error("invalid payload field: {0}")]
    InvalidField(serde_json::Error),

    #[error("verification_token must be a non-empty string")]
    EmptyVerificationToken,

    /// Not a failure as such; an identical payload was already handled.
    #[error("duplicate request ignored")]
    Duplicate,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("missing signature")]
    MissingSignature,

    #[error("failed to save to Notion: {0}")]
    Downstream(#[from] NotionError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntakeError {
    /// Caller mistakes that are only worth logging outside production.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            IntakeError::UnsupportedMediaType
                | IntakeError::InvalidJson(_)
                | IntakeError::NotAnObject
                | IntakeError::InvalidField(_)
                | IntakeError::EmptyVerificationToken
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            IntakeError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            IntakeError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            IntakeError::NotAnObject => StatusCode::BAD_REQUEST,
            IntakeError::InvalidField(_) => StatusCode::BAD_REQUEST,
            IntakeError::EmptyVerificationToken => StatusCode::BAD_REQUEST,
            IntakeError::Duplicate => StatusCode::CONFLICT,
            IntakeError::InvalidSignature => StatusCode::UNAUTHORIZED,
            IntakeError::MissingSignature => StatusCode::UNAUTHORIZED,
            IntakeError::Downstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            IntakeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn outcome_label(&self) -> &'static str {
        match self {
            IntakeError::Duplicate => "duplicate",
            IntakeError::InvalidSignature | IntakeError::MissingSignature => "unauthorized",
            IntakeError::Downstream(_) => "downstream_error",
            IntakeError::Internal(_) => "internal_error",
            _ => "invalid",
        }
    }
}

#[derive(Serialize)]
struct ApiErrorResponse {
    status: &'static str,
    message: String,
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ApiErrorResponse {
            status: match self {
                IntakeError::Duplicate => "ignored",
                _ => "error",
            },
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
