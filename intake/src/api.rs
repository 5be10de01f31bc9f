use crate::config::Listener as ListenerConfig;
use crate::errors::IntakeError;
use crate::metrics_defs::{HANDSHAKES, REQUEST_DURATION, REQUESTS, SIGNATURE_REJECTED};
use crate::payload::InboundPayload;
use crate::signature::SIGNATURE_HEADER;
use crate::state::AppState;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use notion::{RecordId, RecordSink};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::redact::redact;
use shared::{counter, histogram};
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::task::JoinError;

#[derive(thiserror::Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/test", get(status_check))
        .route("/webhook", post(intake))
        .route("/webhook/", post(intake))
        .route("/chat", post(intake))
        .route("/chat/", post(intake))
        .with_state(state)
}

/// Serves the intake endpoints until ctrl-c.
pub async fn serve(listener: &ListenerConfig, state: AppState) -> Result<(), ServeError> {
    let addr = format!("{}:{}", listener.host, listener.port);
    let tcp_listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Intake listening");

    axum::serve(tcp_listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[derive(Serialize, Debug)]
struct ApiResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_id: Option<RecordId>,
}

#[derive(Serialize, Debug)]
struct ChallengeResponse {
    r#type: &'static str,
    challenge: String,
}

/// Successful results of an intake request.
#[derive(Debug)]
enum Outcome {
    Saved(RecordId),
    Ignored,
    Handshake,
    Challenge(String),
}

impl Outcome {
    fn label(&self) -> &'static str {
        match self {
            Outcome::Saved(_) => "saved",
            Outcome::Ignored => "ignored",
            Outcome::Handshake => "handshake",
            Outcome::Challenge(_) => "challenge",
        }
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Saved(page_id) => Json(ApiResponse {
                status: "success",
                message: Some("Saved to Notion"),
                page_id: Some(page_id),
            })
            .into_response(),
            Outcome::Ignored => Json(ApiResponse {
                status: "ignored",
                message: Some("No save trigger found"),
                page_id: None,
            })
            .into_response(),
            Outcome::Handshake => Json(ApiResponse {
                status: "success",
                message: None,
                page_id: None,
            })
            .into_response(),
            Outcome::Challenge(challenge) => Json(ChallengeResponse {
                r#type: crate::payload::URL_VERIFICATION,
                challenge,
            })
            .into_response(),
        }
    }
}

async fn index() -> Json<ApiResponse> {
    Json(ApiResponse {
        status: "running",
        message: Some("Server is running"),
        page_id: None,
    })
}

async fn status_check() -> Json<ApiResponse> {
    Json(ApiResponse {
        status: "ok",
        message: None,
        page_id: None,
    })
}

/// Webhook and chat intake.
///
/// Processing runs on its own task so that a panic anywhere below turns into
/// a 500 response instead of a dropped connection.
async fn intake(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Outcome, IntakeError> {
    let start = Instant::now();
    let production = state.production();

    let task_state = state.clone();
    let result =
        match tokio::spawn(async move { process(&task_state, &headers, &body).await }).await {
            Ok(result) => result,
            Err(join_error) => Err(IntakeError::Internal(panic_message(join_error))),
        };

    histogram!(REQUEST_DURATION).record(start.elapsed().as_secs_f64());

    match &result {
        Ok(outcome) => {
            counter!(REQUESTS, "outcome" => outcome.label()).increment(1);
            tracing::debug!(outcome = outcome.label(), "Handled intake request");
        }
        Err(e) => {
            counter!(REQUESTS, "outcome" => e.outcome_label()).increment(1);
            if e.is_validation() {
                if !production {
                    tracing::info!(error = %e, "Rejected invalid intake request");
                }
            } else if matches!(e, IntakeError::Duplicate) {
                tracing::debug!("Duplicate intake request ignored");
            } else {
                tracing::error!(error = %e, "Intake request failed");
            }
        }
    }

    result
}

async fn process(
    state: &AppState,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<Outcome, IntakeError> {
    if !is_json_content_type(headers) {
        return Err(IntakeError::UnsupportedMediaType);
    }

    let value: Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(IntakeError::NotAnObject);
    }
    let payload = InboundPayload::deserialize(&value).map_err(IntakeError::InvalidField)?;

    if let Some(challenge) = payload.url_verification_challenge() {
        tracing::info!("Answering URL verification challenge");
        return Ok(Outcome::Challenge(challenge.to_string()));
    }

    if let Some(token) = payload.verification_token.as_deref() {
        return handshake(state, token);
    }

    if state.dedup().is_duplicate(&value) {
        return Err(IntakeError::Duplicate);
    }

    check_signature(state, headers, body)?;

    let message = payload.normalized_message();
    if !state.classifier().should_save(&message) {
        return Ok(Outcome::Ignored);
    }

    let page_id = state
        .sink()
        .create_record(payload.title(), payload.summary(), payload.content())
        .await?;

    Ok(Outcome::Saved(page_id))
}

fn handshake(state: &AppState, token: &str) -> Result<Outcome, IntakeError> {
    if token.is_empty() {
        return Err(IntakeError::EmptyVerificationToken);
    }

    counter!(HANDSHAKES).increment(1);
    if state.secret().register(token) {
        tracing::info!(
            verification_token = redact(state.production(), token),
            "Registered webhook signing secret"
        );
    } else {
        tracing::warn!("Signing secret already registered, ignoring new verification token");
    }

    Ok(Outcome::Handshake)
}

fn check_signature(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<(), IntakeError> {
    let secret = state.secret();
    if !secret.is_set() {
        return Ok(());
    }

    match headers.get(SIGNATURE_HEADER) {
        Some(value) => {
            // A header that is not visible ASCII cannot match.
            let signature = value.to_str().unwrap_or_default();
            if secret.verify(body, signature) {
                Ok(())
            } else {
                counter!(SIGNATURE_REJECTED, "reason" => "invalid").increment(1);
                tracing::warn!("Invalid webhook signature");
                Err(IntakeError::InvalidSignature)
            }
        }
        None if state.require_signature() => {
            counter!(SIGNATURE_REJECTED, "reason" => "missing").increment(1);
            tracing::warn!("Missing webhook signature");
            Err(IntakeError::MissingSignature)
        }
        None => Ok(()),
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

fn panic_message(join_error: JoinError) -> String {
    match join_error.try_into_panic() {
        Ok(panic) => panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "request processing panicked".to_string()),
        Err(join_error) => join_error.to_string(),
    }
}
