// src/api/types.rs

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::core::session::{SessionPhase, SessionState, UiFlags};
use crate::infra::errors::{AuthError, TripmateError};

/// Response for session creation.
#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: String,
}

/// A session as seen by a client.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub phase: SessionPhase,
    #[serde(flatten)]
    pub state: SessionState,
}

impl SessionView {
    pub fn new(session_id: &str, state: &SessionState) -> Self {
        Self {
            session_id: session_id.to_string(),
            phase: state.phase(),
            state: state.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatPanelRequest {
    pub open: bool,
}

#[derive(Debug, Serialize)]
pub struct UiResponse {
    pub ui: UiFlags,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub fn not_found(session_id: &str) -> ApiError {
    api_error(
        StatusCode::NOT_FOUND,
        format!("Unknown session: {session_id}"),
    )
}

fn auth_status(e: &AuthError) -> StatusCode {
    match e {
        AuthError::InvalidEmail | AuthError::WeakPassword { .. } => StatusCode::BAD_REQUEST,
        AuthError::EmailTaken => StatusCode::CONFLICT,
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn status_for(e: &TripmateError) -> StatusCode {
    match e {
        TripmateError::Auth(a) => auth_status(a),
        TripmateError::NotSignedIn => StatusCode::UNAUTHORIZED,
        TripmateError::AlreadySignedIn => StatusCode::CONFLICT,
        TripmateError::InvalidTrip(_) => StatusCode::BAD_REQUEST,
        TripmateError::Provider { .. } | TripmateError::Timeout { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(e: &TripmateError) -> ApiError {
    api_error(status_for(e), e.to_string())
}
