// src/api/auth.rs

use crate::api::types::{api_error, ApiError};
use crate::api::ApiState;
use crate::auth::constant_time_eq;
use axum::http::{HeaderMap, StatusCode};

/// Verify the bearer token if one is configured.
pub fn check_auth(state: &ApiState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(ref expected) = state.token else {
        return Ok(());
    };

    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth_header.strip_prefix("Bearer ").unwrap_or("");

    if constant_time_eq(token.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(api_error(
            StatusCode::UNAUTHORIZED,
            "Invalid or missing bearer token",
        ))
    }
}
