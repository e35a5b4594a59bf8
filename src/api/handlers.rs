// src/api/handlers.rs

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::api::sessions::SessionSlot;
use crate::api::{auth, types::*, ApiState};
use crate::core::itinerary::{ItinerarySummary, SavedItinerary, TripRequest};
use crate::infra::errors::TripmateError;

fn session(state: &ApiState, id: &str) -> Result<SessionSlot, ApiError> {
    state.sessions.get(id).ok_or_else(|| not_found(id))
}

/// GET /api/v1/health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /api/v1/sessions — Start a logged-out session.
pub async fn create_session(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<SessionCreated>), ApiError> {
    auth::check_auth(&state, &headers)?;
    let session_id = state.sessions.create(state.assistant.new_session());
    Ok((StatusCode::CREATED, Json(SessionCreated { session_id })))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    auth::check_auth(&state, &headers)?;
    let slot = session(&state, &id)?;
    let guard = slot.lock().await;
    Ok(Json(SessionView::new(&id, &guard)))
}

/// DELETE /api/v1/sessions/{id}
pub async fn delete_session(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    auth::check_auth(&state, &headers)?;
    if state.sessions.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&id))
    }
}

/// POST /api/v1/signup — Create an account. Does not sign in.
pub async fn sign_up(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<Credentials>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    auth::check_auth(&state, &headers)?;
    state
        .assistant
        .sign_up(&body.email, &body.password)
        .await
        .map_err(|e| error_response(&TripmateError::from(e)))?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Account created. Please sign in.".into(),
        }),
    ))
}

/// POST /api/v1/sessions/{id}/login
pub async fn login(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Credentials>,
) -> Result<Json<SessionView>, ApiError> {
    auth::check_auth(&state, &headers)?;
    let slot = session(&state, &id)?;
    let mut guard = slot.lock().await;
    match state
        .assistant
        .sign_in(guard.clone(), &body.email, &body.password)
        .await
    {
        Ok(next) => {
            *guard = next;
            Ok(Json(SessionView::new(&id, &guard)))
        }
        Err(rejected) => {
            *guard = rejected.state;
            Err(error_response(&rejected.error))
        }
    }
}

/// POST /api/v1/sessions/{id}/logout
pub async fn logout(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    auth::check_auth(&state, &headers)?;
    let slot = session(&state, &id)?;
    let mut guard = slot.lock().await;
    *guard = state.assistant.sign_out(guard.clone());
    Ok(Json(SessionView::new(&id, &guard)))
}

/// POST /api/v1/sessions/{id}/messages — One chat turn.
pub async fn send_message(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<MessageRequest>,
) -> Result<Json<SessionView>, ApiError> {
    auth::check_auth(&state, &headers)?;
    let slot = session(&state, &id)?;
    let mut guard = slot.lock().await;
    match state.assistant.send_message(guard.clone(), &body.text).await {
        Ok(next) => {
            *guard = next;
            Ok(Json(SessionView::new(&id, &guard)))
        }
        Err(rejected) => {
            *guard = rejected.state;
            Err(error_response(&rejected.error))
        }
    }
}

/// POST /api/v1/sessions/{id}/itinerary — Generate and store an itinerary.
pub async fn plan_trip(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<TripRequest>,
) -> Result<Json<ItinerarySummary>, ApiError> {
    auth::check_auth(&state, &headers)?;
    let slot = session(&state, &id)?;
    let mut guard = slot.lock().await;
    match state.assistant.plan_trip(guard.clone(), &body).await {
        Ok((next, itinerary)) => {
            *guard = next;
            Ok(Json(itinerary))
        }
        Err(rejected) => {
            *guard = rejected.state;
            Err(error_response(&rejected.error))
        }
    }
}

/// GET /api/v1/sessions/{id}/itineraries — Saved itineraries, newest first.
pub async fn list_itineraries(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vec<SavedItinerary>>, ApiError> {
    auth::check_auth(&state, &headers)?;
    let slot = session(&state, &id)?;
    let guard = slot.lock().await;
    state
        .assistant
        .saved_itineraries(&guard)
        .await
        .map(Json)
        .map_err(|e| error_response(&e))
}

/// POST /api/v1/sessions/{id}/chat-panel — Open or close the chat panel.
pub async fn set_chat_panel(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ChatPanelRequest>,
) -> Result<Json<UiResponse>, ApiError> {
    auth::check_auth(&state, &headers)?;
    let slot = session(&state, &id)?;
    let mut guard = slot.lock().await;
    guard.ui.chat_open = body.open;
    Ok(Json(UiResponse { ui: guard.ui }))
}
