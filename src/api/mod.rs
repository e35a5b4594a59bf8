// src/api/mod.rs — HTTP API for browser and external clients

pub mod auth;
pub mod handlers;
pub mod sessions;
pub mod types;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

use crate::core::assistant::Assistant;
pub use sessions::SessionRegistry;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub assistant: Arc<Assistant>,
    pub sessions: SessionRegistry,
    pub token: Option<String>,
}

impl ApiState {
    pub fn new(assistant: Arc<Assistant>, token: Option<String>, session_ttl: Duration) -> Self {
        Self {
            assistant,
            sessions: SessionRegistry::new(session_ttl),
            token,
        }
    }
}

/// Build the axum router with all API routes.
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:5173"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://127.0.0.1:5173"),
        ])
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/signup", post(handlers::sign_up))
        .route("/api/v1/sessions", post(handlers::create_session))
        .route(
            "/api/v1/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/api/v1/sessions/{id}/login", post(handlers::login))
        .route("/api/v1/sessions/{id}/logout", post(handlers::logout))
        .route("/api/v1/sessions/{id}/messages", post(handlers::send_message))
        .route("/api/v1/sessions/{id}/itinerary", post(handlers::plan_trip))
        .route(
            "/api/v1/sessions/{id}/itineraries",
            get(handlers::list_itineraries),
        )
        .route(
            "/api/v1/sessions/{id}/chat-panel",
            post(handlers::set_chat_panel),
        )
        .layer(cors)
        .with_state(state)
}

/// Start the API server on the given port (blocking).
pub async fn start_server(port: u16, state: ApiState) -> anyhow::Result<()> {
    let addr = format!("127.0.0.1:{port}");

    let router = build_router(state);

    tracing::info!("API server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
