// src/memory/mod.rs — Persistence of chats and itineraries

pub mod schema;
pub mod store;
pub mod store_server;

pub use store_server::{spawn_store_server, StoreHandle};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;

use crate::core::itinerary::{ItineraryMetadata, ItinerarySummary, SavedItinerary};
use crate::core::types::{ChatTurn, Role};
use crate::infra::errors::TripmateError;

/// Where chat turns and itineraries are kept between sessions.
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    async fn append_message(&self, user_id: &str, turn: &ChatTurn) -> Result<(), TripmateError>;

    async fn append_itinerary(
        &self,
        user_id: &str,
        summary: &ItinerarySummary,
    ) -> Result<(), TripmateError>;

    /// The newest `limit` turns, in conversation order (oldest first).
    async fn load_recent_messages(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<ChatTurn>, TripmateError>;

    /// The newest `limit` itineraries, newest first.
    async fn load_recent_itineraries(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<SavedItinerary>, TripmateError>;
}

/// Open (or create) the database at the given path and run migrations.
pub fn open_store(path: &Path) -> anyhow::Result<store::Store> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    schema::run_migrations(&conn)?;
    Ok(store::Store::new(conn))
}

/// In-memory database with the schema applied (for testing).
pub fn in_memory_store() -> anyhow::Result<store::Store> {
    let conn = Connection::open_in_memory()?;
    schema::run_migrations(&conn)?;
    Ok(store::Store::new(conn))
}

fn parse_ts(ts: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(ts)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}

#[async_trait]
impl PersistenceStore for StoreHandle {
    async fn append_message(&self, user_id: &str, turn: &ChatTurn) -> Result<(), TripmateError> {
        self.insert_message(
            uuid::Uuid::new_v4().to_string(),
            user_id.to_string(),
            turn.role().as_str().to_string(),
            turn.content().to_string(),
        )
        .await?;
        Ok(())
    }

    async fn append_itinerary(
        &self,
        user_id: &str,
        summary: &ItinerarySummary,
    ) -> Result<(), TripmateError> {
        let metadata_json =
            serde_json::to_string(&summary.metadata).map_err(anyhow::Error::from)?;
        self.insert_itinerary(
            uuid::Uuid::new_v4().to_string(),
            user_id.to_string(),
            summary.content.clone(),
            metadata_json,
        )
        .await?;
        Ok(())
    }

    async fn load_recent_messages(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<ChatTurn>, TripmateError> {
        let rows = self.recent_messages(user_id.to_string(), limit).await?;
        Ok(rows
            .into_iter()
            .map(|r| ChatTurn::new(Role::parse_lenient(&r.role), r.content))
            .collect())
    }

    async fn load_recent_itineraries(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<SavedItinerary>, TripmateError> {
        let rows = self.recent_itineraries(user_id.to_string(), limit).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_str::<ItineraryMetadata>(&row.metadata) {
                Ok(metadata) => out.push(SavedItinerary {
                    summary: ItinerarySummary {
                        content: row.content,
                        metadata,
                    },
                    created_at: parse_ts(&row.created_at),
                }),
                Err(e) => tracing::warn!(id = %row.id, "skipping itinerary with bad metadata: {e}"),
            }
        }
        Ok(out)
    }
}
