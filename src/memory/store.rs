// src/memory/store.rs — SQLite operations

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

/// Fixed-width UTC timestamp so text ordering matches time ordering.
fn now_ts() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Low-level SQLite operations for users, messages and itineraries.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    // -- Users --

    /// Insert a new account. Returns false when the email is already taken.
    pub fn insert_user(
        &self,
        uid: &str,
        email: &str,
        password_hash: &str,
        salt: &str,
    ) -> anyhow::Result<bool> {
        let changed = self.conn.execute(
            "INSERT INTO users (uid, email, password_hash, salt, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(email) DO NOTHING",
            params![uid, email, password_hash, salt, now_ts()],
        )?;
        Ok(changed == 1)
    }

    pub fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT uid, email, password_hash, salt FROM users WHERE email = ?1",
                params![email],
                |row| {
                    Ok(UserRow {
                        uid: row.get(0)?,
                        email: row.get(1)?,
                        password_hash: row.get(2)?,
                        salt: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    // -- Chat messages --

    pub fn insert_message(
        &self,
        id: &str,
        uid: &str,
        role: &str,
        content: &str,
    ) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT INTO chat_messages (id, uid, role, content, ts)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, uid, role, content, now_ts()],
        )?;
        Ok(())
    }

    /// The newest `limit` messages of a user, oldest first.
    pub fn recent_messages(&self, uid: &str, limit: u32) -> anyhow::Result<Vec<MessageRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT role, content FROM chat_messages
             WHERE uid = ?1
             ORDER BY ts DESC, rowid DESC LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![uid, limit], |row| {
            Ok(MessageRow {
                role: row.get(0)?,
                content: row.get(1)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        result.reverse();
        Ok(result)
    }

    // -- Itineraries --

    pub fn insert_itinerary(
        &self,
        id: &str,
        uid: &str,
        content: &str,
        metadata_json: &str,
    ) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT INTO itineraries (id, uid, content, metadata, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, uid, content, metadata_json, now_ts()],
        )?;
        Ok(())
    }

    /// The newest `limit` itineraries of a user, newest first.
    pub fn recent_itineraries(
        &self,
        uid: &str,
        limit: u32,
    ) -> anyhow::Result<Vec<ItineraryRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, content, metadata, created_at FROM itineraries
             WHERE uid = ?1
             ORDER BY created_at DESC, rowid DESC LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![uid, limit], |row| {
            Ok(ItineraryRow {
                id: row.get(0)?,
                content: row.get(1)?,
                metadata: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

#[derive(Debug, Clone)]
pub struct UserRow {
    pub uid: String,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
}

#[derive(Debug, Clone)]
pub struct MessageRow {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct ItineraryRow {
    pub id: String,
    pub content: String,
    /// JSON-encoded `ItineraryMetadata`.
    pub metadata: String,
    pub created_at: String,
}
