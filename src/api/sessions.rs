// src/api/sessions.rs — Registry of live HTTP sessions
//
// The outer lock only guards lookups. Each session has its own async lock,
// held for the whole of one action, so a session runs one action at a time
// while different sessions proceed independently. Sessions idle for longer
// than the TTL are dropped on the next create or lookup.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::core::session::SessionState;

pub type SessionSlot = Arc<tokio::sync::Mutex<SessionState>>;

struct Entry {
    slot: SessionSlot,
    last_used: Instant,
}

#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Lock the map and drop every expired session.
    fn map(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        let mut map = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = map.len();
        let ttl = self.ttl;
        map.retain(|_, entry| entry.last_used.elapsed() < ttl);
        let expired = before - map.len();
        if expired > 0 {
            tracing::debug!(expired, "idle sessions dropped");
        }
        map
    }

    /// Register a session and return its id.
    pub fn create(&self, state: SessionState) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.map().insert(
            id.clone(),
            Entry {
                slot: Arc::new(tokio::sync::Mutex::new(state)),
                last_used: Instant::now(),
            },
        );
        tracing::debug!(session = %id, "session created");
        id
    }

    /// Look up a live session and mark it as used.
    pub fn get(&self, id: &str) -> Option<SessionSlot> {
        let mut map = self.map();
        let entry = map.get_mut(id)?;
        entry.last_used = Instant::now();
        Some(entry.slot.clone())
    }

    pub fn remove(&self, id: &str) -> bool {
        let removed = self.map().remove(id).is_some();
        if removed {
            tracing::debug!(session = %id, "session removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ChatTurn;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_create_get_remove() {
        let reg = SessionRegistry::new(HOUR);
        let id = reg.create(SessionState::new(8, "hi"));
        assert_eq!(reg.len(), 1);
        assert!(reg.get(&id).is_some());
        assert!(reg.remove(&id));
        assert!(!reg.remove(&id));
        assert!(reg.get(&id).is_none());
        assert!(reg.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let reg = SessionRegistry::new(HOUR);
        let a = reg.create(SessionState::new(8, "hi"));
        let b = reg.create(SessionState::new(8, "hi"));
        assert_ne!(a, b);

        reg.get(&a)
            .unwrap()
            .lock()
            .await
            .history
            .append(ChatTurn::user("only in a"));

        assert_eq!(reg.get(&a).unwrap().lock().await.history.len(), 2);
        assert_eq!(reg.get(&b).unwrap().lock().await.history.len(), 1);
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let reg = SessionRegistry::new(Duration::from_millis(50));
        let id = reg.create(SessionState::new(8, "hi"));
        assert!(reg.get(&id).is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(reg.get(&id).is_none());
        assert!(reg.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_keeps_session_alive() {
        let reg = SessionRegistry::new(Duration::from_millis(200));
        let id = reg.create(SessionState::new(8, "hi"));

        for _ in 0..4 {
            tokio::time::sleep(Duration::from_millis(80)).await;
            assert!(reg.get(&id).is_some());
        }
    }
}
