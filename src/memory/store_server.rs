// src/memory/store_server.rs — Async message passing for Store

use crate::memory::store::{ItineraryRow, MessageRow, Store, UserRow};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug)]
pub enum StoreCommand {
    InsertUser {
        uid: String,
        email: String,
        password_hash: String,
        salt: String,
        resp: oneshot::Sender<anyhow::Result<bool>>,
    },
    FindUserByEmail {
        email: String,
        resp: oneshot::Sender<anyhow::Result<Option<UserRow>>>,
    },
    InsertMessage {
        id: String,
        uid: String,
        role: String,
        content: String,
        resp: oneshot::Sender<anyhow::Result<()>>,
    },
    RecentMessages {
        uid: String,
        limit: u32,
        resp: oneshot::Sender<anyhow::Result<Vec<MessageRow>>>,
    },
    InsertItinerary {
        id: String,
        uid: String,
        content: String,
        metadata_json: String,
        resp: oneshot::Sender<anyhow::Result<()>>,
    },
    RecentItineraries {
        uid: String,
        limit: u32,
        resp: oneshot::Sender<anyhow::Result<Vec<ItineraryRow>>>,
    },
}

/// A handle to the Store that uses message passing.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<StoreCommand>,
}

impl StoreHandle {
    pub fn new(tx: mpsc::Sender<StoreCommand>) -> Self {
        Self { tx }
    }

    pub async fn insert_user(
        &self,
        uid: String,
        email: String,
        password_hash: String,
        salt: String,
    ) -> anyhow::Result<bool> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::InsertUser {
                uid,
                email,
                password_hash,
                salt,
                resp: resp_tx,
            })
            .await?;
        resp_rx.await?
    }

    pub async fn find_user_by_email(&self, email: String) -> anyhow::Result<Option<UserRow>> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::FindUserByEmail {
                email,
                resp: resp_tx,
            })
            .await?;
        resp_rx.await?
    }

    pub async fn insert_message(
        &self,
        id: String,
        uid: String,
        role: String,
        content: String,
    ) -> anyhow::Result<()> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::InsertMessage {
                id,
                uid,
                role,
                content,
                resp: resp_tx,
            })
            .await?;
        resp_rx.await?
    }

    pub async fn recent_messages(&self, uid: String, limit: u32) -> anyhow::Result<Vec<MessageRow>> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::RecentMessages {
                uid,
                limit,
                resp: resp_tx,
            })
            .await?;
        resp_rx.await?
    }

    pub async fn insert_itinerary(
        &self,
        id: String,
        uid: String,
        content: String,
        metadata_json: String,
    ) -> anyhow::Result<()> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::InsertItinerary {
                id,
                uid,
                content,
                metadata_json,
                resp: resp_tx,
            })
            .await?;
        resp_rx.await?
    }

    pub async fn recent_itineraries(
        &self,
        uid: String,
        limit: u32,
    ) -> anyhow::Result<Vec<ItineraryRow>> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::RecentItineraries {
                uid,
                limit,
                resp: resp_tx,
            })
            .await?;
        resp_rx.await?
    }
}

/// Helper to spawn the store server and return a handle.
pub fn spawn_store_server(store: Store) -> (StoreHandle, tokio::task::JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(100);
    let handle = StoreHandle::new(tx);
    let join_handle = tokio::spawn(run_store_server(store, rx));
    (handle, join_handle)
}

/// The background task that owns the Store.
pub async fn run_store_server(store: Store, mut rx: mpsc::Receiver<StoreCommand>) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            StoreCommand::InsertUser {
                uid,
                email,
                password_hash,
                salt,
                resp,
            } => {
                let res = store.insert_user(&uid, &email, &password_hash, &salt);
                let _ = resp.send(res);
            }
            StoreCommand::FindUserByEmail { email, resp } => {
                let _ = resp.send(store.find_user_by_email(&email));
            }
            StoreCommand::InsertMessage {
                id,
                uid,
                role,
                content,
                resp,
            } => {
                let res = store.insert_message(&id, &uid, &role, &content);
                let _ = resp.send(res);
            }
            StoreCommand::RecentMessages { uid, limit, resp } => {
                let _ = resp.send(store.recent_messages(&uid, limit));
            }
            StoreCommand::InsertItinerary {
                id,
                uid,
                content,
                metadata_json,
                resp,
            } => {
                let res = store.insert_itinerary(&id, &uid, &content, &metadata_json);
                let _ = resp.send(res);
            }
            StoreCommand::RecentItineraries { uid, limit, resp } => {
                let _ = resp.send(store.recent_itineraries(&uid, limit));
            }
        }
    }
    tracing::debug!("store server stopped");
}
