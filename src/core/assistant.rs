// src/core/assistant.rs — User actions over a session
//
// Combines the controller with the authenticator and the store. Hosts (REPL,
// HTTP API) call these and keep the returned SessionState.

use std::sync::Arc;

use tracing::{info, warn};

use super::controller::{ConversationController, Rejected};
use super::itinerary::{ItinerarySummary, SavedItinerary, TripRequest};
use super::session::SessionState;
use crate::auth::Authenticator;
use crate::infra::config::{ChatConfig, Config};
use crate::infra::errors::{AuthError, TripmateError};
use crate::memory::PersistenceStore;
use crate::provider::ReplyGenerator;

pub struct Assistant {
    controller: ConversationController,
    auth: Arc<dyn Authenticator>,
    store: Arc<dyn PersistenceStore>,
    chat: ChatConfig,
    itinerary_limit: u32,
}

impl Assistant {
    pub fn new(
        generator: Arc<dyn ReplyGenerator>,
        auth: Arc<dyn Authenticator>,
        store: Arc<dyn PersistenceStore>,
        config: &Config,
    ) -> Self {
        Self {
            controller: ConversationController::new(
                generator,
                store.clone(),
                config.model.timeout(),
            ),
            auth,
            store,
            chat: config.chat.clone(),
            itinerary_limit: config.itineraries.history_limit,
        }
    }

    /// Logged-out session seeded with the configured greeting.
    pub fn new_session(&self) -> SessionState {
        SessionState::from_config(&self.chat)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.auth.sign_up(email, password).await
    }

    /// Authenticate and restore the user's recent conversation.
    ///
    /// Only a logged-out session can sign in; a signed-in one must sign out
    /// first so nothing of the previous user's chat or itinerary carries over.
    pub async fn sign_in(
        &self,
        mut state: SessionState,
        email: &str,
        password: &str,
    ) -> Result<SessionState, Rejected> {
        if state.is_logged_in() {
            return Err(Rejected::new(state, TripmateError::AlreadySignedIn));
        }
        let user = match self.auth.sign_in(email, password).await {
            Ok(user) => user,
            Err(e) => return Err(Rejected::new(state, e)),
        };

        let limit = u32::try_from(state.history.capacity()).unwrap_or(u32::MAX);
        let persisted = match self.store.load_recent_messages(&user.uid, limit).await {
            Ok(turns) => Some(turns),
            Err(e) => {
                warn!(uid = %user.uid, "could not load chat history: {e}");
                None
            }
        };

        info!(uid = %user.uid, "signed in");
        state.login(user, persisted);
        Ok(state)
    }

    pub fn sign_out(&self, mut state: SessionState) -> SessionState {
        if let Some(uid) = state.user_id() {
            info!(%uid, "signed out");
        }
        state.logout();
        state
    }

    /// Chat is only available to signed-in users.
    pub async fn send_message(
        &self,
        state: SessionState,
        text: &str,
    ) -> Result<SessionState, Rejected> {
        if !state.is_logged_in() {
            return Err(Rejected::new(state, TripmateError::NotSignedIn));
        }
        Ok(self.controller.handle_user_message(state, text).await)
    }

    pub async fn plan_trip(
        &self,
        state: SessionState,
        request: &TripRequest,
    ) -> Result<(SessionState, ItinerarySummary), Rejected> {
        if !state.is_logged_in() {
            return Err(Rejected::new(state, TripmateError::NotSignedIn));
        }
        self.controller.plan_trip(state, request).await
    }

    /// The user's most recent saved itineraries, newest first.
    pub async fn saved_itineraries(
        &self,
        state: &SessionState,
    ) -> Result<Vec<SavedItinerary>, TripmateError> {
        let uid = state.user_id().ok_or(TripmateError::NotSignedIn)?;
        self.store
            .load_recent_itineraries(uid, self.itinerary_limit)
            .await
    }
}
