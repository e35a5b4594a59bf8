// src/core/controller.rs — One chat turn / one itinerary request
//
// Both operations take the session by value and hand it back. Model failures
// become visible assistant text; storage failures are logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::itinerary::{ItinerarySummary, TripRequest};
use super::session::SessionState;
use super::types::ChatTurn;
use crate::infra::errors::TripmateError;
use crate::memory::PersistenceStore;
use crate::provider::ReplyGenerator;

/// Prefix of the assistant turn written when the model can't be reached.
pub const CHAT_FAILURE_PREFIX: &str = "❌ Connection error";

/// Prefix of the itinerary text written when generation fails.
pub const ITINERARY_FAILURE_PREFIX: &str = "❌ Error calling the model API";

/// A refused request. Carries the untouched session back to the caller.
#[derive(Debug)]
pub struct Rejected {
    pub state: SessionState,
    pub error: TripmateError,
}

impl Rejected {
    pub fn new(state: SessionState, error: impl Into<TripmateError>) -> Self {
        Self {
            state,
            error: error.into(),
        }
    }
}

pub struct ConversationController {
    generator: Arc<dyn ReplyGenerator>,
    store: Arc<dyn PersistenceStore>,
    timeout: Duration,
}

impl ConversationController {
    pub fn new(
        generator: Arc<dyn ReplyGenerator>,
        store: Arc<dyn PersistenceStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            store,
            timeout,
        }
    }

    /// Add the user's message, ask the model, add its answer.
    ///
    /// Blank input returns the state untouched. The model sees the whole
    /// (bounded) history including the new message.
    pub async fn handle_user_message(&self, mut state: SessionState, text: &str) -> SessionState {
        if text.trim().is_empty() {
            return state;
        }

        let user_turn = ChatTurn::user(text);
        state.history.append(user_turn.clone());
        self.persist_turn(&state, &user_turn).await;

        let reply = match self.generate(&state.history.to_list()).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(generator = self.generator.id(), "chat generation failed: {e}");
                format!("{CHAT_FAILURE_PREFIX}: {e}")
            }
        };

        let assistant_turn = ChatTurn::assistant(reply);
        state.history.append(assistant_turn.clone());
        self.persist_turn(&state, &assistant_turn).await;

        state
    }

    /// Generate an itinerary for `request` and make it the current one.
    ///
    /// Returns the session together with the new itinerary. Invalid requests
    /// are rejected before the model is called and leave the session as it was.
    pub async fn plan_trip(
        &self,
        mut state: SessionState,
        request: &TripRequest,
    ) -> Result<(SessionState, ItinerarySummary), Rejected> {
        if let Err(e) = request.validate() {
            return Err(Rejected::new(state, e));
        }
        let prompt = match request.render_prompt() {
            Ok(p) => p,
            Err(e) => return Err(Rejected::new(state, e)),
        };

        let content = match self.generate(&[ChatTurn::user(prompt)]).await {
            Ok(content) => content,
            Err(e) => {
                warn!(generator = self.generator.id(), "itinerary generation failed: {e}");
                format!("{ITINERARY_FAILURE_PREFIX}: {e}")
            }
        };

        let summary = ItinerarySummary {
            content,
            metadata: request.metadata(),
        };

        if let Some(uid) = state.user_id() {
            if let Err(e) = self.store.append_itinerary(uid, &summary).await {
                warn!(%uid, "failed to save itinerary: {e}");
            }
        }

        state.set_itinerary(summary.clone());
        Ok((state, summary))
    }

    async fn generate(&self, history: &[ChatTurn]) -> Result<String, TripmateError> {
        debug!(turns = history.len(), "requesting reply");
        match tokio::time::timeout(self.timeout, self.generator.complete(history)).await {
            Ok(result) => result,
            Err(_) => Err(TripmateError::Timeout {
                seconds: self.timeout.as_secs(),
            }),
        }
    }

    async fn persist_turn(&self, state: &SessionState, turn: &ChatTurn) {
        let Some(uid) = state.user_id() else {
            return;
        };
        if let Err(e) = self.store.append_message(uid, turn).await {
            warn!(%uid, role = %turn.role(), "failed to save chat message: {e}");
        }
    }
}
