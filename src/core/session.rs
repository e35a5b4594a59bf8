// src/core/session.rs — Per-session state
//
// A SessionState is a plain value: hosts keep one per logged-in browser / REPL
// and pass it through the controller. Nothing here is shared between sessions.

use serde::Serialize;

use super::history::BoundedHistory;
use super::itinerary::ItinerarySummary;
use super::types::{ChatTurn, UserRef};
use crate::infra::config::ChatConfig;

/// Presentation toggles. The controller never looks at these.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct UiFlags {
    pub chat_open: bool,
    pub show_login: bool,
    pub show_signup: bool,
}

impl Default for UiFlags {
    fn default() -> Self {
        Self {
            chat_open: false,
            show_login: true,
            show_signup: false,
        }
    }
}

impl UiFlags {
    pub fn show_signup_form(&mut self) {
        self.show_signup = true;
        self.show_login = false;
    }

    pub fn show_login_form(&mut self) {
        self.show_signup = false;
        self.show_login = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    LoggedOut,
    LoggedIn,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub current_user: Option<UserRef>,
    pub history: BoundedHistory,
    pub current_itinerary: Option<ItinerarySummary>,
    pub ui: UiFlags,
    #[serde(skip)]
    greeting: String,
}

impl SessionState {
    /// Fresh logged-out session with the greeting as its only turn.
    pub fn new(capacity: usize, greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        Self {
            current_user: None,
            history: BoundedHistory::seeded(capacity, ChatTurn::assistant(greeting.clone())),
            current_itinerary: None,
            ui: UiFlags::default(),
            greeting,
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(config.history_capacity, config.greeting.clone())
    }

    /// Attach the user and, when there is any, adopt their stored conversation.
    pub fn login(&mut self, user: UserRef, persisted_history: Option<Vec<ChatTurn>>) {
        self.current_user = Some(user);
        if let Some(turns) = persisted_history.filter(|t| !t.is_empty()) {
            self.history.replace(turns);
        }
        self.ui.show_login = false;
        self.ui.show_signup = false;
    }

    /// Drop the user, the itinerary and the conversation.
    pub fn logout(&mut self) {
        self.current_user = None;
        self.current_itinerary = None;
        self.history = BoundedHistory::seeded(
            self.history.capacity(),
            ChatTurn::assistant(self.greeting.clone()),
        );
        self.ui = UiFlags::default();
    }

    pub fn set_itinerary(&mut self, summary: ItinerarySummary) {
        self.current_itinerary = Some(summary);
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_logged_in() {
            SessionPhase::LoggedIn
        } else {
            SessionPhase::LoggedOut
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.current_user.as_ref().map(|u| u.uid.as_str())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::from_config(&ChatConfig::default())
    }
}
