//! Application state for the interactive client.
//!
//! [`App`] aggregates the conversation, the typing board, connection and
//! cache-panel state, and the UI state. It is only mutated through
//! [`apply_actions`], which returns the side effects ([`AppCommand`]s) the
//! event loop must run.

use std::error::Error;

use crate::core::cache_panel::CachePanel;
use crate::core::connection::ConnectionMonitor;
use crate::core::message::MessageId;
use crate::core::session::ChatSession;
use crate::core::typing::TypingBoard;
use crate::utils::logging::LoggingState;

pub mod actions;
pub mod ui_state;

pub use actions::{apply_action, apply_actions, AppAction, AppActionDispatcher, AppCommand};
pub use ui_state::UiState;

/// Settings the interactive session starts with.
#[derive(Debug, Clone)]
pub struct AppInit {
    pub api_url: String,
    pub use_cache: bool,
    pub typing_enabled: bool,
    pub typing_speed: usize,
    pub log_file: Option<String>,
}

pub struct App {
    pub session: ChatSession,
    pub typing: TypingBoard,
    pub connection: ConnectionMonitor,
    pub cache: CachePanel,
    pub ui: UiState,
    pub logging: LoggingState,
    pub api_url: String,
    pub typing_enabled: bool,
    pub typing_speed: usize,
}

impl App {
    pub fn new(init: AppInit) -> Result<Self, Box<dyn Error>> {
        let AppInit {
            api_url,
            use_cache,
            typing_enabled,
            typing_speed,
            log_file,
        } = init;

        Ok(Self {
            session: ChatSession::new(use_cache),
            typing: TypingBoard::default(),
            connection: ConnectionMonitor::default(),
            cache: CachePanel::default(),
            ui: UiState::default(),
            logging: LoggingState::new(log_file)?,
            api_url,
            typing_enabled,
            typing_speed: typing_speed.max(1),
        })
    }

    /// Appends message `id` to the transcript log, if logging is on.
    pub(crate) fn log_message(&mut self, id: MessageId) {
        let Some(message) = self.session.messages().iter().find(|msg| msg.id == id) else {
            return;
        };
        if let Err(err) = self.logging.log_message(message) {
            self.ui.set_status(format!("Log error: {err}"));
        }
    }

    /// Id of the newest message, if any.
    pub(crate) fn last_message_id(&self) -> Option<MessageId> {
        self.session.messages().last().map(|msg| msg.id)
    }

    /// Whether something on screen changes without user input.
    pub fn is_animating(&self) -> bool {
        self.session.is_loading() || self.typing.is_any_typing()
    }
}
