mod events;
mod input;

use tokio::sync::mpsc;

use super::App;
use crate::api::ApiError;
use crate::core::cache_panel::CacheEvent;
use crate::core::connection::HealthEvent;
use crate::core::message::MessageId;
use crate::core::session::PendingQuery;
use crate::core::typing::TypingFrame;

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    ProcessInput {
        input: String,
    },
    SubmitMessage {
        message: String,
    },
    ResendLast,
    ClearConversation,
    ToggleCachePanel,
    RefreshCache,
    ClearCache,
    RetryHealth,
    CycleExample,
    LoadExample {
        number: usize,
    },
    SetTyping {
        enabled: Option<bool>,
    },
    ShowHelp,
    DismissOverlay,
    SetStatus {
        message: String,
    },
    Quit,
    QueryCompleted {
        seq: u64,
        result: Result<String, ApiError>,
    },
    QuerySafetyTimeout {
        seq: u64,
    },
    TypingProgress {
        frame: TypingFrame,
    },
    HealthUpdate {
        event: HealthEvent,
    },
    CacheUpdate {
        event: CacheEvent,
    },
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        let _ = self.tx.send(action);
    }
}

/// Side effects the event loop runs on behalf of [`apply_actions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    SpawnQuery(PendingQuery),
    StartTyping {
        message_id: MessageId,
        generation: u64,
        text: String,
        speed: usize,
    },
    CancelTyping,
    RefreshCache,
    ClearCache,
    RetryHealth,
}

pub fn apply_actions(app: &mut App, actions: impl IntoIterator<Item = AppAction>) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        if let Some(cmd) = apply_action(app, action) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::QueryCompleted { .. }
        | AppAction::QuerySafetyTimeout { .. }
        | AppAction::TypingProgress { .. }
        | AppAction::HealthUpdate { .. }
        | AppAction::CacheUpdate { .. } => events::handle_background_event(app, action),

        AppAction::ProcessInput { .. }
        | AppAction::SubmitMessage { .. }
        | AppAction::ResendLast
        | AppAction::ClearConversation
        | AppAction::ToggleCachePanel
        | AppAction::RefreshCache
        | AppAction::ClearCache
        | AppAction::RetryHealth
        | AppAction::CycleExample
        | AppAction::LoadExample { .. }
        | AppAction::SetTyping { .. }
        | AppAction::ShowHelp
        | AppAction::DismissOverlay
        | AppAction::SetStatus { .. }
        | AppAction::Quit => input::handle_input_action(app, action),
    }
}
