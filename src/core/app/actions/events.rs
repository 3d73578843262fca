use super::{App, AppAction, AppCommand};
use crate::core::cache_panel::CacheEvent;
use crate::core::message::MessageId;

pub(super) fn handle_background_event(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::QueryCompleted { seq, result } => {
            let id = app.session.complete(seq, result)?;
            reply_appended(app, id)
        }
        AppAction::QuerySafetyTimeout { seq } => {
            let id = app.session.safety_timeout(seq)?;
            app.ui
                .set_status("No reply after 2 minutes; you can send another question");
            reply_appended(app, id)
        }
        AppAction::TypingProgress { frame } => {
            app.typing.apply(frame);
            None
        }
        AppAction::HealthUpdate { event } => {
            app.connection.apply(event);
            None
        }
        AppAction::CacheUpdate { event } => {
            match event {
                CacheEvent::Stats(result) => app.cache.finish_refresh(result),
                CacheEvent::Cleared(result) => {
                    if let Ok(message) = &result {
                        app.ui.set_status(message.clone());
                    }
                    app.cache.record_clear(result);
                }
            }
            None
        }
        _ => unreachable!("non-background action routed to event handler"),
    }
}

fn reply_appended(app: &mut App, id: MessageId) -> Option<AppCommand> {
    app.log_message(id);
    app.ui.scroll_to_bottom();

    if !app.typing_enabled {
        return None;
    }
    let text = app
        .session
        .messages()
        .iter()
        .find(|msg| msg.id == id)
        .map(|msg| msg.content.clone())?;
    let generation = app.typing.begin(id);
    Some(AppCommand::StartTyping {
        message_id: id,
        generation,
        text,
        speed: app.typing_speed,
    })
}
