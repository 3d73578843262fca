use super::{apply_action, App, AppAction, AppCommand};
use crate::commands::{process_input, CommandResult};

pub(super) fn handle_input_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::ProcessInput { input } => match process_input(app, &input) {
            CommandResult::Continue => None,
            CommandResult::ProcessAsMessage(message) => submit_message(app, message),
            CommandResult::Action(action) => apply_action(app, action),
        },
        AppAction::SubmitMessage { message } => submit_message(app, message),
        AppAction::ResendLast => resend_last(app),
        AppAction::ClearConversation => {
            app.session.reset();
            app.typing.finish_all();
            app.ui.scroll_to_bottom();
            app.ui.set_status("Conversation cleared");
            Some(AppCommand::CancelTyping)
        }
        AppAction::ToggleCachePanel => {
            if app.cache.toggle() {
                app.cache.begin_refresh();
                Some(AppCommand::RefreshCache)
            } else {
                None
            }
        }
        AppAction::RefreshCache => {
            app.cache.begin_refresh();
            Some(AppCommand::RefreshCache)
        }
        AppAction::ClearCache => {
            app.cache.begin_refresh();
            Some(AppCommand::ClearCache)
        }
        AppAction::RetryHealth => {
            app.connection.begin_check();
            Some(AppCommand::RetryHealth)
        }
        AppAction::CycleExample => {
            app.ui.cycle_example();
            None
        }
        AppAction::LoadExample { number } => {
            if !app.ui.load_example(number) {
                app.ui.set_status(format!(
                    "No example {number}; choose 1-{}",
                    crate::core::constants::EXAMPLE_QUERIES.len()
                ));
            }
            None
        }
        AppAction::SetTyping { enabled } => {
            let enabled = enabled.unwrap_or(!app.typing_enabled);
            app.typing_enabled = enabled;
            if enabled {
                app.ui.set_status("Typing animation: on");
                None
            } else {
                app.typing.finish_all();
                app.ui.set_status("Typing animation: off");
                Some(AppCommand::CancelTyping)
            }
        }
        AppAction::ShowHelp => {
            app.ui.show_help = true;
            None
        }
        AppAction::DismissOverlay => {
            if app.ui.show_help {
                app.ui.show_help = false;
            } else {
                app.session.dismiss_error();
            }
            None
        }
        AppAction::SetStatus { message } => {
            app.ui.set_status(message);
            None
        }
        AppAction::Quit => {
            app.ui.exit_requested = true;
            None
        }
        _ => unreachable!("non-input action routed to input handler"),
    }
}

fn submit_message(app: &mut App, message: String) -> Option<AppCommand> {
    if app.session.is_loading() {
        app.ui.set_status("Still waiting for the previous reply");
        return None;
    }
    let pending = app.session.submit(&message)?;
    if let Some(id) = app.last_message_id() {
        app.log_message(id);
    }
    app.ui.scroll_to_bottom();
    app.ui.pulse_start = std::time::Instant::now();
    Some(AppCommand::SpawnQuery(pending))
}

fn resend_last(app: &mut App) -> Option<AppCommand> {
    match app.session.last_user_query().map(str::to_string) {
        Some(query) => submit_message(app, query),
        None => {
            app.ui.set_status("Nothing to resend yet");
            None
        }
    }
}
