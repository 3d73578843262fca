mod registry;

pub use registry::{all_commands, matching_commands, Command, CommandInvocation};

use crate::core::app::{App, AppAction};

pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
    Action(AppAction),
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    if let Some(command) = registry::find_command(command_name) {
        let invocation = CommandInvocation {
            input: trimmed,
            args,
        };
        (command.handler)(app, invocation)
    } else {
        CommandResult::ProcessAsMessage(input.to_string())
    }
}

pub(super) fn handle_help(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Action(AppAction::ShowHelp)
}

pub(super) fn handle_clear(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Action(AppAction::ClearConversation)
}

pub(super) fn handle_cache(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Action(AppAction::ToggleCachePanel)
}

pub(super) fn handle_refresh(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Action(AppAction::RefreshCache)
}

pub(super) fn handle_clear_cache(
    _app: &mut App,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    CommandResult::Action(AppAction::ClearCache)
}

pub(super) fn handle_retry(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Action(AppAction::RetryHealth)
}

pub(super) fn handle_resend(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Action(AppAction::ResendLast)
}

pub(super) fn handle_example(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return CommandResult::Action(AppAction::CycleExample);
    }
    match invocation.args.parse::<usize>() {
        Ok(number) => CommandResult::Action(AppAction::LoadExample { number }),
        Err(_) => {
            app.ui.set_status("Usage: /example <1-4>");
            CommandResult::Continue
        }
    }
}

pub(super) fn handle_typing(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let enabled = match invocation.args.to_ascii_lowercase().as_str() {
        "" => None,
        "on" => Some(true),
        "off" => Some(false),
        _ => {
            app.ui.set_status("Usage: /typing [on|off]");
            return CommandResult::Continue;
        }
    };
    CommandResult::Action(AppAction::SetTyping { enabled })
}

pub(super) fn handle_log(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let parts: Vec<&str> = invocation.input.split_whitespace().collect();

    let result = match parts.len() {
        1 => app.logging.toggle_logging(),
        2 => app.logging.set_log_file(parts[1].to_string()),
        _ => {
            app.ui.set_status("Usage: /log [filename]");
            return CommandResult::Continue;
        }
    };
    match result {
        Ok(message) => app.ui.set_status(message),
        Err(e) => app.ui.set_status(format!("Log error: {e}")),
    }
    CommandResult::Continue
}

pub(super) fn handle_quit(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Action(AppAction::Quit)
}

#[cfg(test)]
mod tests;
