use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

/// Commands whose name starts with `prefix`, for completion hints.
pub fn matching_commands(prefix: &str) -> Vec<&'static Command> {
    let prefix = prefix.trim_start_matches('/').to_ascii_lowercase();
    all_commands()
        .iter()
        .filter(|command| command.name.starts_with(&prefix))
        .collect()
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show commands and key bindings.",
        handler: super::handle_help,
    },
    Command {
        name: "clear",
        usage: "/clear",
        help: "Start a new conversation.",
        handler: super::handle_clear,
    },
    Command {
        name: "cache",
        usage: "/cache",
        help: "Show or hide the cache sidebar.",
        handler: super::handle_cache,
    },
    Command {
        name: "refresh",
        usage: "/refresh",
        help: "Reload cache statistics.",
        handler: super::handle_refresh,
    },
    Command {
        name: "clear-cache",
        usage: "/clear-cache",
        help: "Empty the backend's answer cache.",
        handler: super::handle_clear_cache,
    },
    Command {
        name: "retry",
        usage: "/retry",
        help: "Check the backend connection now.",
        handler: super::handle_retry,
    },
    Command {
        name: "resend",
        usage: "/resend",
        help: "Send your last question again.",
        handler: super::handle_resend,
    },
    Command {
        name: "example",
        usage: "/example <1-4>",
        help: "Put an example question in the input box.",
        handler: super::handle_example,
    },
    Command {
        name: "typing",
        usage: "/typing [on|off]",
        help: "Toggle the typing animation for replies.",
        handler: super::handle_typing,
    },
    Command {
        name: "log",
        usage: "/log [filename]",
        help: "Toggle transcript logging or set the log file.",
        handler: super::handle_log,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Exit tubechat.",
        handler: super::handle_quit,
    },
];
