use super::*;
use crate::utils::test_utils::create_test_app;
use tempfile::tempdir;

fn action_of(result: CommandResult) -> AppAction {
    match result {
        CommandResult::Action(action) => action,
        CommandResult::Continue => panic!("expected an action, got Continue"),
        CommandResult::ProcessAsMessage(text) => panic!("expected an action, got message {text}"),
    }
}

#[test]
fn plain_text_is_a_message() {
    let mut app = create_test_app();
    match process_input(&mut app, "Find popular AI videos") {
        CommandResult::ProcessAsMessage(text) => assert_eq!(text, "Find popular AI videos"),
        _ => panic!("expected message"),
    }
}

#[test]
fn unknown_command_is_sent_as_message() {
    let mut app = create_test_app();
    match process_input(&mut app, "/summarize now") {
        CommandResult::ProcessAsMessage(text) => assert_eq!(text, "/summarize now"),
        _ => panic!("expected message"),
    }
}

#[test]
fn simple_commands_map_to_actions() {
    let mut app = create_test_app();
    let cases = [
        ("/help", AppAction::ShowHelp),
        ("/clear", AppAction::ClearConversation),
        ("/cache", AppAction::ToggleCachePanel),
        ("/refresh", AppAction::RefreshCache),
        ("/clear-cache", AppAction::ClearCache),
        ("/retry", AppAction::RetryHealth),
        ("/resend", AppAction::ResendLast),
        ("/QUIT", AppAction::Quit),
    ];
    for (input, expected) in cases {
        assert_eq!(action_of(process_input(&mut app, input)), expected, "{input}");
    }
}

#[test]
fn example_command_parses_number() {
    let mut app = create_test_app();
    assert_eq!(
        action_of(process_input(&mut app, "/example 3")),
        AppAction::LoadExample { number: 3 }
    );
    assert_eq!(
        action_of(process_input(&mut app, "/example")),
        AppAction::CycleExample
    );
    assert!(matches!(
        process_input(&mut app, "/example three"),
        CommandResult::Continue
    ));
    assert_eq!(app.ui.status.as_deref(), Some("Usage: /example <1-4>"));
}

#[test]
fn typing_command_accepts_on_off_or_nothing() {
    let mut app = create_test_app();
    assert_eq!(
        action_of(process_input(&mut app, "/typing off")),
        AppAction::SetTyping {
            enabled: Some(false)
        }
    );
    assert_eq!(
        action_of(process_input(&mut app, "/typing")),
        AppAction::SetTyping { enabled: None }
    );
    assert!(matches!(
        process_input(&mut app, "/typing fast"),
        CommandResult::Continue
    ));
}

#[test]
fn log_command_enables_and_toggles() {
    let mut app = create_test_app();
    process_input(&mut app, "/log");
    assert!(app
        .ui
        .status
        .as_deref()
        .unwrap()
        .starts_with("Log error: No log file specified"));

    let dir = tempdir().unwrap();
    let path = dir.path().join("session.log");
    let input = format!("/log {}", path.display());
    assert!(matches!(
        process_input(&mut app, &input),
        CommandResult::Continue
    ));
    assert!(app.logging.is_active());
    assert!(app.ui.status.as_deref().unwrap().starts_with("Logging enabled to:"));

    process_input(&mut app, "/log");
    assert!(!app.logging.is_active());
}

#[test]
fn matching_commands_filters_by_prefix() {
    let names: Vec<&str> = matching_commands("/cl").iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["clear", "clear-cache"]);
    assert_eq!(matching_commands("").len(), all_commands().len());
}
