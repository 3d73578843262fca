use crate::commands::{all_commands, matching_commands};
use crate::core::app::App;
use crate::core::connection::ConnectionStatus;
use crate::core::constants::EXAMPLE_QUERIES;
use crate::core::message::MessageRole;
use crate::core::typing::TYPING_CURSOR;
use crate::ui::markdown::render_markdown;
use crate::ui::theme::Theme;
use crate::ui::wrap::{wrap_line, wrap_lines};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 34;
const MAX_INPUT_LINES: u16 = 6;
const MAX_ERROR_LINES: usize = 3;

pub const KEY_HELP: &[(&str, &str)] = &[
    ("Enter", "Send the question"),
    ("Alt+Enter", "Insert a newline"),
    ("Ctrl+L", "Start a new conversation"),
    ("Ctrl+S", "Show or hide the cache sidebar"),
    ("Ctrl+R", "Check the backend connection now"),
    ("Ctrl+E", "Cycle through example questions"),
    ("Esc", "Dismiss the error banner or this help"),
    ("PgUp/PgDn, Up/Down", "Scroll the conversation"),
    ("F1", "Show this help"),
    ("Ctrl+C", "Quit"),
];

pub fn ui(f: &mut Frame, app: &mut App) {
    let area = f.area();
    app.ui.last_term_size = Size {
        width: area.width,
        height: area.height,
    };
    let width = f.area().width;

    let error_lines = app
        .session
        .last_error()
        .map(|err| error_banner_lines(err, &app.ui.theme, width as usize))
        .unwrap_or_default();
    let input_lines = (app.ui.textarea().lines().len() as u16).clamp(1, MAX_INPUT_LINES);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(error_lines.len() as u16),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(input_lines + 2),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    if !error_lines.is_empty() {
        f.render_widget(
            Paragraph::new(error_lines).style(app.ui.theme.error_banner_style),
            chunks[1],
        );
    }

    let (transcript_area, sidebar_area) = if app.cache.is_open() && chunks[2].width > SIDEBAR_WIDTH * 2
    {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(SIDEBAR_WIDTH)])
            .split(chunks[2]);
        (split[0], Some(split[1]))
    } else {
        (chunks[2], None)
    };

    render_transcript(f, app, transcript_area);
    if let Some(area) = sidebar_area {
        render_sidebar(f, app, area);
    }
    render_status(f, app, chunks[3]);
    render_input(f, app, chunks[4]);

    if app.ui.show_help {
        render_help(f, &app.ui.theme);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let title = Line::from(vec![
        Span::styled("YouTube Agent Chat", theme.title_style),
        Span::styled(
            format!(
                "  tubechat v{} • {} • Logging: {}",
                env!("CARGO_PKG_VERSION"),
                app.api_url,
                app.logging.get_status_string()
            ),
            theme.subtitle_style,
        ),
    ]);

    let status = app.connection.status();
    let banner_style = match status {
        ConnectionStatus::Checking => theme.checking_style,
        ConnectionStatus::Connected { .. } => theme.connected_style,
        ConnectionStatus::Disconnected { .. } => theme.disconnected_style,
    };
    let mut banner = vec![Span::styled(status.banner().to_string(), banner_style)];
    match status {
        ConnectionStatus::Connected { service } if !service.is_empty() => {
            banner.push(Span::styled(format!(" ({service})"), theme.subtitle_style));
        }
        _ => {}
    }
    if let Some(hint) = status.hint() {
        banner.push(Span::styled(format!(" • {hint}"), theme.subtitle_style));
    }

    f.render_widget(Paragraph::new(vec![title, Line::from(banner)]), area);
}

fn error_banner_lines(err: &str, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let line = Line::from(vec![
        Span::styled(format!("⚠ {err}"), theme.error_banner_style),
        Span::styled("  (Esc to dismiss)", theme.error_banner_style),
    ]);
    let mut lines = wrap_line(&line, width);
    lines.truncate(MAX_ERROR_LINES);
    lines
}

fn welcome_lines(theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled("Welcome to YouTube Agent Chat", theme.title_style)),
        Line::from(Span::styled(
            "Ask for video summaries, search YouTube, or pull video metadata.",
            theme.welcome_style,
        )),
        Line::default(),
        Line::from(Span::styled(
            "Try one of these (Ctrl+E or /example <n>):",
            theme.welcome_style,
        )),
    ];
    for (idx, query) in EXAMPLE_QUERIES.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("  {}. {query}", idx + 1),
            theme.welcome_style,
        )));
    }
    lines
}

fn thinking_symbol(app: &App) -> &'static str {
    const FRAMES: [&str; 4] = ["○", "◔", "◑", "◕"];
    let elapsed = app.ui.pulse_start.elapsed().as_millis() / 200;
    FRAMES[(elapsed % FRAMES.len() as u128) as usize]
}

/// Every transcript row for a view `width` columns wide, already wrapped.
pub fn build_transcript_lines(app: &App, width: u16) -> Vec<Line<'static>> {
    let theme = &app.ui.theme;
    let messages = app.session.messages();
    if messages.is_empty() && !app.session.is_loading() {
        return wrap_lines(&welcome_lines(theme), width as usize);
    }

    let mut lines: Vec<Line<'static>> = Vec::new();
    for message in messages {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        match message.role {
            MessageRole::User => {
                let mut content = message.content.lines();
                let first = content.next().unwrap_or_default();
                lines.push(Line::from(vec![
                    Span::styled("You: ", theme.user_prefix_style),
                    Span::styled(first.to_string(), theme.user_text_style),
                ]));
                for rest in content {
                    lines.push(Line::from(Span::styled(
                        format!("     {rest}"),
                        theme.user_text_style,
                    )));
                }
            }
            MessageRole::Assistant | MessageRole::Processing => {
                lines.push(Line::from(Span::styled("Agent:", theme.assistant_prefix_style)));
                let visible = app.typing.visible(message.id, &message.content);
                let mut body = render_markdown(visible, theme, theme.assistant_text_style);
                if app.typing.is_typing(message.id) {
                    let cursor = Span::styled(TYPING_CURSOR, theme.typing_cursor_style);
                    match body.last_mut() {
                        Some(last) => last.spans.push(cursor),
                        None => body.push(Line::from(cursor)),
                    }
                }
                lines.extend(body);
            }
        }
    }

    if app.session.is_loading() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            format!("{} Thinking...", thinking_symbol(app)),
            theme.processing_style,
        )));
    }

    wrap_lines(&lines, width as usize)
}

fn render_transcript(f: &mut Frame, app: &mut App, area: Rect) {
    let lines = build_transcript_lines(app, area.width);
    let total = lines.len().min(u16::MAX as usize) as u16;
    let scroll = app.ui.effective_scroll(total, area.height);
    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), area);
}

fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let mut lines = vec![Line::from(Span::styled("Cache", theme.sidebar_heading_style))];
    lines.extend(app.cache.lines().into_iter().map(Line::from));
    if let Some(message) = app.cache.last_message() {
        lines.push(Line::from(Span::styled(message.to_string(), theme.subtitle_style)));
    }
    lines.push(Line::from(Span::styled(
        "/refresh • /clear-cache",
        theme.subtitle_style,
    )));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Example questions",
        theme.sidebar_heading_style,
    )));
    for (idx, query) in EXAMPLE_QUERIES.iter().enumerate() {
        lines.push(Line::from(format!("{}. {query}", idx + 1)));
    }

    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(theme.sidebar_border_style);
    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

/// Commands matching a `/prefix` being typed, or `None` when the input is
/// not a bare command name.
fn command_hint(input: &str) -> Option<String> {
    if !input.starts_with('/') || input.contains(char::is_whitespace) {
        return None;
    }
    let names: Vec<String> = matching_commands(input)
        .iter()
        .map(|command| format!("/{}", command.name))
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join("  "))
    }
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let hint = command_hint(&app.ui.get_input_text());
    let text = match (&app.ui.status, hint) {
        (Some(status), _) => status.clone(),
        (None, Some(hint)) => hint,
        (None, None) if app.typing_enabled => "/help for commands • Ctrl+C to quit".to_string(),
        (None, None) => "/help for commands • typing animation off • Ctrl+C to quit".to_string(),
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(text, app.ui.theme.status_style))),
        area,
    );
}

fn render_input(f: &mut Frame, app: &mut App, area: Rect) {
    let title = if app.session.is_loading() {
        "Sending..."
    } else {
        "Ask a question (Enter to send, Alt+Enter for newline)"
    };
    let theme = app.ui.theme.clone();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style)
        .title(Span::styled(title, theme.input_title_style));
    app.ui.textarea_mut().set_block(block);
    f.render_widget(app.ui.textarea(), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn help_lines(theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled("Commands", theme.sidebar_heading_style))];
    for command in all_commands() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<18}", command.usage), theme.code_style),
            Span::raw(command.help),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Keys", theme.sidebar_heading_style)));
    for (key, help) in KEY_HELP {
        lines.push(Line::from(vec![
            Span::styled(format!("{key:<18}"), theme.code_style),
            Span::raw(*help),
        ]));
    }
    lines
}

fn render_help(f: &mut Frame, theme: &Theme) {
    let lines = help_lines(theme);
    let area = centered(f.area(), 72, lines.len() as u16 + 2);
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help (Esc to close) ")
                    .border_style(Style::default()),
            )
            .wrap(Wrap { trim: false }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::{apply_action, AppAction, AppCommand};
    use crate::utils::test_utils::create_test_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn text_of(lines: &[Line<'static>]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    fn screen_text(app: &mut App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn empty_transcript_shows_welcome_and_examples() {
        let app = create_test_app();
        let lines = text_of(&build_transcript_lines(&app, 120));
        assert_eq!(lines[0], "Welcome to YouTube Agent Chat");
        assert!(lines.iter().any(|l| l.contains(EXAMPLE_QUERIES[0])));
    }

    #[test]
    fn loading_shows_user_message_and_thinking_row() {
        let mut app = create_test_app();
        apply_action(
            &mut app,
            AppAction::SubmitMessage {
                message: "Find popular AI videos".into(),
            },
        );
        let lines = text_of(&build_transcript_lines(&app, 80));
        assert_eq!(lines[0], "You: Find popular AI videos");
        assert!(lines.last().unwrap().ends_with("Thinking..."));
    }

    #[test]
    fn typing_reply_shows_prefix_and_cursor() {
        let mut app = create_test_app();
        let seq = match apply_action(
            &mut app,
            AppAction::SubmitMessage {
                message: "hello".into(),
            },
        ) {
            Some(AppCommand::SpawnQuery(pending)) => pending.seq,
            other => panic!("unexpected {other:?}"),
        };
        apply_action(
            &mut app,
            AppAction::QueryCompleted {
                seq,
                result: Ok("Hello there".into()),
            },
        );
        let lines = text_of(&build_transcript_lines(&app, 80));
        assert_eq!(lines[2], "Agent:");
        assert_eq!(lines[3], TYPING_CURSOR);

        app.typing.finish_all();
        let lines = text_of(&build_transcript_lines(&app, 80));
        assert_eq!(lines[3], "Hello there");
    }

    #[test]
    fn screen_shows_banner_error_and_sending_title() {
        let mut app = create_test_app();
        let screen = screen_text(&mut app);
        assert!(screen.contains("Checking connection..."));
        assert!(screen.contains("Ask a question"));

        apply_action(
            &mut app,
            AppAction::SubmitMessage {
                message: "hello".into(),
            },
        );
        let screen = screen_text(&mut app);
        assert!(screen.contains("Sending..."));

        let seq = match app.session.state() {
            crate::core::session::SessionState::AwaitingResponse { seq } => seq,
            _ => unreachable!(),
        };
        apply_action(
            &mut app,
            AppAction::QueryCompleted {
                seq,
                result: Err(crate::api::ApiError::Timeout),
            },
        );
        let screen = screen_text(&mut app);
        assert!(screen.contains("Request timeout - the server"));
    }

    #[test]
    fn command_prefix_lists_matches() {
        assert_eq!(
            command_hint("/cl").as_deref(),
            Some("/clear  /clear-cache")
        );
        assert_eq!(command_hint("/log file.txt"), None);
        assert_eq!(command_hint("hello"), None);
        assert_eq!(command_hint("/zzz"), None);
    }

    #[test]
    fn sidebar_and_help_render() {
        let mut app = create_test_app();
        apply_action(&mut app, AppAction::ToggleCachePanel);
        let screen = screen_text(&mut app);
        assert!(screen.contains("Loading..."));
        assert!(screen.contains("Example questions"));

        apply_action(&mut app, AppAction::ShowHelp);
        let screen = screen_text(&mut app);
        assert!(screen.contains("Help (Esc to close)"));
        assert!(screen.contains("/clear-cache"));
    }
}
