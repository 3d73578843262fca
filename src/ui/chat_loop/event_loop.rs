//! Event polling, dispatching, and UI rendering loop.
//!
//! The loop owns the [`App`]. Terminal input, query results, typing frames,
//! health checks and cache calls all arrive on channels and are turned into
//! [`AppAction`]s; the [`AppCommand`]s those actions produce are handed to
//! the background services that own the matching tasks.

use std::{
    error::Error,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::keybindings::{resolve_key, KeyAction, ScrollMove};
use super::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::api::ApiClient;
use crate::core::app::{apply_actions, App, AppAction, AppActionDispatcher, AppCommand, AppInit};
use crate::core::backend::AgentBackend;
use crate::core::cache_panel::CacheService;
use crate::core::config::ResolvedSettings;
use crate::core::connection::HealthPoller;
use crate::core::constants::QUERY_TIMEOUT;
use crate::core::query_service::{QueryEvent, QueryService};
use crate::core::typing::TypingService;
use crate::ui::renderer::ui;

const MAX_FPS: u64 = 60;
/// Rows outside the transcript: header, status line and a one-line input box.
const CHROME_ROWS: u16 = 6;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

/// The background workers the loop hands commands to.
struct Services {
    query: QueryService,
    typing: TypingService,
    cache: CacheService,
    health: HealthPoller,
}

impl Services {
    fn run(&mut self, command: AppCommand) {
        match command {
            AppCommand::SpawnQuery(pending) => self.query.spawn(pending),
            AppCommand::StartTyping {
                message_id,
                generation,
                text,
                speed,
            } => self.typing.start(message_id, generation, text, speed),
            AppCommand::CancelTyping => self.typing.cancel_all(),
            AppCommand::RefreshCache => self.cache.refresh(),
            AppCommand::ClearCache => self.cache.clear(),
            AppCommand::RetryHealth => self.health.retry_now(),
        }
    }
}

fn query_action(event: QueryEvent) -> AppAction {
    match event {
        QueryEvent::Completed { seq, result } => AppAction::QueryCompleted { seq, result },
        QueryEvent::SafetyTimeout { seq } => AppAction::QuerySafetyTimeout { seq },
    }
}

pub(crate) fn sanitize_pasted_text(text: &str) -> String {
    let without_crlf = text.replace("\r\n", "\n");
    let without_cr = without_crlf.replace('\r', "\n");
    let expanded_tabs = without_cr.replace('\t', "    ");
    expanded_tabs
        .chars()
        .filter(|&c| c == '\n' || !c.is_control())
        .collect()
}

fn transcript_page(app: &App) -> u16 {
    app.ui
        .last_term_size
        .height
        .saturating_sub(CHROME_ROWS)
        .max(1)
}

/// Sends the input box contents unless a reply is still pending. Commands
/// still go through while waiting so `/clear` and friends keep working.
fn submit_input(app: &mut App, dispatcher: &AppActionDispatcher) {
    let text = app.ui.get_input_text();
    if text.trim().is_empty() {
        return;
    }
    if app.session.is_loading() && !text.trim_start().starts_with('/') {
        app.ui.set_status("Still waiting for the previous reply");
        return;
    }
    app.ui.clear_input();
    dispatcher.dispatch(AppAction::ProcessInput { input: text });
}

pub(crate) fn handle_key(app: &mut App, dispatcher: &AppActionDispatcher, key: KeyEvent) {
    match resolve_key(&key) {
        KeyAction::Submit => submit_input(app, dispatcher),
        KeyAction::InsertNewline => app.ui.textarea_mut().insert_newline(),
        KeyAction::Dispatch(action) => dispatcher.dispatch(action),
        KeyAction::Scroll(movement) => {
            let page = transcript_page(app);
            match movement {
                ScrollMove::LineUp => app.ui.scroll_up(1),
                ScrollMove::LineDown => app.ui.scroll_down(1),
                ScrollMove::PageUp => app.ui.page_up(page),
                ScrollMove::PageDown => app.ui.page_down(page),
            }
        }
        KeyAction::Edit => {
            app.ui.textarea_mut().input(key);
        }
    }
}

fn handle_ui_event(app: &mut App, dispatcher: &AppActionDispatcher, event: UiEvent) {
    match event {
        UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
            handle_key(app, dispatcher, key);
        }
        UiEvent::Crossterm(Event::Paste(text)) => {
            let sanitized = sanitize_pasted_text(&text);
            if !sanitized.is_empty() {
                app.ui.textarea_mut().insert_str(sanitized);
            }
        }
        UiEvent::Crossterm(_) => {}
    }
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

fn try_draw_frame(
    terminal: &mut ChatTerminal,
    app: &mut App,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> std::io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }
    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }
    terminal.draw(|f| ui(f, app))?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

/// Drains every channel once. Returns true when anything arrived.
#[allow(clippy::too_many_arguments)]
fn drain_channels(
    app: &mut App,
    dispatcher: &AppActionDispatcher,
    services: &mut Services,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
    query_rx: &mut mpsc::UnboundedReceiver<QueryEvent>,
    typing_rx: &mut mpsc::UnboundedReceiver<crate::core::typing::TypingFrame>,
    health_rx: &mut mpsc::UnboundedReceiver<crate::core::connection::HealthEvent>,
    cache_rx: &mut mpsc::UnboundedReceiver<crate::core::cache_panel::CacheEvent>,
) -> bool {
    let mut received_any = false;

    while let Ok(event) = event_rx.try_recv() {
        received_any = true;
        handle_ui_event(app, dispatcher, event);
    }
    while let Ok(event) = query_rx.try_recv() {
        received_any = true;
        dispatcher.dispatch(query_action(event));
    }
    while let Ok(frame) = typing_rx.try_recv() {
        received_any = true;
        dispatcher.dispatch(AppAction::TypingProgress { frame });
    }
    while let Ok(event) = health_rx.try_recv() {
        received_any = true;
        dispatcher.dispatch(AppAction::HealthUpdate { event });
    }
    while let Ok(event) = cache_rx.try_recv() {
        received_any = true;
        dispatcher.dispatch(AppAction::CacheUpdate { event });
    }

    let mut pending = Vec::new();
    while let Ok(action) = action_rx.try_recv() {
        pending.push(action);
    }
    if !pending.is_empty() {
        received_any = true;
        for command in apply_actions(app, pending) {
            debug!(?command, "running command");
            services.run(command);
        }
    }

    received_any
}

pub async fn run_chat(
    settings: ResolvedSettings,
    log: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let mut app = App::new(AppInit {
        api_url: settings.api_url.clone(),
        use_cache: settings.use_cache,
        typing_enabled: settings.typing,
        typing_speed: settings.typing_speed,
        log_file: log,
    })?;

    let client = ApiClient::new(&settings.api_url)
        .with_timeouts(QUERY_TIMEOUT, settings.request_timeout);
    let backend: Arc<dyn AgentBackend> = Arc::new(client);
    info!(api_url = %settings.api_url, source = %settings.api_url_source, "starting chat");

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let dispatcher = AppActionDispatcher::new(action_tx);

    let (query, mut query_rx) = QueryService::new(Arc::clone(&backend));
    let (typing, mut typing_rx) = TypingService::new();
    let (cache, mut cache_rx) = CacheService::new(Arc::clone(&backend));
    let (health, mut health_rx) = HealthPoller::spawn(Arc::clone(&backend), settings.health_interval);
    let mut services = Services {
        query,
        typing,
        cache,
        health,
    };

    let mut terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;

    let result = loop {
        if app.ui.exit_requested {
            break Ok(());
        }

        if let Err(err) = try_draw_frame(
            &mut terminal,
            &mut app,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        ) {
            break Err(err.into());
        }

        let received_any = drain_channels(
            &mut app,
            &dispatcher,
            &mut services,
            &mut event_rx,
            &mut action_rx,
            &mut query_rx,
            &mut typing_rx,
            &mut health_rx,
            &mut cache_rx,
        );
        if received_any {
            request_redraw = true;
        }

        if app.ui.expire_status(Instant::now()) {
            request_redraw = true;
        }

        // The thinking indicator animates on its own.
        if app.session.is_loading() {
            request_redraw = true;
        }

        if !received_any && !request_redraw {
            tokio::time::sleep(Duration::from_millis(16)).await;
        } else if !received_any {
            tokio::time::sleep(frame_duration).await;
        }
    };

    event_reader_handle.abort();
    services.typing.cancel_all();
    restore_terminal(&mut terminal)?;
    info!("chat session ended");

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::create_test_app;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};

    fn dispatcher() -> (AppActionDispatcher, mpsc::UnboundedReceiver<AppAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (AppActionDispatcher::new(tx), rx)
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn type_text(app: &mut App, dispatcher: &AppActionDispatcher, text: &str) {
        for ch in text.chars() {
            handle_key(app, dispatcher, press(KeyCode::Char(ch), KeyModifiers::NONE));
        }
    }

    #[test]
    fn paste_normalizes_line_endings_and_tabs() {
        assert_eq!(sanitize_pasted_text("a\r\nb\rc\td\x07"), "a\nb\nc    d");
    }

    #[test]
    fn enter_dispatches_input_and_clears_box() {
        let mut app = create_test_app();
        let (dispatcher, mut rx) = dispatcher();
        type_text(&mut app, &dispatcher, "hi");
        handle_key(&mut app, &dispatcher, press(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(
            rx.try_recv().ok(),
            Some(AppAction::ProcessInput { input: "hi".into() })
        );
        assert_eq!(app.ui.get_input_text(), "");
    }

    #[test]
    fn alt_enter_builds_multiline_input() {
        let mut app = create_test_app();
        let (dispatcher, mut rx) = dispatcher();
        type_text(&mut app, &dispatcher, "a");
        handle_key(&mut app, &dispatcher, press(KeyCode::Enter, KeyModifiers::ALT));
        type_text(&mut app, &dispatcher, "b");

        assert_eq!(app.ui.get_input_text(), "a\nb");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn enter_while_loading_keeps_text() {
        let mut app = create_test_app();
        let (dispatcher, mut rx) = dispatcher();
        app.session.submit("first");
        type_text(&mut app, &dispatcher, "second");
        handle_key(&mut app, &dispatcher, press(KeyCode::Enter, KeyModifiers::NONE));

        assert!(rx.try_recv().is_err());
        assert_eq!(app.ui.get_input_text(), "second");
        assert!(app.ui.status.is_some());
    }

    #[test]
    fn blank_input_is_not_sent() {
        let mut app = create_test_app();
        let (dispatcher, mut rx) = dispatcher();
        type_text(&mut app, &dispatcher, "   ");
        handle_key(&mut app, &dispatcher, press(KeyCode::Enter, KeyModifiers::NONE));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn query_events_become_actions() {
        assert_eq!(
            query_action(QueryEvent::SafetyTimeout { seq: 3 }),
            AppAction::QuerySafetyTimeout { seq: 3 }
        );
        assert_eq!(
            query_action(QueryEvent::Completed {
                seq: 4,
                result: Ok("ok".into()),
            }),
            AppAction::QueryCompleted {
                seq: 4,
                result: Ok("ok".into()),
            }
        );
    }
}
