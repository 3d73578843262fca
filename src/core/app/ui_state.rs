use crate::core::constants::EXAMPLE_QUERIES;
use crate::ui::theme::Theme;
use ratatui::prelude::Size;
use std::time::{Duration, Instant};
use tui_textarea::{CursorMove, TextArea};

/// How long a status line stays up before it fades.
pub const STATUS_TTL: Duration = Duration::from_secs(6);

#[derive(Debug, Clone)]
pub struct UiState {
    textarea: TextArea<'static>,
    pub theme: Theme,
    /// First transcript line shown; only meaningful while `auto_scroll` is off.
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub status: Option<String>,
    pub status_set_at: Option<Instant>,
    pub show_help: bool,
    pub exit_requested: bool,
    pub last_term_size: Size,
    /// Start of the "Thinking..." animation.
    pub pulse_start: Instant,
    example_index: Option<usize>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl UiState {
    pub fn new(theme: Theme) -> Self {
        let mut ui = Self {
            textarea: TextArea::default(),
            theme,
            scroll_offset: 0,
            auto_scroll: true,
            status: None,
            status_set_at: None,
            show_help: false,
            exit_requested: false,
            last_term_size: Size::default(),
            pulse_start: Instant::now(),
            example_index: None,
        };
        ui.configure_textarea();
        ui
    }

    pub(crate) fn configure_textarea(&mut self) {
        self.textarea.set_style(self.theme.input_text_style);
        self.textarea.set_cursor_style(self.theme.input_cursor_style);
        self.textarea
            .set_cursor_line_style(ratatui::style::Style::default());
        self.textarea
            .set_placeholder_text("Ask about a YouTube video...");
        self.textarea
            .set_placeholder_style(self.theme.placeholder_style);
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.textarea
    }

    pub fn get_input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn set_input_text(&mut self, text: &str) {
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        self.textarea = TextArea::from(lines);
        self.textarea.move_cursor(CursorMove::Bottom);
        self.textarea.move_cursor(CursorMove::End);
        self.configure_textarea();
    }

    pub fn clear_input(&mut self) {
        self.set_input_text("");
    }

    /// Returns the input text and empties the box.
    pub fn take_input(&mut self) -> String {
        let text = self.get_input_text();
        self.clear_input();
        text
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
        self.status_set_at = Some(Instant::now());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
        self.status_set_at = None;
    }

    /// Drops the status line once it has been visible for `STATUS_TTL`.
    /// Returns true when something changed.
    pub fn expire_status(&mut self, now: Instant) -> bool {
        match self.status_set_at {
            Some(set_at) if now.duration_since(set_at) >= STATUS_TTL => {
                self.clear_status();
                true
            }
            _ => false,
        }
    }

    /// Puts the next starter prompt in the input box, wrapping around.
    pub fn cycle_example(&mut self) -> &'static str {
        let next = match self.example_index {
            Some(idx) => (idx + 1) % EXAMPLE_QUERIES.len(),
            None => 0,
        };
        self.example_index = Some(next);
        let query = EXAMPLE_QUERIES[next];
        self.set_input_text(query);
        query
    }

    /// Loads starter prompt `n` (1-based). Returns false when out of range.
    pub fn load_example(&mut self, n: usize) -> bool {
        match n.checked_sub(1).and_then(|idx| EXAMPLE_QUERIES.get(idx)) {
            Some(query) => {
                self.example_index = Some(n - 1);
                self.set_input_text(query);
                true
            }
            None => false,
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Moves down; the renderer turns auto-scroll back on at the bottom.
    pub fn scroll_down(&mut self, lines: u16) {
        if self.auto_scroll {
            return;
        }
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    /// Page up by one transcript view (minus one line overlap).
    pub fn page_up(&mut self, available_height: u16) {
        self.scroll_up(available_height.saturating_sub(1).max(1));
    }

    pub fn page_down(&mut self, available_height: u16) {
        self.scroll_down(available_height.saturating_sub(1).max(1));
    }

    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
    }

    /// Resolves the offset to draw with for a transcript of `total` lines in
    /// a view `height` lines tall.
    pub fn effective_scroll(&mut self, total: u16, height: u16) -> u16 {
        let max_scroll = total.saturating_sub(height);
        if self.auto_scroll || self.scroll_offset >= max_scroll {
            self.auto_scroll = true;
            self.scroll_offset = max_scroll;
        }
        self.scroll_offset
    }
}
