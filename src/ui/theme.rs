use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_prefix_style: Style,
    pub assistant_text_style: Style,
    pub processing_style: Style,
    pub typing_cursor_style: Style,

    // Markdown
    pub heading_style: Style,
    pub code_style: Style,
    pub link_style: Style,

    // Chrome
    pub title_style: Style,
    pub subtitle_style: Style,
    pub connected_style: Style,
    pub checking_style: Style,
    pub disconnected_style: Style,
    pub error_banner_style: Style,
    pub status_style: Style,
    pub sidebar_border_style: Style,
    pub sidebar_heading_style: Style,
    pub welcome_style: Style,

    // Input area
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
    pub input_cursor_style: Style,
    pub placeholder_style: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark_default()
    }
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_prefix_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::White),
            processing_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            typing_cursor_style: Style::default().fg(Color::Gray),

            heading_style: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            code_style: Style::default().fg(Color::LightGreen),
            link_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),

            title_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            subtitle_style: Style::default().fg(Color::DarkGray),
            connected_style: Style::default().fg(Color::Green),
            checking_style: Style::default().fg(Color::Yellow),
            disconnected_style: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            error_banner_style: Style::default().fg(Color::White).bg(Color::Red),
            status_style: Style::default().fg(Color::Gray),
            sidebar_border_style: Style::default().fg(Color::DarkGray),
            sidebar_heading_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
            welcome_style: Style::default().fg(Color::Gray),

            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            placeholder_style: Style::default().fg(Color::DarkGray),
        }
    }
}
