//! Markdown to styled terminal lines for assistant replies.
//!
//! Replies mix headings, bold labels, numbered lists and links. Block layout
//! is resolved here; wrapping to the terminal width happens later in
//! [`crate::ui::wrap`].

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::ui::theme::Theme;

#[derive(Debug, Clone, Copy)]
enum ListKind {
    Unordered,
    Ordered(u64),
}

struct MarkdownRenderer<'t> {
    theme: &'t Theme,
    base_style: Style,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    list_stack: Vec<ListKind>,
    link_targets: Vec<String>,
    in_code_block: bool,
    /// Whether the next block needs a blank line above it.
    block_gap: bool,
}

impl<'t> MarkdownRenderer<'t> {
    fn new(theme: &'t Theme, base_style: Style) -> Self {
        Self {
            theme,
            base_style,
            lines: Vec::new(),
            current: Vec::new(),
            style_stack: vec![base_style],
            list_stack: Vec::new(),
            link_targets: Vec::new(),
            in_code_block: false,
            block_gap: false,
        }
    }

    fn style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or(self.base_style)
    }

    fn push_style(&mut self, style: Style) {
        let patched = self.style().patch(style);
        self.style_stack.push(patched);
    }

    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn push_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.current.push(Span::styled(text.to_string(), self.style()));
        }
    }

    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            self.lines
                .push(Line::from(std::mem::take(&mut self.current)));
        }
    }

    fn start_block(&mut self) {
        self.flush_line();
        if self.block_gap && self.list_stack.is_empty() && !self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.block_gap = false;
    }

    fn end_block(&mut self) {
        self.flush_line();
        self.block_gap = true;
    }

    fn list_indent(&self) -> String {
        "  ".repeat(self.list_stack.len().saturating_sub(1))
    }

    fn start_item(&mut self) {
        self.flush_line();
        let indent = self.list_indent();
        let marker = match self.list_stack.last_mut() {
            Some(ListKind::Ordered(next)) => {
                let marker = format!("{next}. ");
                *next += 1;
                marker
            }
            Some(ListKind::Unordered) | None => "• ".to_string(),
        };
        self.current.push(Span::styled(
            format!("{indent}{marker}"),
            self.base_style.add_modifier(Modifier::BOLD),
        ));
    }

    fn heading_style(&self, level: HeadingLevel) -> Style {
        match level {
            HeadingLevel::H1 | HeadingLevel::H2 => self.theme.heading_style,
            _ => self.theme.heading_style.remove_modifier(Modifier::UNDERLINED),
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => match tag {
                Tag::Paragraph => {
                    if self.current.is_empty() {
                        self.start_block();
                    }
                }
                Tag::Heading { level, .. } => {
                    self.start_block();
                    let style = self.heading_style(level);
                    self.push_style(style);
                }
                Tag::BlockQuote(_) => {
                    self.start_block();
                    self.push_style(Style::default().add_modifier(Modifier::ITALIC));
                }
                Tag::List(start) => {
                    if self.list_stack.is_empty() {
                        self.start_block();
                    } else {
                        self.flush_line();
                    }
                    self.list_stack.push(match start {
                        Some(n) => ListKind::Ordered(n),
                        None => ListKind::Unordered,
                    });
                }
                Tag::Item => self.start_item(),
                Tag::CodeBlock(kind) => {
                    self.start_block();
                    self.in_code_block = true;
                    if let CodeBlockKind::Fenced(lang) = kind {
                        if !lang.is_empty() {
                            self.lines.push(Line::from(Span::styled(
                                format!("[{lang}]"),
                                self.theme.subtitle_style,
                            )));
                        }
                    }
                }
                Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
                Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
                Tag::Strikethrough => {
                    self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
                }
                Tag::Link { dest_url, .. } => {
                    self.link_targets.push(dest_url.to_string());
                    self.push_style(self.theme.link_style);
                }
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Paragraph => {
                    if self.list_stack.is_empty() {
                        self.end_block();
                    } else {
                        self.flush_line();
                    }
                }
                TagEnd::Heading(_) => {
                    self.pop_style();
                    self.end_block();
                }
                TagEnd::BlockQuote(_) => {
                    self.pop_style();
                    self.end_block();
                }
                TagEnd::List(_) => {
                    self.list_stack.pop();
                    if self.list_stack.is_empty() {
                        self.end_block();
                    }
                }
                TagEnd::Item => self.flush_line(),
                TagEnd::CodeBlock => {
                    self.in_code_block = false;
                    self.end_block();
                }
                TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
                TagEnd::Link => {
                    self.pop_style();
                    if let Some(url) = self.link_targets.pop() {
                        let shown: String = self
                            .current
                            .iter()
                            .rev()
                            .take(1)
                            .map(|span| span.content.to_string())
                            .collect();
                        if shown != url {
                            self.push_text(&format!(" ({url})"));
                        }
                    }
                }
                _ => {}
            },
            Event::Text(text) => {
                if self.in_code_block {
                    for line in text.lines() {
                        self.lines.push(Line::from(Span::styled(
                            format!("  {line}"),
                            self.theme.code_style,
                        )));
                    }
                } else {
                    self.push_text(&text);
                }
            }
            Event::Code(code) => {
                let style = self.style().patch(self.theme.code_style);
                self.current
                    .push(Span::styled(code.to_string(), style));
            }
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.start_block();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(24),
                    self.theme.subtitle_style,
                )));
                self.block_gap = true;
            }
            Event::Html(html) | Event::InlineHtml(html) => self.push_text(&html),
            Event::TaskListMarker(checked) => {
                self.push_text(if checked { "[x] " } else { "[ ] " });
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        self.lines
    }
}

/// Renders markdown `content` into unwrapped lines styled on top of
/// `base_style`.
pub fn render_markdown(content: &str, theme: &Theme, base_style: Style) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut renderer = MarkdownRenderer::new(theme, base_style);
    for event in Parser::new_ext(content, options) {
        renderer.handle(event);
    }
    renderer.finish()
}
