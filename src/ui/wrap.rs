use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Splits `text` into alternating runs of whitespace and non-whitespace.
fn segments(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let is_space = first.is_whitespace();
        let end = rest
            .char_indices()
            .find(|(_, ch)| ch.is_whitespace() != is_space)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (segment, tail) = rest.split_at(end);
        rest = tail;
        Some(segment)
    })
}

struct LineBuilder {
    width: usize,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    current_width: usize,
}

impl LineBuilder {
    fn push(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        self.current_width += text.width();
        match self.current.last_mut() {
            Some(last) if last.style == style => last.content.to_mut().push_str(text),
            _ => self.current.push(Span::styled(text.to_string(), style)),
        }
    }

    fn break_line(&mut self) {
        // Trailing whitespace never shows, so drop it.
        if let Some(last) = self.current.last_mut() {
            let trimmed = last.content.trim_end().to_string();
            last.content = trimmed.into();
        }
        self.current.retain(|span| !span.content.is_empty());
        self.lines.push(Line::from(std::mem::take(&mut self.current)));
        self.current_width = 0;
    }

    fn push_word(&mut self, word: &str, style: Style) {
        let word_width = word.width();
        if self.current_width + word_width <= self.width {
            self.push(word, style);
            return;
        }
        if self.current_width > 0 && word_width <= self.width {
            self.break_line();
            self.push(word, style);
            return;
        }
        // Longer than a whole line: hard break by character.
        for ch in word.chars() {
            let cw = ch.width().unwrap_or(0);
            if self.current_width + cw > self.width && self.current_width > 0 {
                self.break_line();
            }
            self.push(ch.encode_utf8(&mut [0; 4]), style);
        }
    }

    fn push_space(&mut self, space: &str, style: Style) {
        if self.current_width == 0 {
            return;
        }
        let space_width = space.width();
        if self.current_width + space_width > self.width {
            self.break_line();
        } else {
            self.push(space, style);
        }
    }
}

/// Word-wraps one styled line to `width` columns, keeping span styles.
pub fn wrap_line(line: &Line<'static>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    if line.width() <= width {
        return vec![line.clone()];
    }

    let mut builder = LineBuilder {
        width,
        lines: Vec::new(),
        current: Vec::new(),
        current_width: 0,
    };
    let mut leading = true;
    for span in &line.spans {
        let style = line.style.patch(span.style);
        for segment in segments(&span.content) {
            let is_space = segment.starts_with(char::is_whitespace);
            if is_space && leading {
                // Indentation on the first row is kept as-is.
                builder.push(segment, style);
            } else if is_space {
                builder.push_space(segment, style);
            } else {
                leading = false;
                builder.push_word(segment, style);
            }
        }
    }
    if !builder.current.is_empty() || builder.lines.is_empty() {
        builder.break_line();
    }
    builder.lines
}

pub fn wrap_lines(lines: &[Line<'static>], width: usize) -> Vec<Line<'static>> {
    lines.iter().flat_map(|line| wrap_line(line, width)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn texts(lines: &[Line<'static>]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn short_lines_are_untouched() {
        let line = Line::from("hello world");
        assert_eq!(texts(&wrap_line(&line, 20)), vec!["hello world"]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let line = Line::from("the quick brown fox jumps");
        assert_eq!(
            texts(&wrap_line(&line, 10)),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn long_words_are_hard_broken() {
        let line = Line::from("https://www.youtube.com/watch?v=T-D1OfcDW1M");
        let wrapped = wrap_line(&line, 16);
        assert!(wrapped.iter().all(|l| l.width() <= 16));
        assert_eq!(
            texts(&wrapped).concat(),
            "https://www.youtube.com/watch?v=T-D1OfcDW1M"
        );
    }

    #[test]
    fn styles_survive_wrapping() {
        let bold = Style::default().fg(Color::Red);
        let line = Line::from(vec![
            Span::raw("plain words then "),
            Span::styled("red words here", bold),
        ]);
        let wrapped = wrap_line(&line, 12);
        let red: Vec<&Span> = wrapped
            .iter()
            .flat_map(|l| l.spans.iter())
            .filter(|s| s.style == bold)
            .collect();
        let red_text: String = red.iter().map(|s| s.content.as_ref()).collect::<Vec<_>>().join(" ");
        assert_eq!(red_text, "red words here");
    }

    #[test]
    fn empty_line_stays_one_row() {
        assert_eq!(wrap_line(&Line::default(), 10).len(), 1);
    }
}
