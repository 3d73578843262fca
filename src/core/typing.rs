//! Simulated typing for assistant replies.
//!
//! [`TypingAnimator`] is the pure part: it reveals a text a few characters at
//! a time and says how long to wait before the next step. [`TypingService`]
//! runs one cancellable timer chain per message and reports
//! [`TypingFrame`]s over a channel; [`TypingBoard`] is the copy of the
//! progress the renderer reads, and it drops frames from superseded chains.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::message::MessageId;

/// Delay before the first character appears.
pub const START_DELAY: Duration = Duration::from_millis(50);

const WHITESPACE_DELAY: Duration = Duration::from_millis(20);
const SENTENCE_END_DELAY: Duration = Duration::from_millis(100);
const BASE_DELAY: Duration = Duration::from_millis(30);

/// Cursor glyph appended while a reply is still being revealed.
pub const TYPING_CURSOR: &str = "▋";

/// Pause after revealing `ch`: short after whitespace, long after the end of
/// a sentence.
pub fn delay_after(ch: char) -> Duration {
    match ch {
        '.' | '!' | '?' => SENTENCE_END_DELAY,
        c if c.is_whitespace() => WHITESPACE_DELAY,
        _ => BASE_DELAY,
    }
}

/// Byte offset of the first `chars` characters of `text`.
fn prefix_bytes(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

#[derive(Debug, Clone)]
pub struct TypingAnimator {
    text: String,
    total_chars: usize,
    shown_chars: usize,
    shown_bytes: usize,
    speed: usize,
    enabled: bool,
}

impl TypingAnimator {
    /// `speed` is the number of characters revealed per tick; zero is treated
    /// as one.
    pub fn new(text: impl Into<String>, speed: usize, enabled: bool) -> Self {
        let text = text.into();
        let total_chars = text.chars().count();
        let mut animator = Self {
            text,
            total_chars,
            shown_chars: 0,
            shown_bytes: 0,
            speed: speed.max(1),
            enabled,
        };
        if !enabled {
            animator.finish();
        }
        animator
    }

    /// Replaces the text. A different text restarts the reveal from zero;
    /// the same text leaves progress untouched.
    pub fn set_text(&mut self, text: &str) -> bool {
        if text == self.text {
            return false;
        }
        self.text = text.to_string();
        self.total_chars = self.text.chars().count();
        self.shown_chars = 0;
        self.shown_bytes = 0;
        if !self.enabled {
            self.finish();
        }
        true
    }

    /// Reveals the next chunk. Returns the delay before the following tick,
    /// or `None` once the whole text is visible.
    pub fn tick(&mut self) -> Option<Duration> {
        if self.is_complete() {
            return None;
        }
        let remaining = &self.text[self.shown_bytes..];
        let step = remaining
            .char_indices()
            .take(self.speed)
            .last()
            .map(|(idx, ch)| (idx + ch.len_utf8(), ch));
        let (advance, last) = step?;
        self.shown_bytes += advance;
        self.shown_chars = (self.shown_chars + self.speed).min(self.total_chars);

        if self.is_complete() {
            None
        } else {
            Some(delay_after(last))
        }
    }

    pub fn finish(&mut self) {
        self.shown_chars = self.total_chars;
        self.shown_bytes = self.text.len();
    }

    pub fn displayed(&self) -> &str {
        &self.text[..self.shown_bytes]
    }

    pub fn shown_chars(&self) -> usize {
        self.shown_chars
    }

    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    pub fn is_complete(&self) -> bool {
        self.shown_chars >= self.total_chars
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingFrame {
    pub message_id: MessageId,
    pub generation: u64,
    pub shown_chars: usize,
    pub complete: bool,
}

/// Progress of every reply that is still being revealed.
///
/// A message without an entry is shown in full.
#[derive(Debug, Default)]
pub struct TypingBoard {
    entries: HashMap<MessageId, (u64, usize)>,
    next_generation: u64,
}

impl TypingBoard {
    /// Registers (or restarts) the animation for `id` and returns the
    /// generation its frames must carry.
    pub fn begin(&mut self, id: MessageId) -> u64 {
        self.next_generation += 1;
        self.entries.insert(id, (self.next_generation, 0));
        self.next_generation
    }

    /// Applies a frame; returns false when it belongs to a superseded or
    /// finished animation.
    pub fn apply(&mut self, frame: TypingFrame) -> bool {
        match self.entries.get_mut(&frame.message_id) {
            Some((generation, shown)) if *generation == frame.generation => {
                if frame.complete {
                    self.entries.remove(&frame.message_id);
                } else {
                    *shown = (*shown).max(frame.shown_chars);
                }
                true
            }
            _ => false,
        }
    }

    pub fn is_typing(&self, id: MessageId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn is_any_typing(&self) -> bool {
        !self.entries.is_empty()
    }

    /// The part of `content` currently visible for `id`.
    pub fn visible<'a>(&self, id: MessageId, content: &'a str) -> &'a str {
        match self.entries.get(&id) {
            Some((_, shown)) => &content[..prefix_bytes(content, *shown)],
            None => content,
        }
    }

    /// Shows every message in full.
    pub fn finish_all(&mut self) {
        self.entries.clear();
    }
}

/// Spawns and cancels per-message typing timer chains.
pub struct TypingService {
    tx: mpsc::UnboundedSender<TypingFrame>,
    tokens: HashMap<MessageId, CancellationToken>,
}

impl TypingService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TypingFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                tokens: HashMap::new(),
            },
            rx,
        )
    }

    /// Starts animating `text` for `message_id`, cancelling any chain that is
    /// already running for it.
    pub fn start(&mut self, message_id: MessageId, generation: u64, text: String, speed: usize) {
        self.cancel(message_id);
        self.tokens.retain(|_, token| !token.is_cancelled());

        let token = CancellationToken::new();
        self.tokens.insert(message_id, token.clone());
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let mut animator = TypingAnimator::new(text, speed, true);
            let mut delay = START_DELAY;
            loop {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tokio::time::sleep(delay) => {}
                }
                let next = animator.tick();
                if token.is_cancelled() {
                    return;
                }
                let frame = TypingFrame {
                    message_id,
                    generation,
                    shown_chars: animator.shown_chars(),
                    complete: animator.is_complete(),
                };
                if tx.send(frame).is_err() {
                    return;
                }
                match next {
                    Some(next_delay) => delay = next_delay,
                    None => {
                        token.cancel();
                        return;
                    }
                }
            }
        });
    }

    pub fn cancel(&mut self, message_id: MessageId) {
        if let Some(token) = self.tokens.remove(&message_id) {
            token.cancel();
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, token) in self.tokens.drain() {
            token.cancel();
        }
    }
}

impl Drop for TypingService {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_completion(text: &str, speed: usize) -> (Vec<usize>, usize) {
        let mut animator = TypingAnimator::new(text, speed, true);
        let mut lengths = vec![animator.shown_chars()];
        let mut ticks = 0;
        while !animator.is_complete() {
            animator.tick();
            ticks += 1;
            lengths.push(animator.shown_chars());
            assert!(ticks <= text.chars().count() + 1, "animation never finished");
        }
        (lengths, ticks)
    }

    #[test]
    fn disabled_shows_everything_immediately() {
        let animator = TypingAnimator::new("Hello, world!", 3, false);
        assert!(animator.is_complete());
        assert_eq!(animator.displayed(), "Hello, world!");
        assert_eq!(animator.shown_chars(), 13);
    }

    #[test]
    fn reveal_is_monotonic_and_finishes() {
        let texts = [
            "",
            "a",
            "Hello there. How are you?",
            "Ünïcödé ✨ text with émojis 🎬 and more!",
            "line one\nline two\n\nline four",
        ];
        for text in texts {
            for speed in [1, 2, 3, 4, 7, 64] {
                let (lengths, ticks) = run_to_completion(text, speed);
                assert!(lengths.windows(2).all(|pair| pair[0] <= pair[1]));
                assert_eq!(*lengths.last().unwrap(), text.chars().count());
                assert_eq!(ticks, text.chars().count().div_ceil(speed));
            }
        }
    }

    #[test]
    fn displayed_prefix_respects_char_boundaries() {
        let mut animator = TypingAnimator::new("héllo wörld", 2, true);
        animator.tick();
        assert_eq!(animator.displayed(), "hé");
        animator.tick();
        assert_eq!(animator.displayed(), "héll");
    }

    #[test]
    fn delay_depends_on_last_revealed_char() {
        let mut animator = TypingAnimator::new("Hi. Ok go", 3, true);
        // "Hi." ends in a period
        assert_eq!(animator.tick(), Some(SENTENCE_END_DELAY));
        // " Ok" ends in a letter
        assert_eq!(animator.tick(), Some(BASE_DELAY));
        // " go" completes the text
        assert_eq!(animator.tick(), None);

        let mut spaced = TypingAnimator::new("ab cd", 3, true);
        assert_eq!(spaced.tick(), Some(WHITESPACE_DELAY));
        assert_eq!(delay_after('\n'), WHITESPACE_DELAY);
        assert_eq!(delay_after('!'), SENTENCE_END_DELAY);
        assert_eq!(delay_after('?'), SENTENCE_END_DELAY);
    }

    #[test]
    fn changing_text_restarts_progress() {
        let mut animator = TypingAnimator::new("first reply", 4, true);
        animator.tick();
        assert_eq!(animator.shown_chars(), 4);
        assert!(!animator.set_text("first reply"));
        assert_eq!(animator.shown_chars(), 4);
        assert!(animator.set_text("second reply"));
        assert_eq!(animator.shown_chars(), 0);
        assert_eq!(animator.displayed(), "");
    }

    #[test]
    fn zero_speed_is_clamped() {
        let (_, ticks) = run_to_completion("abc", 0);
        assert_eq!(ticks, 3);
    }

    #[test]
    fn board_ignores_superseded_generations() {
        let mut board = TypingBoard::default();
        let id = MessageId(7);
        let old = board.begin(id);
        let new = board.begin(id);
        assert!(!board.apply(TypingFrame {
            message_id: id,
            generation: old,
            shown_chars: 5,
            complete: false,
        }));
        assert_eq!(board.visible(id, "hello world"), "");
        assert!(board.apply(TypingFrame {
            message_id: id,
            generation: new,
            shown_chars: 5,
            complete: false,
        }));
        assert_eq!(board.visible(id, "hello world"), "hello");
        assert!(board.apply(TypingFrame {
            message_id: id,
            generation: new,
            shown_chars: 11,
            complete: true,
        }));
        assert!(!board.is_typing(id));
        assert_eq!(board.visible(id, "hello world"), "hello world");
    }

    #[tokio::test(start_paused = true)]
    async fn service_emits_frames_until_complete() {
        let (mut service, mut rx) = TypingService::new();
        service.start(MessageId(1), 1, "Hello world.".to_string(), 4);

        let mut frames = Vec::new();
        while let Some(frame) = rx.recv().await {
            frames.push(frame);
            if frame.complete {
                break;
            }
        }
        let lengths: Vec<usize> = frames.iter().map(|f| f.shown_chars).collect();
        assert_eq!(lengths, vec![4, 8, 12]);
        assert!(frames.iter().all(|f| f.generation == 1));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_chain_sends_nothing_more() {
        let (mut service, mut rx) = TypingService::new();
        let id = MessageId(3);
        service.start(id, 1, "a fairly long reply that keeps typing".to_string(), 1);

        let first = rx.recv().await.expect("first frame");
        assert_eq!(first.shown_chars, 1);
        service.cancel(id);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_cancels_previous_chain() {
        let (mut service, mut rx) = TypingService::new();
        let id = MessageId(4);
        service.start(id, 1, "old text that is long".to_string(), 1);
        service.start(id, 2, "new".to_string(), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(frame);
        }
        assert!(!frames.is_empty());
        assert!(frames.iter().all(|f| f.generation == 2));
        assert!(frames.last().unwrap().complete);
    }
}
