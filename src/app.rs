use std::sync::Arc;

use codeassist_core::{begin_turn, finish_turn, Conversation, Inference, InferenceError, Mode, OllamaClient};
use ratatui::layout::Rect;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Outcome of the startup check that the model is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    Skipped,
    Checking,
    Ready,
    MissingModel,
    Unreachable(String),
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub conversation: Conversation,

    // Input buffer (never part of the transcript)
    pub input: String,
    pub cursor: usize, // cursor position in chars

    // Request state
    pub pending: Option<JoinHandle<Result<String, InferenceError>>>,
    pub inference: Arc<dyn Inference>,
    pub endpoint: String,
    pub probe: ProbeStatus,
    pub probe_task: Option<JoinHandle<Result<bool, InferenceError>>>,

    // Chat view state, refreshed during render
    pub chat_scroll: u16,
    pub chat_max_scroll: u16,
    pub chat_height: u16,
    pub follow_tail: bool,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub sidebar_area: Option<Rect>,
    pub chat_area: Option<Rect>,
}

impl App {
    pub fn new(inference: Arc<dyn Inference>, endpoint: impl Into<String>, mode: Mode) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            conversation: Conversation::with_mode(mode),
            input: String::new(),
            cursor: 0,
            pending: None,
            inference,
            endpoint: endpoint.into(),
            probe: ProbeStatus::Skipped,
            probe_task: None,
            chat_scroll: 0,
            chat_max_scroll: 0,
            chat_height: 0,
            follow_tail: true,
            animation_frame: 0,
            sidebar_area: None,
            chat_area: None,
        }
    }

    pub fn model(&self) -> &str {
        self.inference.model()
    }

    pub fn mode(&self) -> Mode {
        self.conversation.mode()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.conversation.mode() != mode {
            tracing::info!(mode = mode.as_str(), "mode switched");
        }
        self.conversation.set_mode(mode);
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode().toggled());
    }

    /// Check in the background that the configured model is installed.
    pub fn start_probe(&mut self, client: OllamaClient) {
        self.probe = ProbeStatus::Checking;
        let model = self.model().to_string();
        self.probe_task = Some(tokio::spawn(async move { client.has_model(&model).await }));
    }

    /// Send the input buffer as the next user turn.
    ///
    /// Ignored while a request is outstanding or when the buffer is blank.
    /// Returns whether a request was started.
    pub fn submit_input(&mut self) -> bool {
        if self.pending.is_some() {
            return false;
        }

        let Some(prompt) = begin_turn(&mut self.conversation, &self.input) else {
            return false;
        };

        self.input.clear();
        self.cursor = 0;
        self.follow_tail = true;

        let inference = Arc::clone(&self.inference);
        self.pending = Some(tokio::spawn(async move { inference.generate(&prompt).await }));
        true
    }

    /// Collect finished background work. Cheap when nothing is ready.
    pub async fn poll_tasks(&mut self) {
        if self.pending.as_ref().is_some_and(|task| task.is_finished()) {
            if let Some(task) = self.pending.take() {
                let result = match task.await {
                    Ok(result) => result,
                    Err(e) => Err(InferenceError::Interrupted(e.to_string())),
                };
                finish_turn(&mut self.conversation, result);
                self.follow_tail = true;
                self.animation_frame = 0;
            }
        }

        if self.probe_task.as_ref().is_some_and(|task| task.is_finished()) {
            if let Some(task) = self.probe_task.take() {
                self.probe = match task.await {
                    Ok(Ok(true)) => ProbeStatus::Ready,
                    Ok(Ok(false)) => {
                        tracing::warn!(model = %self.model(), endpoint = %self.endpoint, "model not installed");
                        ProbeStatus::MissingModel
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(endpoint = %self.endpoint, error = %e, "endpoint probe failed");
                        ProbeStatus::Unreachable(e.to_string())
                    }
                    Err(e) => ProbeStatus::Unreachable(e.to_string()),
                };
            }
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Input editing

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    /// Insert pasted text at the cursor, normalizing line endings.
    pub fn insert_str(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert_str(byte_pos, &text);
        self.cursor += text.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    /// Row and column of the cursor within the (possibly multi-line) input.
    pub fn cursor_row_col(&self) -> (usize, usize) {
        let before: String = self.input.chars().take(self.cursor).collect();
        let row = before.matches('\n').count();
        let col = before
            .rsplit('\n')
            .next()
            .map(|line| line.chars().count())
            .unwrap_or(0);
        (row, col)
    }

    // Chat scrolling

    pub fn scroll_up(&mut self, lines: u16) {
        self.follow_tail = false;
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(self.chat_max_scroll);
        if self.chat_scroll >= self.chat_max_scroll {
            self.follow_tail = true;
        }
    }

    pub fn scroll_half_page_up(&mut self) {
        self.scroll_up((self.chat_height / 2).max(1));
    }

    pub fn scroll_half_page_down(&mut self) {
        self.scroll_down((self.chat_height / 2).max(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.follow_tail = false;
        self.chat_scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.follow_tail = true;
        self.chat_scroll = self.chat_max_scroll;
    }

    /// Clamp scrolling to the content height measured by the last render.
    pub fn update_chat_metrics(&mut self, total_lines: u16, visible_height: u16) {
        self.chat_height = visible_height;
        self.chat_max_scroll = total_lines.saturating_sub(visible_height);
        if self.follow_tail {
            self.chat_scroll = self.chat_max_scroll;
        } else {
            self.chat_scroll = self.chat_scroll.min(self.chat_max_scroll);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use codeassist_core::{Role, Turn};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoInference {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Inference for EchoInference {
        async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("```{}```", prompt.len()))
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    fn app_with_echo() -> (App, Arc<EchoInference>) {
        let inference = Arc::new(EchoInference {
            calls: AtomicUsize::new(0),
        });
        let app = App::new(inference.clone(), "http://localhost:11434", Mode::default());
        (app, inference)
    }

    async fn wait_for_reply(app: &mut App) {
        while app.is_loading() {
            tokio::task::yield_now().await;
            app.poll_tasks().await;
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_not_sent() {
        let (mut app, inference) = app_with_echo();
        app.insert_str("   ");

        assert!(!app.submit_input());
        assert!(!app.is_loading());
        assert!(app.conversation.is_empty());
        assert_eq!(inference.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_clears_input_and_records_reply() {
        let (mut app, inference) = app_with_echo();
        app.insert_str("fizzbuzz");

        assert!(app.submit_input());
        assert!(app.input.is_empty());
        assert_eq!(app.cursor, 0);
        assert_eq!(app.input_mode, InputMode::Editing);
        assert!(app.conversation.awaiting_response());

        wait_for_reply(&mut app).await;

        let turns = app.conversation.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::user("fizzbuzz"));
        assert_eq!(turns[1].role(), Role::Assistant);
        assert_eq!(inference.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_ignored() {
        let (mut app, _inference) = app_with_echo();
        app.insert_str("first");
        assert!(app.submit_input());

        app.insert_str("second");
        assert!(!app.submit_input());
        assert_eq!(app.input, "second");

        wait_for_reply(&mut app).await;
        assert_eq!(app.conversation.turns().len(), 2);
    }

    #[test]
    fn test_editing_is_utf8_safe() {
        let (mut app, _inference) = app_with_echo();
        app.insert_str("héllo");
        app.cursor_left();
        app.backspace();
        assert_eq!(app.input, "hélo");
        app.cursor_home();
        app.delete();
        assert_eq!(app.input, "élo");
        app.cursor_end();
        app.insert_char('!');
        assert_eq!(app.input, "élo!");
    }

    #[test]
    fn test_paste_normalizes_newlines_and_tracks_cursor() {
        let (mut app, _inference) = app_with_echo();
        app.insert_str("def f():\r\n    pass");
        assert_eq!(app.input, "def f():\n    pass");
        assert_eq!(app.cursor_row_col(), (1, 8));
    }

    #[test]
    fn test_scroll_follows_tail_until_user_scrolls_up() {
        let (mut app, _inference) = app_with_echo();
        app.update_chat_metrics(50, 20);
        assert_eq!(app.chat_scroll, 30);

        app.scroll_up(5);
        app.update_chat_metrics(60, 20);
        assert_eq!(app.chat_scroll, 25);

        app.scroll_down(100);
        assert!(app.follow_tail);
        assert_eq!(app.chat_scroll, 40);
    }

    #[test]
    fn test_mode_switch_keeps_transcript() {
        let (mut app, _inference) = app_with_echo();
        app.conversation.append(Turn::user("a"));
        app.conversation.append(Turn::assistant("b"));

        app.toggle_mode();
        assert_eq!(app.mode(), Mode::DebugCode);
        assert_eq!(app.conversation.turns().len(), 2);
    }
}
