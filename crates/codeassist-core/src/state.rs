//! UI-agnostic conversation state
//!
//! The transcript and the active mode live in one explicit value that the
//! front end owns. Nothing here knows about terminals or widgets, and the
//! pending input buffer deliberately lives elsewhere.

use serde::{Deserialize, Serialize};

/// What kind of help the next request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    CodeGeneration,
    DebugCode,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::CodeGeneration => "generate",
            Mode::DebugCode => "debug",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "generate" | "generation" | "code-generation" => Some(Mode::CodeGeneration),
            "debug" | "debug-code" => Some(Mode::DebugCode),
            _ => None,
        }
    }

    pub fn all() -> [Mode; 2] {
        [Mode::CodeGeneration, Mode::DebugCode]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::CodeGeneration => "Code Generation",
            Mode::DebugCode => "Debug Code",
        }
    }

    /// Hint shown in the empty input field.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Mode::CodeGeneration => "Enter your prompt here...",
            Mode::DebugCode => "Enter your code here...",
        }
    }

    /// Label of the submit control.
    pub fn submit_label(&self) -> &'static str {
        match self {
            Mode::CodeGeneration => "Send",
            Mode::DebugCode => "Debug",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Mode::CodeGeneration => Mode::DebugCode,
            Mode::DebugCode => Mode::CodeGeneration,
        }
    }
}

/// The sender of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

/// One message in the transcript. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Transcript plus the active mode for a single session.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    mode: Mode,
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            turns: Vec::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Only affects prompts built after this call.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// True between appending a user turn and appending its answer.
    pub fn awaiting_response(&self) -> bool {
        self.turns
            .last()
            .is_some_and(|turn| turn.role() == Role::User)
    }
}
