pub mod ai;
pub mod config;
pub mod prompt;
pub mod segment;
pub mod state;
pub mod turn;

// Re-export main types for convenience
pub use ai::{Inference, InferenceError, OllamaClient};
pub use config::Config;
pub use prompt::build_prompt;
pub use segment::{segment, Segment, SegmentKind};
pub use state::{Conversation, Mode, Role, Turn};
pub use turn::{begin_turn, finish_turn, submit};
