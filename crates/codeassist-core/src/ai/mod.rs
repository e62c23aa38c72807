//! Inference backends.
//!
//! The turn processor only ever talks to the [`Inference`] trait, so tests and
//! alternative front ends can swap the HTTP client for anything that turns a
//! prompt into text.

pub mod error;
pub mod ollama;

use async_trait::async_trait;

pub use error::InferenceError;
pub use ollama::OllamaClient;

/// A single prompt-in, text-out model call.
#[async_trait]
pub trait Inference: Send + Sync {
    /// Send `prompt` to the model and return the full response text.
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError>;

    /// Identifier of the model answering requests.
    fn model(&self) -> &str;
}
