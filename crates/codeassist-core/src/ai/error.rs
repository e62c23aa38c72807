use thiserror::Error;

/// Failure of an inference call.
///
/// The `Display` output is what ends up in the transcript, so each variant
/// renders as a complete, user-facing message.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The endpoint answered with a non-success status; `body` is the raw
    /// response text.
    #[error("Error: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a usable response (connect, IO, decode).
    #[error("An error occurred: {0}")]
    Request(#[from] reqwest::Error),

    /// The task running the request died before returning.
    #[error("An error occurred: {0}")]
    Interrupted(String),
}

impl InferenceError {
    /// True when the remote side answered but refused the request.
    pub fn is_status(&self) -> bool {
        matches!(self, InferenceError::Status { .. })
    }
}
