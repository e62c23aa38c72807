//! One request/response cycle against the conversation.
//!
//! [`submit`] runs a whole cycle. Front ends that must keep drawing while the
//! model works can split it into [`begin_turn`] and [`finish_turn`] around a
//! background call of their own.

use crate::ai::{Inference, InferenceError};
use crate::prompt::build_prompt;
use crate::state::{Conversation, Turn};

/// Record the user's turn and build the prompt for it.
///
/// Returns `None` for blank input, in which case the conversation is left
/// untouched and no request should be made.
pub fn begin_turn(conversation: &mut Conversation, input: &str) -> Option<String> {
    if input.trim().is_empty() {
        return None;
    }

    conversation.append(Turn::user(input));
    let prompt = build_prompt(conversation.mode(), input);
    tracing::debug!(
        mode = conversation.mode().as_str(),
        input_len = input.len(),
        "turn started"
    );
    Some(prompt)
}

/// Record the model's answer. Failures become ordinary assistant text.
pub fn finish_turn(conversation: &mut Conversation, result: Result<String, InferenceError>) {
    let content = match result {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "inference failed, recording error as reply");
            e.to_string()
        }
    };
    conversation.append(Turn::assistant(content));
}

/// Run a full cycle: validate, record, ask the model, record the reply.
///
/// Returns whether anything was submitted. Errors never reach the caller.
pub async fn submit<I>(conversation: &mut Conversation, input: &str, inference: &I) -> bool
where
    I: Inference + ?Sized,
{
    let Some(prompt) = begin_turn(conversation, input) else {
        return false;
    };

    let result = inference.generate(&prompt).await;
    finish_turn(conversation, result);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Mode, Role};
    use async_trait::async_trait;
    use std::sync::Mutex;

    enum Reply {
        Text(&'static str),
        Status(u16, &'static str),
        Broken(&'static str),
    }

    struct ScriptedInference {
        reply: Reply,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedInference {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Inference for ScriptedInference {
        async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Status(status, body) => Err(InferenceError::Status {
                    status,
                    body: body.to_string(),
                }),
                Reply::Broken(reason) => Err(InferenceError::Interrupted(reason.to_string())),
            }
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let inference = ScriptedInference::new(Reply::Text("unused"));
        let mut conversation = Conversation::new();

        assert!(!submit(&mut conversation, "", &inference).await);
        assert!(!submit(&mut conversation, "  \n\t ", &inference).await);

        assert!(conversation.is_empty());
        assert!(inference.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_successful_cycle_appends_user_then_assistant() {
        let inference = ScriptedInference::new(Reply::Text("```print(1)```"));
        let mut conversation = Conversation::new();

        assert!(submit(&mut conversation, " print one ", &inference).await);

        let turns = conversation.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::user(" print one "));
        assert_eq!(turns[1], Turn::assistant("```print(1)```"));
        assert!(!conversation.awaiting_response());
    }

    #[tokio::test]
    async fn test_mode_switch_changes_only_next_prompt() {
        let inference = ScriptedInference::new(Reply::Text("ok"));
        let mut conversation = Conversation::new();

        submit(&mut conversation, "sort a list", &inference).await;
        let before: Vec<Turn> = conversation.turns().to_vec();

        conversation.set_mode(Mode::DebugCode);
        submit(&mut conversation, "print(x", &inference).await;

        let prompts = inference.prompts();
        assert_eq!(prompts[0], build_prompt(Mode::CodeGeneration, "sort a list"));
        assert_eq!(prompts[1], build_prompt(Mode::DebugCode, "print(x"));
        assert_eq!(&conversation.turns()[..2], before.as_slice());
        assert_eq!(conversation.turns().len(), 4);
    }

    #[tokio::test]
    async fn test_status_failure_becomes_assistant_turn() {
        let inference = ScriptedInference::new(Reply::Status(500, "model crashed"));
        let mut conversation = Conversation::new();

        submit(&mut conversation, "hello", &inference).await;

        let reply = &conversation.turns()[1];
        assert_eq!(reply.role(), Role::Assistant);
        assert_eq!(reply.content(), "Error: model crashed");
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_assistant_turn() {
        let inference = ScriptedInference::new(Reply::Broken("connection reset"));
        let mut conversation = Conversation::new();

        submit(&mut conversation, "hello", &inference).await;

        let reply = &conversation.turns()[1];
        assert_eq!(reply.role(), Role::Assistant);
        assert!(reply.content().starts_with("An error occurred: "));
    }

    #[test]
    fn test_begin_turn_leaves_conversation_awaiting() {
        let mut conversation = Conversation::with_mode(Mode::DebugCode);

        let prompt = begin_turn(&mut conversation, "x = ").unwrap();
        assert!(prompt.starts_with("Debug the following Python code:"));
        assert!(conversation.awaiting_response());

        finish_turn(&mut conversation, Ok("fixed".to_string()));
        assert!(!conversation.awaiting_response());
        assert_eq!(conversation.turns()[1], Turn::assistant("fixed"));
    }
}
