//! Chat conversation models for the assistant-guided feedback flow.
//!
//! The client owns the running conversation; the server only relays it to
//! the completion API and, at the end, stores the rendered transcript as
//! the feedback content.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single turn in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Request to continue the conversation with the assistant.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ChatRequest {
    /// Prior turns, oldest first.
    #[serde(default)]
    pub history: Vec<ChatMessage>,

    #[validate(length(min = 1, max = 4000, message = "Message must be 1-4000 characters"))]
    pub message: String,
}

/// The assistant's next turn.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ChatReply {
    pub reply: String,
}

/// Renders a conversation as storable feedback content, one `role: content`
/// line per message.
pub fn render_transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|msg| format!("{}: {}", msg.role, msg.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_transcript_formats_lines() {
        let messages = vec![
            ChatMessage {
                role: ChatRole::User,
                content: "We shipped the migration together.".to_string(),
            },
            ChatMessage {
                role: ChatRole::Assistant,
                content: "What was their part in it?".to_string(),
            },
        ];

        let transcript = render_transcript(&messages);
        assert_eq!(
            transcript,
            "user: We shipped the migration together.\nassistant: What was their part in it?"
        );
    }

    #[test]
    fn test_render_transcript_empty() {
        assert_eq!(render_transcript(&[]), "");
    }

    #[test]
    fn test_chat_request_history_defaults_to_empty() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"message": "hello"}"#).unwrap();
        assert!(request.history.is_empty());
        assert_eq!(request.message, "hello");
    }

    #[test]
    fn test_chat_request_rejects_empty_message() {
        let request = ChatRequest {
            history: vec![],
            message: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_role_round_trips_through_json() {
        let json = r#"[{"role":"user","content":"a"},{"role":"assistant","content":"b"}]"#;
        let messages: Vec<ChatMessage> = serde_json::from_str(json).unwrap();
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(serde_json::to_string(&messages).unwrap(), json);
    }
}
