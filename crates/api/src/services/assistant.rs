//! Chat assistant integration for the guided feedback conversation.
//!
//! Thin client for a chat-completions style API. The server holds no
//! conversation state: each call carries the full history and returns the
//! assistant's next turn.

use std::time::Duration;

use domain::models::{ChatMessage, ChatRole};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::AssistantConfig;

/// Errors that can occur when talking to the completion service.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Chat assistant is disabled")]
    Disabled,

    #[error("Chat assistant is not configured")]
    NotConfigured,

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response from completion service: {0}")]
    InvalidResponse(String),

    #[error("Completion service error: {0}")]
    ServiceError(String),
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

/// Client for the hosted chat-completion API.
pub struct AssistantClient {
    client: Client,
    config: AssistantConfig,
}

impl AssistantClient {
    /// Creates a new client from configuration.
    ///
    /// Fails with [`AssistantError::NotConfigured`] when the endpoint or
    /// API key is missing.
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        if !config.enabled {
            return Err(AssistantError::Disabled);
        }
        if config.api_url.is_empty() || config.api_key.is_empty() {
            return Err(AssistantError::NotConfigured);
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Sends the conversation so far plus the giver's new message, and
    /// returns the assistant's reply.
    pub async fn continue_conversation(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, AssistantError> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(WireMessage {
            role: "system",
            content: &self.config.system_prompt,
        });
        for turn in history {
            messages.push(WireMessage {
                role: role_str(turn.role),
                content: &turn.content,
            });
        }
        messages.push(WireMessage {
            role: "user",
            content: message,
        });

        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        debug!(
            model = %self.config.model,
            turns = history.len() + 1,
            "Requesting chat completion"
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AssistantError::Timeout(self.config.timeout_ms)
                } else {
                    AssistantError::Http(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, error = %body, "Completion service error");
            return Err(AssistantError::ServiceError(format!(
                "{}: {}",
                status, body
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AssistantError::InvalidResponse("No choices in response".to_string()))
    }
}

fn role_str(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_config() -> AssistantConfig {
        AssistantConfig {
            enabled: true,
            api_key: "test-key".to_string(),
            ..AssistantConfig::default()
        }
    }

    #[test]
    fn test_client_rejects_disabled_config() {
        let config = AssistantConfig::default();
        assert!(matches!(
            AssistantClient::new(config),
            Err(AssistantError::Disabled)
        ));
    }

    #[test]
    fn test_client_rejects_missing_key() {
        let mut config = enabled_config();
        config.api_key = String::new();
        assert!(matches!(
            AssistantClient::new(config),
            Err(AssistantError::NotConfigured)
        ));
    }

    #[test]
    fn test_client_rejects_missing_url() {
        let mut config = enabled_config();
        config.api_url = String::new();
        assert!(matches!(
            AssistantClient::new(config),
            Err(AssistantError::NotConfigured)
        ));
    }

    #[test]
    fn test_client_builds_with_full_config() {
        assert!(AssistantClient::new(enabled_config()).is_ok());
    }

    #[test]
    fn test_role_str() {
        assert_eq!(role_str(ChatRole::User), "user");
        assert_eq!(role_str(ChatRole::Assistant), "assistant");
    }

    #[test]
    fn test_completion_response_parses() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"Tell me more."}}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content, "Tell me more.");
    }

    #[test]
    fn test_request_serializes_roles() {
        let request = CompletionRequest {
            model: "gpt-4o",
            messages: vec![
                WireMessage {
                    role: "system",
                    content: "prompt",
                },
                WireMessage {
                    role: "user",
                    content: "hello",
                },
            ],
            temperature: 0.7,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["model"], "gpt-4o");
    }
}
