//! OpenAI-compatible chat completions for the note assistant.
//!
//! One synchronous question, one answer: no streaming, no retries, no
//! partial-response handling. Context passages (note bodies gathered by the
//! caller) are folded into the system message.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::ConfigStore;
use crate::error::{Error, Result};
use crate::CONTEXT_SEPARATOR;

pub const CHAT_TIMEOUT: Duration = Duration::from_secs(60);
pub const REPLY_MAX_TOKENS: u32 = 2000;
pub const REPLY_TEMPERATURE: f32 = 0.7;

const SYSTEM_PREAMBLE: &str =
    "You are a helpful assistant built into a personal note-taking app. \
     Answer clearly and concisely.";
const CONTEXT_INSTRUCTION: &str =
    "Use the notes above as context when answering the user's question.";

pub struct ChatClient {
    http: reqwest::Client,
    config: Arc<ConfigStore>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

impl ChatClient {
    pub fn new(config: Arc<ConfigStore>) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(CHAT_TIMEOUT).build()?;
        Ok(Self { http, config })
    }

    /// Sends `prompt` with the configured model and credentials. Fails with
    /// [`Error::MissingCredential`] before any network I/O when no API key is
    /// set.
    pub async fn chat(&self, prompt: &str, contexts: &[String]) -> Result<String> {
        let settings = self.config.get();
        let api_key = settings.api_key.trim();
        if api_key.is_empty() {
            return Err(Error::MissingCredential);
        }

        let request = ChatRequest {
            model: &settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_message(contexts),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            max_tokens: REPLY_MAX_TOKENS,
            temperature: REPLY_TEMPERATURE,
        };

        tracing::debug!(
            model = %settings.model,
            contexts = contexts.len(),
            "sending chat completion request"
        );

        let response = self
            .http
            .post(&settings.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_request_error)?;
        let status = response.status();
        let raw = response.text().await.map_err(map_request_error)?;

        parse_reply(status, &raw)
    }
}

fn map_request_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout("chat request", CHAT_TIMEOUT)
    } else {
        Error::Http(err)
    }
}

fn system_message(contexts: &[String]) -> String {
    if contexts.is_empty() {
        SYSTEM_PREAMBLE.to_string()
    } else {
        format!(
            "{SYSTEM_PREAMBLE}\n\n{}\n\n{CONTEXT_INSTRUCTION}",
            contexts.join(CONTEXT_SEPARATOR)
        )
    }
}

/// Either `error.message` or `choices[0].message.content`; a body that is
/// not JSON is only tolerated as a bare non-2xx status.
fn parse_reply(status: StatusCode, raw: &str) -> Result<String> {
    let parsed: ChatResponse = match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            if !status.is_success() {
                return Err(Error::RemoteApi(format!("HTTP {status}")));
            }
            return Err(Error::MalformedResponse(err.to_string()));
        }
    };

    if let Some(api_error) = parsed.error {
        return Err(Error::RemoteApi(api_error.message));
    }
    let mut choices = parsed.choices;
    if choices.is_empty() {
        return Err(Error::EmptyResponse);
    }
    Ok(choices.remove(0).message.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE_NAME;

    #[tokio::test]
    async fn missing_api_key_fails_before_any_network_call() {
        let dir = tempfile::tempdir().unwrap();
        let config = Arc::new(ConfigStore::load(dir.path().join(CONFIG_FILE_NAME)));
        let client = ChatClient::new(config).unwrap();

        let err = client.chat("what is X?", &[]).await.unwrap_err();
        assert!(matches!(err, Error::MissingCredential));
    }

    #[test]
    fn system_message_without_context_is_just_the_preamble() {
        assert_eq!(system_message(&[]), SYSTEM_PREAMBLE);
    }

    #[test]
    fn system_message_joins_contexts_with_the_separator() {
        let contexts = vec!["first note".to_string(), "second note".to_string()];
        let message = system_message(&contexts);
        assert!(message.starts_with(SYSTEM_PREAMBLE));
        assert!(message.contains("first note\n\n---\n\nsecond note"));
        assert!(message.ends_with(CONTEXT_INSTRUCTION));
    }

    #[test]
    fn parse_reply_extracts_the_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"42"}}]}"#;
        assert_eq!(parse_reply(StatusCode::OK, raw).unwrap(), "42");
    }

    #[test]
    fn parse_reply_surfaces_in_body_errors() {
        let raw = r#"{"error":{"message":"invalid api key","type":"auth"}}"#;
        let err = parse_reply(StatusCode::UNAUTHORIZED, raw).unwrap_err();
        assert!(matches!(err, Error::RemoteApi(message) if message == "invalid api key"));
    }

    #[test]
    fn parse_reply_flags_empty_choices() {
        let err = parse_reply(StatusCode::OK, r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, Error::EmptyResponse));
    }

    #[test]
    fn parse_reply_flags_unparseable_bodies() {
        let err = parse_reply(StatusCode::OK, "<html>gateway</html>").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));

        let err = parse_reply(StatusCode::BAD_GATEWAY, "<html>gateway</html>").unwrap_err();
        assert!(matches!(err, Error::RemoteApi(message) if message.contains("502")));
    }
}
