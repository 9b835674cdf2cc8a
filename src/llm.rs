//! OpenAI client for grading calls and key verification.
//!
//! One outbound request per grading request, bounded timeout, no retry.
//! Replies are expected to be a small JSON object, optionally wrapped in a
//! Markdown code fence.

use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// System instruction sent with every grading call. Keeps the model from
/// inventing errors; temperature 0 does the rest.
const SYSTEM_PROMPT: &str =
    "당신은 정확한 한국어 검사 AI입니다. 실제로 존재하는 오류만 보고하세요. 없으면 오류 0개로 응답하세요.";

/// Failures from the upstream model API.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No credential configured on the server
    #[error("API 키가 서버에 설정되지 않았습니다.")]
    MissingApiKey,

    /// Upstream answered with a non-success status
    #[error("OpenAI API 오류: {status}")]
    Upstream { status: u16, body: String },

    /// Timeout or connection failure
    #[error("API 요청 실패: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Transport(err.to_string())
    }
}

/// Structured grading reply from the model.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GradingReply {
    /// Number of errors the model found
    #[serde(rename = "errorCount", default)]
    pub error_count: usize,

    /// One description per error, in the model's order
    #[serde(default)]
    pub errors: Vec<String>,
}

// OpenAI chat completion types
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Client for the upstream chat-completion API
pub struct LlmClient {
    client: Client,
    config: Config,
}

impl LlmClient {
    /// Create a new client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Send a grading prompt and return the raw reply text.
    ///
    /// Temperature is pinned to 0 so repeated submissions grade the same.
    pub async fn grade(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.config.get_api_key().ok_or(LlmError::MissingApiKey)?;

        let request = ChatRequest {
            model: self.config.get_model(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.0,
            max_tokens: self.config.llm.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.get_base_url()))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Upstream { status, body });
        }

        let chat_response: ChatResponse = response.json().await?;
        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::Upstream {
                status: 200,
                body: "empty choices".to_string(),
            })
    }

    /// Ping the model-listing endpoint to confirm the credential is live.
    /// Returns the upstream status code.
    pub async fn verify_key(&self) -> Result<u16, LlmError> {
        let api_key = self.config.get_api_key().ok_or(LlmError::MissingApiKey)?;

        let response = self
            .client
            .get(format!("{}/v1/models", self.config.get_base_url()))
            .header("Authorization", format!("Bearer {}", api_key))
            .timeout(Duration::from_secs(self.config.llm.verify_timeout_secs))
            .send()
            .await?;

        Ok(response.status().as_u16())
    }
}

/// Strip an optional Markdown code fence from a model reply.
///
/// Takes the content between the first fence (skipping an optional language
/// tag on the fence line) and the next one, or to the end of input when the
/// closing fence is missing. Without any fence the whole trimmed reply is
/// returned.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();

    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };
    let rest = &trimmed[open + 3..];

    // skip a language tag such as ```json
    let body = match rest.find('\n') {
        Some(nl) if rest[..nl].trim().chars().all(|c| c.is_ascii_alphanumeric()) => &rest[nl + 1..],
        _ => rest,
    };

    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

/// Parse a fence-stripped model reply into a [`GradingReply`].
pub fn parse_reply(reply: &str) -> Result<GradingReply, serde_json::Error> {
    serde_json::from_str(strip_code_fence(reply))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_strip_no_fence() {
        let reply = r#" {"errorCount": 0, "errors": []} "#;
        assert_eq!(strip_code_fence(reply), r#"{"errorCount": 0, "errors": []}"#);
    }

    #[test]
    fn test_strip_json_fence() {
        let reply = "```json\n{\"errorCount\": 1}\n```";
        assert_eq!(strip_code_fence(reply), "{\"errorCount\": 1}");
    }

    #[test]
    fn test_strip_bare_fence() {
        let reply = "```\n{\"errorCount\": 2}\n```";
        assert_eq!(strip_code_fence(reply), "{\"errorCount\": 2}");
    }

    #[test]
    fn test_strip_fence_with_surrounding_prose() {
        let reply = "결과는 다음과 같습니다:\n```json\n{\"errorCount\": 0, \"errors\": []}\n```\n이상입니다.";
        assert_eq!(
            strip_code_fence(reply),
            "{\"errorCount\": 0, \"errors\": []}"
        );
    }

    #[test]
    fn test_strip_unclosed_fence_runs_to_end() {
        let reply = "```json\n{\"errorCount\": 3}";
        assert_eq!(strip_code_fence(reply), "{\"errorCount\": 3}");
    }

    #[test]
    fn test_parse_full_reply() {
        let reply = r#"{"errorCount": 2, "errors": ["첫 번째", "두 번째"]}"#;
        let parsed = parse_reply(reply).unwrap();

        assert_eq!(parsed.error_count, 2);
        assert_eq!(parsed.errors, vec!["첫 번째", "두 번째"]);
    }

    #[test]
    fn test_parse_defaults_for_missing_fields() {
        let parsed = parse_reply("{}").unwrap();

        assert_eq!(parsed.error_count, 0);
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn test_parse_fenced_reply() {
        let reply = "```json\n{\"errorCount\": 1, \"errors\": [\"조사 중복\"]}\n```";
        let parsed = parse_reply(reply).unwrap();

        assert_eq!(parsed.error_count, 1);
        assert_eq!(parsed.errors, vec!["조사 중복"]);
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(parse_reply("오류가 없습니다.").is_err());
    }

    #[test]
    fn test_client_creation() {
        let client = LlmClient::new(Config::default());
        assert!(client.is_ok());
    }
}
