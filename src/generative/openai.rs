//! OpenAI-compatible chat completions client in JSON mode.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::GenerativeConfig;
use crate::{AppError, Result};

use super::{CompletionFuture, GenerativeTextClient};

const SYSTEM_PROMPT: &str = "You are the planning assistant of a personal task manager. \
     Reply with exactly one JSON object and nothing else.";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

/// Chat completions client with bearer auth.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    api_key: String,
}

impl OpenAiClient {
    /// Build a client for `config` authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Generative` if the HTTP client cannot be built.
    pub fn new(config: &GenerativeConfig, api_key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key,
        })
    }

    async fn request(&self, prompt: &str) -> Result<Value> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let response = self
            .http
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&text) {
                return Err(AppError::Generative(format!(
                    "api error ({status}): {}",
                    api_err.error.message
                )));
            }
            return Err(AppError::Generative(format!("api error ({status})")));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::Generative("response contained no content".into()))?;

        debug!(model = %self.model, bytes = content.len(), "completion received");
        parse_json_object(&content)
    }
}

/// Parse model output as a single JSON object.
///
/// # Errors
///
/// Returns `AppError::Generative` if `content` is not JSON or not an object.
pub fn parse_json_object(content: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(content.trim())?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(AppError::Generative("expected a JSON object".into()))
    }
}

impl GenerativeTextClient for OpenAiClient {
    fn complete(&self, prompt: &str) -> CompletionFuture<'_> {
        let prompt = prompt.to_owned();
        Box::pin(async move { self.request(&prompt).await })
    }
}
