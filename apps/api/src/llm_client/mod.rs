/// LLM Client — the single point of entry for all text-generation calls in SmartReps.
///
/// Handlers depend only on the `TextGenerator` trait: given a prompt, produce either
/// a finite ordered stream of text deltas or one final text string.
///
/// Model: gpt-4o-mini (hardcoded so the plan grammar and the model stay paired)
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod sse;

use sse::{SseEvent, SseLineBuffer};

/// The model used for all generation calls.
pub const MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    /// The token stream reported an error in-band or ended before `[DONE]`.
    #[error("Stream error: {0}")]
    Stream(String),
}

/// Ordered text deltas from one streaming generation call.
pub type TextStream = BoxStream<'static, Result<String, LlmError>>;

/// A chat-style text-generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Single-shot completion. Returns the full response text.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Opens a token stream. Errors before the first delta are returned directly;
    /// later failures surface as an `Err` item, after which the stream ends.
    async fn stream(&self, prompt: &str) -> Result<TextStream, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// OpenAI-compatible chat-completions client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Sends one chat request and returns the response once the status is known to be a success.
    async fn send(&self, prompt: &str, stream: bool) -> Result<reqwest::Response, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let body = self.send(prompt, false).await?.text().await?;
        let response: ChatResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    async fn stream(&self, prompt: &str) -> Result<TextStream, LlmError> {
        let response = self.send(prompt, true).await?;
        let mut body = response.bytes_stream();

        let deltas = async_stream::stream! {
            let mut lines = SseLineBuffer::default();

            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(LlmError::Http(e));
                        return;
                    }
                };

                for line in lines.push(&chunk) {
                    match sse::parse_line(&line) {
                        Some(SseEvent::Delta(text)) => yield Ok(text),
                        Some(SseEvent::Done) => return,
                        Some(SseEvent::Error(message)) => {
                            yield Err(LlmError::Stream(message));
                            return;
                        }
                        None => {}
                    }
                }
            }

            match lines.finish().as_deref().and_then(sse::parse_line) {
                Some(SseEvent::Delta(text)) => {
                    yield Ok(text);
                    yield Err(LlmError::Stream("stream ended before [DONE]".to_string()));
                }
                Some(SseEvent::Done) => {}
                Some(SseEvent::Error(message)) => {
                    yield Err(LlmError::Stream(message));
                }
                None => {
                    yield Err(LlmError::Stream("stream ended before [DONE]".to_string()));
                }
            }
        };

        Ok(deltas.boxed())
    }
}

/// Pulls `error.message` out of an API error body, falling back to the raw body.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}
