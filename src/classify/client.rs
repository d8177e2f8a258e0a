//! Blocking chat completion client for the classification call

use crate::classify::prompt::{ContentBlock, FewShotPrompt};
use crate::io::configuration::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use crate::io::error::{PipelineError, Result};
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Generation parameters for a chat completion request
#[derive(Debug, Clone)]
pub struct ChatOptions {
    /// Model identifier, e.g. `gpt-4-turbo`
    pub model: String,
    /// Maximum response token budget
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

/// What came back from one completion call
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    /// Raw text body of the first choice
    pub text: String,
    /// Total tokens consumed, zero when the endpoint omits usage
    pub total_tokens: u64,
}

/// A synchronous chat completion backend
///
/// One call per query image; implementations block until a response arrives
/// and propagate any transport or decoding failure to the caller.
pub trait ChatClient {
    /// Submit an assembled prompt and return the raw reply
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails in transport, the endpoint
    /// answers with a non-success status, or the reply carries no choices
    fn complete(&self, prompt: &FewShotPrompt) -> Result<ChatOutcome>;
}

/// Chat client speaking the OpenAI `chat/completions` wire format
pub struct OpenAiClient {
    http: HttpClient,
    endpoint: String,
    api_key: String,
    options: ChatOptions,
}

impl OpenAiClient {
    /// Build a client against the default OpenAI endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed
    pub fn new(api_key: impl Into<String>, options: ChatOptions) -> Result<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT, api_key, options)
    }

    /// Build a client against a custom completion endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        options: ChatOptions,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| PipelineError::Api {
                operation: "client construction",
                source: e,
            })?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            options,
        })
    }

    fn payload(&self, prompt: &FewShotPrompt) -> Value {
        let user_content: Vec<Value> = prompt.user_content.iter().map(content_value).collect();
        json!({
            "model": self.options.model,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": user_content },
            ],
            "max_tokens": self.options.max_tokens,
            "temperature": self.options.temperature,
        })
    }
}

impl ChatClient for OpenAiClient {
    fn complete(&self, prompt: &FewShotPrompt) -> Result<ChatOutcome> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.payload(prompt))
            .send()
            .map_err(|e| PipelineError::Api {
                operation: "request",
                source: e,
            })?
            .error_for_status()
            .map_err(|e| PipelineError::Api {
                operation: "status check",
                source: e,
            })?;

        let body: ChatCompletionResponse = response.json().map_err(|e| PipelineError::Api {
            operation: "response decoding",
            source: e,
        })?;

        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                crate::io::error::malformed_response("completion carried no choices")
            })?;

        Ok(ChatOutcome {
            text,
            total_tokens: body.usage.map_or(0, |usage| usage.total_tokens),
        })
    }
}

fn content_value(block: &ContentBlock) -> Value {
    match block {
        ContentBlock::Text(text) => json!({ "type": "text", "text": text }),
        ContentBlock::Image {
            data_b64,
            mime,
            detail,
        } => json!({
            "type": "image_url",
            "image_url": {
                "url": format!("data:{mime};base64,{data_b64}"),
                "detail": detail.as_str(),
            }
        }),
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: u64,
}

/// Canned-response client for tests, served in FIFO order
#[derive(Default)]
pub struct MockChatClient {
    responses: Mutex<VecDeque<ChatOutcome>>,
}

impl MockChatClient {
    /// Create a mock with no queued responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply text with an arbitrary token count
    pub fn push_response(&self, text: impl Into<String>, total_tokens: u64) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(ChatOutcome {
                text: text.into(),
                total_tokens,
            });
        }
    }
}

impl ChatClient for MockChatClient {
    fn complete(&self, _prompt: &FewShotPrompt) -> Result<ChatOutcome> {
        self.responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .ok_or_else(|| {
                crate::io::error::malformed_response("mock client has no queued response")
            })
    }
}
