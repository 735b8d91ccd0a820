use super::{LlmClient, types::*};
use crate::{Error, Result, config::LlmConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Client for the native Ollama chat API (`POST /api/chat`).
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    model: String,
    message: ChatMessage,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaErrorBody {
    error: String,
}

impl OllamaClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

impl From<OllamaChatResponse> for ChatCompletionResponse {
    fn from(response: OllamaChatResponse) -> Self {
        let usage = match (response.prompt_eval_count, response.eval_count) {
            (Some(prompt_tokens), Some(completion_tokens)) => Some(Usage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens.saturating_add(completion_tokens),
            }),
            _ => None,
        };

        Self {
            model: response.model,
            message: response.message,
            finish_reason: response.done_reason,
            usage,
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let url = self.chat_url();
        debug!(
            "Posting {} messages for model {} to {}",
            request.messages.len(),
            request.model,
            url
        );

        let body = OllamaChatRequest {
            model: &request.model,
            messages: &request.messages,
            stream: false,
        };

        let response = self.http.post(&url).json(&body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            // Ollama reports failures as {"error": "..."}; fall back to the raw body.
            let detail = serde_json::from_slice::<OllamaErrorBody>(&bytes)
                .map(|body| body.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(Error::llm(format!(
                "{} (status code: {})",
                detail,
                status.as_u16()
            )));
        }

        let chat_response: OllamaChatResponse = serde_json::from_slice(&bytes)?;
        Ok(chat_response.into())
    }
}
