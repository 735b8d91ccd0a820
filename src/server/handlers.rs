use super::types::{ErrorResponse, InferenceResponse};
use crate::{
    Error,
    llm::{ChatCompletionRequest, ChatMessage, LlmClient},
};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

pub const MISSING_PROMPT: &str = "Missing 'prompt' field";
pub const EMPTY_PROMPT: &str = "Prompt cannot be empty";

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LlmClient>,
    pub model: String,
}

impl AppState {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }
}

fn error_response(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

fn server_error(e: Error) -> ApiError {
    error!("Error during inference: {}", e);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// JSON values that count as "no prompt": null, false, zero and empty
/// strings or containers.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Pulls a usable prompt out of the request body.
///
/// Only an object body can carry a prompt. Arrays and strings that do not
/// mention `prompt` are treated as missing it; any other non-object body, and
/// a non-blank prompt that is not a string, is an unexpected failure.
fn extract_prompt(data: &Value) -> Result<&str, ApiError> {
    let fields = match data {
        Value::Object(fields) => fields,
        Value::Array(items) if !items.iter().any(|item| item == "prompt") => {
            return Err(error_response(StatusCode::BAD_REQUEST, MISSING_PROMPT));
        }
        Value::String(text) if !text.contains("prompt") => {
            return Err(error_response(StatusCode::BAD_REQUEST, MISSING_PROMPT));
        }
        other => {
            return Err(server_error(Error::invalid_request(format!(
                "expected a JSON object, got {}",
                other
            ))));
        }
    };

    match fields.get("prompt") {
        None => Err(error_response(StatusCode::BAD_REQUEST, MISSING_PROMPT)),
        Some(value) if is_blank(value) => {
            Err(error_response(StatusCode::BAD_REQUEST, EMPTY_PROMPT))
        }
        Some(Value::String(prompt)) => Ok(prompt.as_str()),
        Some(other) => Err(server_error(Error::invalid_prompt(format!(
            "expected a string, got {}",
            other
        )))),
    }
}

pub async fn inference(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<InferenceResponse>, ApiError> {
    let Json(data) = payload.map_err(|rejection| {
        error!("Error during inference: {}", rejection.body_text());
        error_response(StatusCode::INTERNAL_SERVER_ERROR, rejection.body_text())
    })?;
    info!("Received data: {}", data);

    let prompt = extract_prompt(&data)?;

    let request = ChatCompletionRequest::new(&state.model, vec![ChatMessage::user(prompt)]);
    match state.llm.create_chat_completion(request).await {
        Ok(response) => {
            info!("Model's response: {:?}", response);
            Ok(Json(InferenceResponse {
                response: response.content().to_string(),
            }))
        }
        Err(e) => Err(server_error(e)),
    }
}
