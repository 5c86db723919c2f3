//! Chat completion passthrough
//!
//! Appends the artifact-format system prompt to the conversation and
//! forwards it to the completion port. Parsing the returned artifact is
//! the caller's choice: the generation endpoints do it server-side.

use axum::{extract::State, http::StatusCode, Json};
use forge_core::template;
use forge_types::ChatMessage;
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

pub async fn complete(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, StatusCode> {
    if req.messages.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut messages = req.messages;
    messages.push(ChatMessage::user(template::system_prompt()));

    let model = req
        .model
        .unwrap_or_else(|| state.config.default_model.clone());

    match state.completion.complete(&model, &messages).await {
        Ok(response) => Ok(Json(ChatResponse { response })),
        Err(e) => {
            tracing::error!("chat completion failed: {}", e);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}
