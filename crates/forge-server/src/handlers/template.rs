//! Starter template selection
//!
//! Asks the model whether the user's idea is a React or Node project, then
//! hands back the scaffold prompts and the starter artifact for the UI.

use axum::{extract::State, http::StatusCode, Json};
use forge_core::template;
use forge_types::{ChatMessage, TemplateKind};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TemplateRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub template: String,
    /// Prompts to prepend to the model conversation.
    pub prompts: Vec<String>,
    /// Starter artifacts for the UI to parse and display.
    pub ui_prompts: Vec<String>,
}

pub async fn select(
    State(state): State<AppState>,
    Json(req): Json<TemplateRequest>,
) -> Result<Json<TemplateResponse>, StatusCode> {
    let prompt = req.prompt.trim();
    if prompt.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let messages = [
        ChatMessage::user(prompt),
        ChatMessage::user(template::CLASSIFIER_PROMPT),
    ];
    let answer = match state
        .completion
        .complete(&state.config.default_model, &messages)
        .await
    {
        Ok(answer) => answer,
        Err(e) => {
            tracing::error!("template classification failed: {}", e);
            return Err(StatusCode::BAD_GATEWAY);
        }
    };

    let kind = TemplateKind::detect(&answer);
    Ok(Json(TemplateResponse {
        template: kind.as_str().to_string(),
        prompts: template::scaffold_prompts(kind),
        ui_prompts: vec![template::starter(kind).to_string()],
    }))
}
