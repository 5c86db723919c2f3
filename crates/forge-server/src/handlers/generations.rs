//! Generation handlers
//!
//! Thin CRUD over the build session: create a generation from model
//! output, append later rounds, apply editor changes, and project the
//! mount descriptor. All tree work happens in forge-core.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use forge_core::{ApplyReport, BuildSession, ForgeError};
use forge_types::{Generation, MountTree};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateGenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub model_name: Option<String>,
    /// Raw model output containing the build artifact.
    pub output: String,
    /// Starter artifact applied before the model output on fresh sessions.
    #[serde(default)]
    pub template: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SynthesisResponse {
    pub generation: Generation,
    pub report: ApplyReport,
}

#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub generation: Generation,
}

#[derive(Debug, Serialize)]
pub struct GenerationListResponse {
    pub generations: Vec<Generation>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateGenerationRequest>,
) -> Result<(StatusCode, Json<SynthesisResponse>), StatusCode> {
    let mut session = BuildSession::new();
    if let Some(template) = &req.template {
        session.ingest(template);
    }
    session.ingest(&req.output);
    let report = session.synthesize();

    let model_name = req
        .model_name
        .unwrap_or_else(|| state.config.default_model.clone());
    let mut generation =
        Generation::new(Uuid::new_v4().to_string(), req.prompt, model_name, req.output);
    session.write_into(&mut generation);

    match state.store.create(&generation).await {
        Ok(()) => Ok((
            StatusCode::CREATED,
            Json(SynthesisResponse { generation, report }),
        )),
        Err(e) => {
            tracing::error!("failed to store generation: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<GenerationListResponse>, StatusCode> {
    match state.store.list().await {
        Ok(generations) => Ok(Json(GenerationListResponse { generations })),
        Err(e) => {
            tracing::error!("failed to list generations: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GenerationResponse>, StatusCode> {
    match state.store.get(&id).await {
        Ok(Some(generation)) => Ok(Json(GenerationResponse { generation })),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("failed to get generation: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AppendOutputRequest {
    /// Raw model output from a follow-up round.
    pub output: String,
}

/// Apply another round of model output to an existing generation.
pub async fn append(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AppendOutputRequest>,
) -> Result<Json<SynthesisResponse>, StatusCode> {
    let mut generation = match state.store.get(&id).await {
        Ok(Some(generation)) => generation,
        Ok(None) => return Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("failed to get generation: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut session = BuildSession::from_generation(&generation);
    session.ingest(&req.output);
    let report = session.synthesize();

    generation.output.push('\n');
    generation.output.push_str(&req.output);
    session.write_into(&mut generation);

    match state.store.update(&generation).await {
        Ok(()) => Ok(Json(SynthesisResponse { generation, report })),
        Err(e) => {
            tracing::error!("failed to update generation: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EditFileRequest {
    pub path: String,
    pub content: String,
}

/// Editor round-trip: write one file's content and latch it as edited.
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EditFileRequest>,
) -> Result<Json<GenerationResponse>, StatusCode> {
    let mut generation = match state.store.get(&id).await {
        Ok(Some(generation)) => generation,
        Ok(None) => return Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("failed to get generation: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut session = BuildSession::from_generation(&generation);
    if let Err(e) = session.edit_file(&req.path, &req.content) {
        return Err(match e {
            ForgeError::FileNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        });
    }

    generation.selected_path = Some(req.path);
    session.write_into(&mut generation);

    match state.store.update(&generation).await {
        Ok(()) => Ok(Json(GenerationResponse { generation })),
        Err(e) => {
            tracing::error!("failed to update generation: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Project the generation's tree for the sandbox runtime.
pub async fn mount(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MountTree>, StatusCode> {
    match state.store.get(&id).await {
        Ok(Some(generation)) => Ok(Json(forge_core::mount::project(&generation.tree))),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("failed to get generation: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
