//! Forge Server
//!
//! Thin HTTP service over the build-plan compiler: starter template
//! selection, chat passthrough to the generative model, and generation
//! persistence. All tree algorithms live in forge-core; handlers only
//! shuttle envelopes in and out of the store.

mod config;
mod handlers;
mod services;
mod storage;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use forge_core::{CompletionClient, GenerationStore};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use config::ServerConfig;
use services::GeminiClient;
use storage::FileStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<dyn GenerationStore>,
    pub completion: Arc<dyn CompletionClient>,
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Forge server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = ServerConfig::load(Path::new(".")).context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, data_dir={}",
        config.bind_address,
        config.data_dir.display()
    );

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;

    let store: Arc<dyn GenerationStore> =
        Arc::new(FileStore::new(&config.data_dir).context("Failed to open generation store")?);

    let api_key = config.api_key.clone().unwrap_or_default();
    let completion: Arc<dyn CompletionClient> =
        Arc::new(GeminiClient::new(config.completion_url.clone(), api_key));

    let state = AppState {
        config: Arc::new(config),
        store,
        completion,
    };

    let app = Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/template", post(handlers::template::select))
        .route("/chat", post(handlers::chat::complete))
        .route(
            "/generations",
            get(handlers::generations::list).post(handlers::generations::create),
        )
        .route(
            "/generations/:id",
            get(handlers::generations::get).patch(handlers::generations::edit),
        )
        .route("/generations/:id/steps", post(handlers::generations::append))
        .route("/generations/:id/mount", get(handlers::generations::mount))
}
