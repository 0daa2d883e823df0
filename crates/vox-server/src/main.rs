//! Voxrelay server binary.
//!
//! Starts an axum HTTP server with structured logging, the wired-up request
//! pipeline, and graceful shutdown on SIGTERM/SIGINT. Shutdown flips a
//! cancellation channel so in-flight polling loops stop promptly.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use vox_pipeline::{HttpAnswerClient, HttpSynthClient, HttpTranscribeClient, Orchestrator};
use vox_server::config::{self, Config};
use vox_server::{app, AppState};
use vox_store::HttpObjectStore;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("VOX_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

fn build_orchestrator(config: &Config) -> Orchestrator {
    let store = Arc::new(HttpObjectStore::new(config.store.clone()));
    let transcriber = Arc::new(HttpTranscribeClient::new(
        &config.transcribe.endpoint,
        &config.transcribe.api_key,
    ));
    let generator = Arc::new(HttpAnswerClient::new(
        &config.generate.endpoint,
        &config.generate.api_key,
        &config.pipeline.model_id,
    ));
    let synthesizer = Arc::new(HttpSynthClient::new(
        &config.synthesize.endpoint,
        &config.synthesize.api_key,
    ));

    Orchestrator::new(
        store,
        transcriber,
        generator,
        synthesizer,
        config.pipeline.clone(),
    )
}

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));

    // Load configuration
    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration — the server cannot start without valid config");

    // Initialize tracing
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let state = AppState {
        orchestrator: Arc::new(build_orchestrator(&config)),
        cancel_rx,
    };

    let app = app(state);
    let addr = SocketAddr::new(config.server.host, config.server.port);

    tracing::info!(%addr, "starting vox server");

    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind to address — is another process using this port?");

    // Serve with graceful shutdown; flipping the cancellation channel lets
    // in-flight requests stop polling instead of blocking shutdown.
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = cancel_tx.send(true);
        })
        .await
        .expect("server error");

    tracing::info!("vox server shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
