use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storyreel_api::config::{ProviderConfig, ServerConfig};
use storyreel_api::router::build_app_router;
use storyreel_api::state::AppState;
use storyreel_pipeline::{AssetManager, FfmpegCompositor, PipelineService, ProviderSet};
use storyreel_providers::{ElevenLabsSpeech, FalAnimator, GeminiStoryboard, YtDlpResolver};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storyreel_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let provider_config = ProviderConfig::from_env();

    // --- Providers ---
    let providers = ProviderSet {
        story: Arc::new(GeminiStoryboard::new(provider_config.gemini_api_key)),
        speech: Arc::new(ElevenLabsSpeech::new(provider_config.elevenlabs_api_key)),
        animator: Arc::new(FalAnimator::new(provider_config.fal_key)),
        music: Arc::new(YtDlpResolver::new()),
        compositor: Arc::new(FfmpegCompositor),
    };

    // --- Pipeline service ---
    let assets = AssetManager::new(config.upload_dir.clone(), config.output_dir.clone());
    let service = Arc::new(PipelineService::new(assets, providers));
    tracing::info!("Pipeline service started");

    // --- App state ---
    let state = AppState {
        service: Arc::clone(&service),
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, waiting for in-flight jobs");
    service.shutdown().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
