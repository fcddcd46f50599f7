//! Server startup and graceful shutdown

use anyhow::Result;
use axum::Router;
use slidereel_core::Config;

/// Start the server with graceful shutdown
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port());
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        max_images = config.max_images(),
        max_file_mb = config.max_file_size_bytes() / 1024 / 1024,
        max_request_mb = config.max_request_size_bytes() / 1024 / 1024,
        extensions = %config.allowed_extensions().join(","),
        total_duration_secs = config.total_duration_secs(),
        output_fps = config.output_fps(),
        video_codec = %config.video_codec(),
        ffmpeg_path = %config.ffmpeg_path(),
        max_concurrent_encodes = config.max_concurrent_encodes(),
        work_dir = %config.work_dir(),
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Signal handler for graceful shutdown
///
/// Listens for Ctrl+C (SIGINT) and SIGTERM. In-flight encodes finish before the
/// server exits.
///
/// # Panics
/// Panics if a signal handler cannot be installed (unrecoverable system error).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
