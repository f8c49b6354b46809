mod api;
mod middleware;

use std::sync::Arc;

use kolscope_generation::{GenerationService, OpenAiGenerator};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = kolscope_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let generator = OpenAiGenerator::new(&config.generation)?;
    if !generator.is_configured() {
        tracing::warn!("OPENAI_API_KEY not set; generation endpoints will return 500");
    }

    let shutdown = CancellationToken::new();
    let app = build_app(AppState {
        generator: Arc::new(generator),
        shutdown: shutdown.clone(),
    });

    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        model = %config.generation.model,
        "starting kolscope-server"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, cancelling in-flight generation requests");
    shutdown.cancel();
}
