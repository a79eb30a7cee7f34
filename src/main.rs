use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;

use voxrelay::infrastructure::observability::{TracingConfig, init_tracing};
use voxrelay::presentation::{Environment, ScaffoldConfig, Settings, build_app_state, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(
        TracingConfig::from_settings(&settings.logging, environment),
        settings.server.port,
    );

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server.host / server.port")?;

    let scaffold_config = ScaffoldConfig::default();
    let scaffold = scaffold_config.enabled;
    let state = tokio::task::spawn_blocking(move || build_app_state(settings, scaffold_config))
        .await
        .context("State initialization task failed")?
        .context("Failed to initialize application state")?;

    tracing::info!(
        upload_dir = %state.settings.storage.upload_dir,
        output_dir = %state.settings.storage.output_dir,
        transcription = ?state.settings.transcription.provider,
        chat_model = %state.settings.llm.chat_model,
        scaffold,
        "Pipeline ready"
    );

    let router = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
