use super::{build_feed_reader, build_provider, connect_store, load_config};
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use filmlog_api::{build_router, shutdown_signal, AppState};
use filmlog_config::PathManager;
use filmlog_core::IngestOrchestrator;
use filmlog_sources::FeedSource;

pub async fn run_serve(paths: &PathManager, host: Option<String>, port: Option<u16>, output: &Output) -> Result<()> {
    let mut config = load_config(paths, true)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let store = connect_store(&config, false).await?;
    let provider = build_provider(&config)?;
    let orchestrator = IngestOrchestrator::new(build_feed_reader()?, store, provider.clone());
    let state = AppState::new(orchestrator, provider, FeedSource::parse(&config.feed.location));

    let app = build_router(state, &config.server).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", addr))?;

    tracing::info!(operation = "serve", addr = %addr, "Server listening");
    output.success(format!("Listening on http://{}", addr));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}
