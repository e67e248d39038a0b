use std::sync::Arc;

use anyhow::Context;
use common::storage::FilesystemMediaStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gallery_server::config::AppConfig;
use gallery_server::state::AppState;
use gallery_server::trim::FfmpegTrimmer;
use gallery_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database)
        .await
        .context("Failed to connect to database")?;
    seed::ensure_indexes(&db)
        .await
        .context("Failed to create indexes")?;

    let store = FilesystemMediaStore::new(config.storage.upload_dir.clone())
        .await
        .context("Failed to initialize upload directory")?;
    info!(upload_dir = %config.storage.upload_dir.display(), "Media store ready");

    let trimmer = FfmpegTrimmer::new(&config.trimmer.ffmpeg_bin);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState {
        db,
        config: Arc::new(config),
        store: Arc::new(store),
        trimmer: Arc::new(trimmer),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{addr}");
    info!("API docs at http://{addr}/scalar");

    axum::serve(listener, app).await?;
    Ok(())
}
