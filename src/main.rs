//! FitPro Insights — Binary Entrypoint
//! Runs the ETL pipeline over the configured datasets, then boots the Axum
//! HTTP server over the processed results.

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fitpro_insights::api::{create_router, AppState};
use fitpro_insights::config::PipelineConfig;
use fitpro_insights::pipeline::DataPipeline;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fitpro_insights=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = PipelineConfig::load().context("loading pipeline configuration")?;
    tracing::info!(datasets_dir = %config.datasets_dir.display(), "starting pipeline");

    let mut pipeline = DataPipeline::new(&config);
    pipeline.run().context("running data pipeline")?;

    let state = AppState::new(pipeline.into_results());
    let app = create_router(state);

    let port: u16 = std::env::var("FITPRO_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("binding to port {port}"))?;
    tracing::info!(%port, "serving processed data");

    axum::serve(listener, app).await.context("serving HTTP")?;
    Ok(())
}
