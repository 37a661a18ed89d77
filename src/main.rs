use tracing_subscriber::EnvFilter;

use sheger_land_api::{app, config, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = config::config();
    tracing::info!(environment = ?cfg.environment, "starting sheger-land-api");

    database::run_migrations().await?;

    let addr = format!("0.0.0.0:{}", cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");
    axum::serve(listener, app()).await?;

    Ok(())
}
