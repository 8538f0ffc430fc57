use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use mydesk::logging::init_tracing;
use mydesk::metrics::{init_metrics, metrics_app};
use mydesk::mydesk_config::AppConfig;
use mydesk::router::init_router;
use mydesk::state::init_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env();
    let _log_guard = init_tracing(&config.observability);

    let metrics_handle =
        init_metrics(&config.observability).context("failed to install metrics recorder")?;

    let state = init_app_state(&config)
        .await
        .context("failed to initialize application state")?;

    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
    }

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    info!(%address, "server listening");
    info!("API docs available at http://{address}/scalar");
    axum::serve(listener, app).await?;

    Ok(())
}
