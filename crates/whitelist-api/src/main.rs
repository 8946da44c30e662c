//! Whitelist API server entry point.

use std::error::Error;

use tracing::info;

use whitelist_api::config::Config;
use whitelist_api::routes;
use whitelist_api::state::AppState;
use whitelist_api::telemetry;
use whitelist_store::SqliteDatabase;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    info!("Starting whitelist API server");

    let database = SqliteDatabase::connect(&config.database_url).await?;
    let app_state = AppState::from_config(&config, &database)?;
    info!(
        admins = config.admin_ids.len(),
        profile_verification = app_state.verifier.is_some(),
        webhook = config.notify_webhook_url.is_some(),
        "collaborators configured"
    );

    let app = routes::app(app_state);

    let addr = config.socket_addr()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry.shutdown()?;
    Ok(())
}
