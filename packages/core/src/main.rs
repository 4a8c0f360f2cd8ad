use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;

use alerting_config::api::{self, AppState};
use alerting_config::cli::Cli;
use alerting_config::config::Config;
use alerting_config::error::AppError;
use alerting_config::logging::init_logging;
use alerting_config::metrics::AppMetrics;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    if let Err(err) = run(Cli::parse()).await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::from_env()
        .and_then(|config| config.with_cli(&cli))
        .map_err(AppError::Config)?;

    tracing::info!("Service starting with config: {:?}", config);

    let metrics = AppMetrics::new().map_err(|err| AppError::Internal(err.to_string()))?;
    let app = api::router(AppState::new(Arc::new(metrics)), config.max_body_bytes);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .map_err(|err| AppError::Config(format!("cannot bind {}: {}", config.listen_addr, err)))?;

    tracing::info!("Listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(err.to_string()))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutdown signal received. Stopping server.");
    }
}
