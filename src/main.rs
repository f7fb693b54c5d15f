use std::process::ExitCode;

use stripe_saas::app::{self, StartupError};
use stripe_saas::config::{AppConfig, ConfigError};
use stripe_saas::telemetry::{self, LogFormat};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    telemetry::init_tracing(
        &config.server.log_level,
        LogFormat::from_flag(config.features.json_logs),
    );

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Server stopped with an error");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

async fn run(config: AppConfig) -> Result<(), RunError> {
    config
        .validate()
        .map_err(|e| RunError::Config(ConfigError::from(e)))?;

    let state = app::build_state(&config).await?;
    let validator = app::build_validator(&config)?;
    let router = app::router(state, validator, &config.server);

    let addr = config
        .server
        .socket_addr()
        .map_err(|e| RunError::Config(ConfigError::from(e)))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        storage = if config.database.is_some() { "postgres" } else { "memory" },
        "Listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
