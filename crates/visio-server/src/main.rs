//! Visio server binary.

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use visio_db::DbPool;
use visio_server::config::{Config, ConfigError, DatabaseConfig, LoggingConfig};
use visio_server::{app, background, AppState};
use visio_voice::{ElevenLabsClient, FulfillmentSettings, VoiceError};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("status database: {0}")]
    Pool(#[from] visio_db::PoolError),
    #[error("status database connection: {0}")]
    Connection(#[from] r2d2::Error),
    #[error("migrations: {0}")]
    Migration(#[from] visio_db::MigrationError),
    #[error("[voice] section: {0}")]
    Voice(#[from] VoiceError),
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("server: {0}")]
    Serve(std::io::Error),
}

/// First CLI argument, then `VISIO_CONFIG_PATH`, then `config.toml`.
fn resolve_config_path() -> (String, &'static str) {
    let non_blank = |value: &String| !value.trim().is_empty();

    if let Some(path) = std::env::args().nth(1).filter(non_blank) {
        return (path, "cli-arg");
    }
    if let Some(path) = std::env::var("VISIO_CONFIG_PATH").ok().filter(non_blank) {
        return (path, "env-var");
    }
    (DEFAULT_CONFIG_PATH.to_string(), "default")
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn open_database(database: &DatabaseConfig) -> Result<DbPool, StartupError> {
    let pool = visio_db::create_pool(&database.path, database.runtime_settings())?;
    let conn = pool.get()?;
    let applied = visio_db::run_migrations(&conn)?;
    if applied > 0 {
        tracing::info!(count = applied, path = %database.path, "applied database migrations");
    }
    Ok(pool)
}

fn build_state(config: &Config, pool: DbPool) -> Result<AppState, StartupError> {
    if config.voice.api_key.is_empty() {
        tracing::warn!("voice.api_key is empty; the provider will reject synthesis requests");
    }
    tracing::info!(voice = ?config.voice, "text-to-speech provider configured");

    let client = ElevenLabsClient::new(config.voice.clone())?;
    let settings = FulfillmentSettings::from(&config.voice);
    let (state, worker) = AppState::new(pool, Arc::new(client), settings);
    background::spawn_fulfillment_worker(worker);

    if config.server.seed_greeting {
        background::seed_greeting(&state);
    }
    Ok(state)
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let (config_path, config_source) = resolve_config_path();
    let config = visio_server::config::load_config(Some(&config_path))?;

    init_tracing(&config.logging);
    tracing::info!(source = config_source, path = %config_path, "loaded configuration");

    let pool = open_database(&config.database)?;
    let state = build_state(&config, pool)?;

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!(%addr, "visio server listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("visio server shut down");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
