use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use ilog::config::{self, Settings};
use ilog::logging::{self, LogWriter};
use ilog::server::{self, UiLogState};

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics about the logger itself go to stderr
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ilog=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::from_env()?;
    config::ensure_directories(&settings)?;

    let logger_config = settings.logger_config();
    let program = logger_config.program_name.clone();
    let writer = Arc::new(LogWriter::open(logger_config).context("Failed to open UI log file")?);

    if settings.retention_days > 0 {
        match logging::cleanup_old_logs(&settings.ui_log_dir(), &program, settings.retention_days)
        {
            Ok(count) if count > 0 => tracing::info!("Cleaned up {} old log files", count),
            Ok(_) => {}
            Err(e) => tracing::warn!("Log cleanup failed: {:#}", e),
        }
    }

    if let Some(path) = writer.current_path() {
        tracing::info!("Logging to: {}", path.display());
    }
    tracing::info!("UI logging is enabled: {}", settings.ui_logging_enabled);
    ilog::mandatory!(writer, "ilog started at level {}", writer.level());

    let state = UiLogState::new(Arc::clone(&writer), settings.ui_logging_enabled);
    let handle = server::start(SocketAddr::from(([127, 0, 0, 1], settings.port)), state).await?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    handle.shutdown()?;
    ilog::mandatory!(writer, "ilog stopping");
    writer.shutdown();
    Ok(())
}
