//! CLI entrypoint for empower-chat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use empower_application::{
    ConversationLogger, FeedbackController, NoConversationLogger, RequestCoordinator,
    RequestTimeout, SessionStore,
};
use empower_infrastructure::{ConfigLoader, FileConfig, HttpChatGateway, JsonlConversationLogger};
use empower_presentation::{Cli, TuiApp};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "empower-chat.log";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Load configuration
    let loaded = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    };
    let config: FileConfig = loaded
        .map_err(|e| *e)
        .context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    // The terminal belongs to the TUI, so diagnostics go to a file.
    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    let _log_guard = init_file_logging(&log_path, cli.verbose)?;

    info!("Starting empower-chat against {}", config.api.base_url);

    // === Dependency Injection ===
    let mut client_config = config.to_client_config();
    if cli.no_timeout {
        client_config = client_config.with_timeout(RequestTimeout::Unbounded);
    }
    let timeout = client_config.timeout;
    let base_url = client_config.base_url.clone();

    let gateway =
        Arc::new(HttpChatGateway::new(client_config).context("Failed to build HTTP client")?);
    let logger = conversation_logger(&config);

    let store = SessionStore::new();
    let coordinator = Arc::new(
        RequestCoordinator::new(Arc::clone(&gateway), store.clone())
            .with_timeout(timeout)
            .with_logger(Arc::clone(&logger)),
    );
    let controller = Arc::new(
        FeedbackController::new(gateway, store)
            .with_timeout(timeout)
            .with_logger(logger),
    );

    let mut app = TuiApp::new(coordinator, controller)
        .with_base_url(base_url)
        .with_tick(Duration::from_millis(config.tui.tick_millis));
    app.run().await.context("Terminal UI failed")?;

    info!("empower-chat exited");
    Ok(())
}

fn default_log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("empower-chat")
        .join(LOG_FILE_NAME)
}

fn verbosity_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    }
}

/// Send tracing output to `path`; the returned guard flushes on drop.
fn init_file_logging(path: &Path, verbose: u8) -> Result<WorkerGuard> {
    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| LOG_FILE_NAME.into());

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(verbosity_filter(verbose))
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();

    Ok(guard)
}

fn conversation_logger(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    let Some(path) = config.logging.conversation_log.as_deref() else {
        return Arc::new(NoConversationLogger);
    };
    match JsonlConversationLogger::new(path) {
        Some(logger) => {
            info!("Conversation log: {}", logger.path().display());
            Arc::new(logger)
        }
        None => {
            warn!("Conversation log disabled: cannot open {}", path);
            Arc::new(NoConversationLogger)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path_is_named() {
        let path = default_log_path();
        assert!(path.ends_with("empower-chat/empower-chat.log"));
    }

    #[test]
    fn test_conversation_log_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("log.jsonl");
        let mut config = FileConfig::default();
        config.logging.conversation_log = Some(path.display().to_string());
        let _ = conversation_logger(&config);
        assert!(path.exists());
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(verbosity_filter(0).to_string(), "warn");
        assert_eq!(verbosity_filter(2).to_string(), "debug");
        assert_eq!(verbosity_filter(7).to_string(), "trace");
    }
}
