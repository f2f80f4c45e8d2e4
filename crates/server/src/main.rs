//! LifeConnect alert backend

use std::path::PathBuf;

use clap::Parser;
use lifeconnect_infra_common::logging::{log_welcome, parse_log_level, setup_logging, LoggingConfig};
use lifeconnect_server::{AppConfig, ServerConfig};
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(author, version, about = "LifeConnect emergency alert backend", long_about = None)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides configuration
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Debug logging with span open/close events
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn logging_config(&self, server: &ServerConfig) -> anyhow::Result<LoggingConfig> {
        let level = if self.verbose {
            Level::DEBUG
        } else {
            parse_log_level(self.log_level.as_deref().unwrap_or(&server.log_level))?
        };

        let mut logging = LoggingConfig::new(level, env!("CARGO_PKG_NAME"));
        if self.json_logs || server.json_logs {
            logging = logging.with_json();
        }
        if self.verbose {
            logging = logging.with_spans();
        }
        Ok(logging)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal outside development.
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;

    if let Some(bind) = args.bind.clone() {
        config.server.bind_address = bind;
    }

    let logging = args.logging_config(&config.server)?;
    setup_logging(logging.clone())?;

    log_welcome(&logging.app_name, env!("CARGO_PKG_VERSION"));
    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Ignoring unreadable .env file: {}", e),
    }

    lifeconnect_server::serve(config, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(flags: &[&str]) -> Args {
        Args::parse_from(std::iter::once("lifeconnect-server").chain(flags.iter().copied()))
    }

    #[test]
    fn test_default_logging_follows_configuration() {
        let logging = args(&[]).logging_config(&ServerConfig::default()).unwrap();

        assert_eq!(logging.level, Level::INFO);
        assert!(!logging.json);
        assert!(!logging.log_spans);
    }

    #[test]
    fn test_verbose_enables_debug_and_spans() {
        let logging = args(&["--verbose"]).logging_config(&ServerConfig::default()).unwrap();

        assert_eq!(logging.level, Level::DEBUG);
        assert!(logging.log_spans);
    }

    #[test]
    fn test_cli_level_and_json_override() {
        let logging = args(&["--log-level", "warn", "--json-logs"])
            .logging_config(&ServerConfig::default())
            .unwrap();

        assert_eq!(logging.level, Level::WARN);
        assert!(logging.json);
        assert!(args(&["--log-level", "loud"]).logging_config(&ServerConfig::default()).is_err());
    }
}
