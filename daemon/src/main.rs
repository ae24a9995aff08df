//! Heritage daemon: entry point for the monument voting service.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use heritage_rpc::{AppState, RpcServer};
use heritage_store_lmdb::{
    check_data_dir, check_integrity, IntegrityReport, LmdbEnvironment, Migrator, MIN_MAX_DBS,
};
use heritage_utils::{init_logging, LogFormat};
use tokio::signal;

use crate::config::HeritageConfig;

#[derive(Parser)]
#[command(name = "heritage-daemon", about = "Heritage monument voting service")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "HERITAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the LMDB environment.
    #[arg(long, env = "HERITAGE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// HTTP API port.
    #[arg(long, env = "HERITAGE_HTTP_PORT")]
    http_port: Option<u16>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "HERITAGE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "HERITAGE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Moderator key expected in the X-Admin-Key header.
    #[arg(long, env = "HERITAGE_ADMIN_KEY", hide_env_values = true)]
    admin_key: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Open the store and serve the HTTP API (default).
    Serve,
    /// Open the store, run migrations and the integrity check, then exit.
    Check,
}

impl Cli {
    /// File (or default) configuration with CLI/env values applied on top.
    fn resolve_config(&self) -> anyhow::Result<HeritageConfig> {
        let mut config = match &self.config {
            Some(path) => HeritageConfig::from_toml_file(path)?,
            None => HeritageConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(port) = self.http_port {
            config.http_port = port;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(key) = &self.admin_key {
            config.admin_key = Some(key.clone());
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_logging(config.log_format, &config.log_level)?;

    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Check => check(&config),
    }
}

/// Open the environment, bring the schema up to date and verify the counters.
fn open_store(config: &HeritageConfig) -> anyhow::Result<(LmdbEnvironment, IntegrityReport)> {
    if let Err(msg) = check_data_dir(&config.data_dir) {
        tracing::warn!("{msg}");
    }
    let env = LmdbEnvironment::open(&config.data_dir, MIN_MAX_DBS, config.map_size_bytes())
        .with_context(|| format!("opening LMDB at {}", config.data_dir.display()))?;
    Migrator::run(&env).context("running schema migrations")?;

    let report = check_integrity(&env).context("running integrity check")?;
    if report.is_healthy() {
        tracing::info!(
            databases = report.databases_checked,
            entries = report.total_entries,
            monuments = report.monuments_checked,
            "integrity check passed"
        );
    } else {
        for error in &report.errors {
            tracing::warn!(%error, "integrity check");
        }
    }
    Ok((env, report))
}

fn check(config: &HeritageConfig) -> anyhow::Result<()> {
    let (_env, report) = open_store(config)?;
    if !report.is_healthy() {
        anyhow::bail!("integrity check found {} problem(s)", report.errors.len());
    }
    Ok(())
}

async fn serve(config: HeritageConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let (env, _report) = open_store(&config)?;

    tracing::info!(
        data_dir = %config.data_dir.display(),
        %addr,
        default_city = %config.default_city,
        admin_routes = config.admin_key.is_some(),
        public_proposals = config.public_proposals,
        "starting heritage daemon"
    );

    let state = AppState::new(Arc::new(env), config.rpc_config());
    RpcServer::new(addr, Arc::new(state))
        .start(shutdown_signal())
        .await?;

    tracing::info!("heritage daemon exited cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
