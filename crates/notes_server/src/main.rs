//! `notes-server` entry point.
//!
//! Startup order: configuration, logging, database migration, listener.
//! The process stops accepting connections on Ctrl-C and exits once
//! in-flight requests finish.

mod config;

use anyhow::{anyhow, Context};
use clap::Parser;
use config::ServerConfig;
use log::{info, warn};
use notes_api::NoteStore;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    notes_core::init_logging(config.effective_log_level(), config.log_dir.as_deref())
        .map_err(|err| anyhow!(err))
        .context("logging init failed")?;

    let store = NoteStore::new(&config.db_path);
    store
        .prepare()
        .with_context(|| format!("cannot open notes database `{}`", config.db_path.display()))?;

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("cannot bind {}", config.bind))?;
    let addr = listener.local_addr()?;
    info!(
        "event=server_start module=server status=ok addr={addr} db_path={} core_version={}",
        store.db_path().display(),
        notes_core::core_version()
    );

    notes_api::serve(listener, store, shutdown_signal())
        .await
        .context("server terminated")?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=server_stop module=server status=error error=ctrl_c_unavailable detail={err}");
        std::future::pending::<()>().await;
    }
}
