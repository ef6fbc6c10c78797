//! Command-line and environment configuration.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// HTTP JSON service for notes.
#[derive(Parser, Debug, Clone)]
#[command(name = "notes-server")]
#[command(version, about, long_about = None)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[arg(long, env = "NOTES_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// SQLite database file; created and migrated on startup.
    #[arg(long, env = "NOTES_DB_PATH", default_value = "notes.sqlite3")]
    pub db_path: PathBuf,

    /// trace|debug|info|warn|error. Defaults to debug in debug builds, info otherwise.
    #[arg(long, env = "NOTES_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files. Logs go to stderr when unset.
    #[arg(long, env = "NOTES_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl ServerConfig {
    pub fn effective_log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| notes_core::default_log_level())
    }
}

#[cfg(test)]
mod tests {
    use super::ServerConfig;
    use clap::{CommandFactory, Parser};

    #[test]
    fn definition_is_consistent() {
        ServerConfig::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "notes-server",
            "--bind",
            "0.0.0.0:9000",
            "--db-path",
            "/tmp/n.sqlite3",
            "--log-level",
            "warn",
        ])
        .unwrap();
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.db_path.to_str(), Some("/tmp/n.sqlite3"));
        assert_eq!(config.effective_log_level(), "warn");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn invalid_bind_address_is_rejected() {
        assert!(ServerConfig::try_parse_from(["notes-server", "--bind", "nowhere"]).is_err());
    }
}
