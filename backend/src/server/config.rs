//! Server settings loaded via OrthoConfig and the assembled server
//! configuration.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use roster::inbound::http::session_config::SessionSettings;
use roster::outbound::persistence::DbPool;

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_BIND_PORT: u16 = 8080;
const DEFAULT_PARSER_TIMEOUT_SECS: u64 = 60;

/// Runtime settings read from `ROSTER_*` variables, config files and flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROSTER")]
pub struct RosterSettings {
    /// PostgreSQL URL. Without one the server runs on fixtures.
    pub database_url: Option<String>,
    /// Document parser endpoint. `/parse-ai` suffixes are rewritten.
    pub parser_api_url: Option<String>,
    /// Parser request timeout in seconds.
    pub parser_timeout_secs: Option<u64>,
    /// Interface to listen on.
    pub bind_host: Option<String>,
    /// Port to listen on.
    pub bind_port: Option<u16>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl RosterSettings {
    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_deref())
    }

    /// Configured parser URL, ignoring blank values.
    pub fn parser_api_url(&self) -> Option<&str> {
        non_blank(self.parser_api_url.as_deref())
    }

    /// Parser timeout, defaulting to one minute.
    pub fn parser_timeout(&self) -> Duration {
        Duration::from_secs(
            self.parser_timeout_secs
                .unwrap_or(DEFAULT_PARSER_TIMEOUT_SECS),
        )
    }

    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] when the host is not an IP address.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let host = non_blank(self.bind_host.as_deref()).unwrap_or(DEFAULT_BIND_HOST);
        let port = self.bind_port.unwrap_or(DEFAULT_BIND_PORT);
        format!("{host}:{port}")
            .parse()
            .or_else(|_| format!("[{host}]:{port}").parse())
            .map_err(|err| std::io::Error::other(format!("invalid bind address {host}: {err}")))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Everything `create_server` needs besides the health state.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) parser_url: Option<String>,
    pub(crate) parser_timeout: Duration,
}

impl ServerConfig {
    /// Configuration with fixtures for storage and parsing.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            parser_url: None,
            parser_timeout: Duration::from_secs(DEFAULT_PARSER_TIMEOUT_SECS),
        }
    }

    /// Attach a database pool for the Diesel adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Use the HTTP parser at `url`.
    #[must_use]
    pub fn with_parser(mut self, url: impl Into<String>, timeout: Duration) -> Self {
        self.parser_url = Some(url.into());
        self.parser_timeout = timeout;
        self
    }
}
