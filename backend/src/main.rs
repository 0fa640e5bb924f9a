//! Roster server entry-point: loads settings, prepares storage and serves the
//! REST API.

mod server;

use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use roster::inbound::http::session_config::{BuildMode, session_settings_from_env};
use roster::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{RosterSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = RosterSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let session =
        session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
            .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %session.fingerprint(),
        ttl_hours = session.ttl_hours,
        "session key loaded"
    );

    let mut config = ServerConfig::new(session, settings.bind_addr()?);
    if let Some(database_url) = settings.database_url() {
        if settings.run_migrations {
            run_pending_migrations(database_url)
                .await
                .map_err(std::io::Error::other)?;
        }
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }
    if let Some(parser_url) = settings.parser_api_url() {
        config = config.with_parser(parser_url, settings.parser_timeout());
    }

    let bind_addr = config.bind_addr;
    let (server, _health_state) = create_server(config)?;
    info!(%bind_addr, "roster server listening");
    server.await
}
