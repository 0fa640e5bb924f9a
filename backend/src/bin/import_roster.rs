//! Import a parsed roster payload from a JSON file into PostgreSQL.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde_json::Value;
use tokio::runtime::Builder;
use uuid::Uuid;

use roster::domain::ports::{FixtureRosterParser, RosterImportCommand, SaveRosterRequest};
use roster::domain::{AccessContext, RosterImportService, UserId};
use roster::outbound::persistence::{
    DbPool, DieselRosterImportRepository, DieselRosterRepository, PoolConfig,
};

const DATABASE_URL_VARS: [&str; 2] = ["ROSTER_DATABASE_URL", "DATABASE_URL"];

/// `import-roster` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "import-roster",
    about = "Save a parsed roster JSON payload as the schedule for its month",
    version
)]
struct CliArgs {
    /// Path to the parser's JSON output.
    #[arg(long = "payload", value_name = "path")]
    payload_path: PathBuf,
    /// Replace an existing schedule for the same month.
    #[arg(long)]
    overwrite: bool,
    /// Database connection URL. Falls back to `ROSTER_DATABASE_URL`, then
    /// `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = CliArgs::parse();
    let payload = read_payload(&args.payload_path)?;
    let database_url = resolve_database_url(args.database_url, |name| env::var(name).ok())?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .wrap_err("create database pool")?;

    let command = RosterImportService::new(
        Arc::new(FixtureRosterParser),
        Arc::new(DieselRosterRepository::new(pool.clone())),
        Arc::new(DieselRosterImportRepository::new(pool)),
    );
    let report = command
        .save(
            &operator(),
            SaveRosterRequest {
                payload,
                overwrite: args.overwrite,
            },
        )
        .await
        .map_err(|error| eyre!("import failed: {error}"))?;

    println!("{}", report.message());
    println!("schedule_id={}", report.schedule_id);
    println!("employees_upserted={}", report.employees_upserted);
    println!("legend_entries={}", report.legend_entries);
    if !report.unresolved_matriculas.is_empty() {
        let skipped: Vec<&str> = report
            .unresolved_matriculas
            .iter()
            .map(AsRef::as_ref)
            .collect();
        println!("unresolved_matriculas={}", skipped.join(","));
    }
    Ok(())
}

/// Shell access is trusted as administrator.
fn operator() -> AccessContext {
    AccessContext::Admin {
        user_id: UserId::from_uuid(Uuid::nil()),
        email: None,
    }
}

fn read_payload(path: &Path) -> Result<Value> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("payload path must name a file: {}", path.display()))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())
        .wrap_err_with(|| format!("open payload directory '{}'", parent.display()))?;
    let text = directory
        .read_to_string(Path::new(file_name))
        .wrap_err_with(|| format!("read payload '{}'", path.display()))?;
    parse_payload(&text)
}

fn parse_payload(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text).wrap_err("payload is not valid JSON")?;
    if !value.is_object() {
        return Err(eyre!("payload must be a JSON object"));
    }
    Ok(value)
}

fn resolve_database_url(
    explicit: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    DATABASE_URL_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "database URL missing: set --database-url, ROSTER_DATABASE_URL or DATABASE_URL",
            )
        })
}
