//! `rollcall` — operator tool for the Rollcall attendance store.
//!
//! Reads `rollcall.toml` (or the path given with `--config`), opens the
//! SQLite store once, runs a single operation, and prints the result as JSON.
//!
//! # Usage
//!
//! ```text
//! rollcall create --id 7 Ada Lovelace
//! rollcall login 7
//! rollcall online
//! rollcall logout 7
//! rollcall search love
//! ```
//!
//! Failures print `{"error": <kind>, "message": ...}` on stderr and exit with
//! a code per error kind (see [`exit_code`]).

mod settings;

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rollcall_core::{ErrorKind, Person, PersonId, Roster};
use rollcall_store_sqlite::SqliteStore;
use serde::Serialize;
use serde_json::json;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::RollcallConfig;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Rollcall attendance tracker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "rollcall.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create a person. Name words are joined with single spaces.
  Create {
    /// Explicit id; the store assigns one when omitted.
    #[arg(long)]
    id:   Option<String>,
    #[arg(required = true, num_args = 1..)]
    name: Vec<String>,
  },
  /// Record a login.
  Login { id: String },
  /// Record a logout.
  Logout { id: String },
  /// Show one person by id.
  Show { id: String },
  /// Search by name fragment or id.
  Search { text: String },
  /// List everyone currently online.
  Online,
}

/// What a command prints on success.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Output {
  One(Person),
  Many(Vec<Person>),
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
  // Logs go to stderr; stdout carries only JSON results.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = RollcallConfig::load(&cli.config)?;

  let store = match SqliteStore::open(&cfg.store_path).await {
    Ok(store) => store,
    Err(e) => {
      let err = rollcall_core::Error::from(e);
      tracing::error!(path = %cfg.store_path.display(), error = %err, "failed to open store");
      return Ok(report(&err));
    }
  };
  let roster = Roster::new(store);

  let code = match run(&roster, cli.command).await {
    Ok(output) => {
      let out = serde_json::to_string_pretty(&output)
        .context("failed to serialise result")?;
      println!("{out}");
      ExitCode::SUCCESS
    }
    Err(err) => report(&err),
  };

  Ok(code)
}

async fn run(
  roster: &Roster<SqliteStore>,
  command: Command,
) -> rollcall_core::Result<Output> {
  let output = match command {
    Command::Create { id, name } => {
      let id = id.as_deref().map(str::parse::<PersonId>).transpose()?;
      Output::One(roster.create_person(id, &name.join(" ")).await?)
    }
    Command::Login { id } => Output::One(roster.login(id.parse()?).await?),
    Command::Logout { id } => Output::One(roster.logout(id.parse()?).await?),
    Command::Show { id } => {
      let id: PersonId = id.parse()?;
      let person = roster
        .find_by_id(id)
        .await?
        .ok_or(rollcall_core::Error::NotFound(id))?;
      Output::One(person)
    }
    Command::Search { text } => Output::Many(roster.search(&text).await?),
    Command::Online => Output::Many(roster.list_online().await?),
  };
  Ok(output)
}

/// Print `err` to stderr and return its exit code.
fn report(err: &rollcall_core::Error) -> ExitCode {
  let body = json!({ "error": err.kind().as_str(), "message": err.to_string() });
  eprintln!("{body}");
  ExitCode::from(exit_code(err.kind()))
}

/// One stable process exit code per error kind.
fn exit_code(kind: ErrorKind) -> u8 {
  match kind {
    ErrorKind::InvalidInput => 2,
    ErrorKind::DuplicateKey => 3,
    ErrorKind::NotFound => 4,
    ErrorKind::StorageUnavailable => 5,
  }
}
