//! Layered configuration: built-in defaults, then an optional TOML file, then
//! `ROLLCALL_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Database file used when nothing else is configured.
pub const DEFAULT_STORE_PATH: &str = "User.db";

/// Runtime configuration, deserialised from `rollcall.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct RollcallConfig {
  /// Location of the SQLite database; a leading `~/` expands to `$HOME`.
  pub store_path: PathBuf,
}

impl RollcallConfig {
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)
      .context("failed to set config defaults")?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("ROLLCALL"))
      .build()
      .with_context(|| format!("failed to read config file {}", file.display()))?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise RollcallConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
