//! Layered configuration: built-in defaults, then the TOML file, then
//! `CONTRACE_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use contrace_api::TraceDefaults;
use contrace_trace::{DEFAULT_WINDOW_DAYS, RiskPolicy};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  pub store_path:            PathBuf,
  pub window_days:           u32,
  pub crowded_above_percent: u32,
  pub shortlist_percent:     u32,
  pub host:                  String,
  pub port:                  u16,
}

impl Settings {
  /// Read settings from `path` (which need not exist) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let policy = RiskPolicy::default();
    let settings = config::Config::builder()
      .set_default("store_path", "contrace.db")?
      .set_default("window_days", i64::from(DEFAULT_WINDOW_DAYS))?
      .set_default("crowded_above_percent", i64::from(policy.crowded_above_percent))?
      .set_default("shortlist_percent", i64::from(policy.shortlist_percent))?
      .set_default("host", "127.0.0.1")?
      .set_default("port", 7414_i64)?
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("CONTRACE").try_parsing(true))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }

  pub fn policy(&self) -> RiskPolicy {
    RiskPolicy {
      crowded_above_percent: self.crowded_above_percent,
      shortlist_percent:     self.shortlist_percent,
    }
  }

  pub fn trace_defaults(&self) -> TraceDefaults {
    TraceDefaults { window_days: self.window_days, policy: self.policy() }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
