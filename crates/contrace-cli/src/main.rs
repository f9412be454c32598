//! `contrace` — record people, places and visits, and trace exposure.
//!
//! # Usage
//!
//! ```text
//! contrace person add "Ana Lima" --address "1 Harbour Rd" --infected 2026-10-12
//! contrace place add Bakery --address "4 Mill St"
//! contrace visit add 1 1 2026-10-14
//! contrace trace contacts 1 --window-days 10
//! contrace trace high-risk --json
//! contrace serve --port 7414
//! ```
//!
//! Settings come from `contrace.toml` (or `--config`) and `CONTRACE_*`
//! environment variables.

mod cli;
mod commands;
mod output;
mod settings;

use anyhow::Context as _;
use clap::Parser;
use contrace_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{
  cli::Cli,
  settings::{Settings, expand_tilde},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so `--json` output stays clean.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let store_path = cli
    .store
    .as_deref()
    .map(expand_tilde)
    .unwrap_or_else(|| settings.store_path.clone());

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  commands::run(cli.command, store, &settings, cli.json).await
}
