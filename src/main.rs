mod bootstrap;
mod cache;
mod config;
mod records;
mod session;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::bootstrap::Bootstrap;
use crate::cache::CacheResult;
use crate::records::cache::DataCache;
use crate::records::client::RecordsClient;
use crate::session::Session;

#[derive(Parser, Debug)]
#[command(name = "matterdesk")]
#[command(about = "Staff dashboard data core for a law practice's matter records")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/matterdesk/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List matters (served from cache when fresh)
  Matters {
    /// Bypass the cache and fetch fresh data
    #[arg(long)]
    force: bool,
  },
  /// List assignees (served from cache when fresh)
  Assignees {
    /// Bypass the cache and fetch fresh data
    #[arg(long)]
    force: bool,
  },
  /// Force-refresh both cached collections
  Refresh,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_env("MATTERDESK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let config = config::Config::load(args.config.as_deref())?;
  let session = Session::load();

  let client = RecordsClient::new(&config.backend, session.auth_token())?;
  let cache = DataCache::new(Arc::new(client));

  // Priming fetch, gated on a saved session token.
  let bootstrap = Bootstrap::new();
  bootstrap.run(&session, &cache).await;

  match args.command.unwrap_or(Command::Matters { force: false }) {
    Command::Matters { force } => {
      let result = cache.fetch_matters(force).await;
      report("matters", &result);
      for matter in &result.data {
        println!(
          "{}\t{}\t{}\t{}",
          matter.id, matter.name, matter.case_type, matter.client
        );
      }
    }
    Command::Assignees { force } => {
      let result = cache.fetch_assignees(force).await;
      report("assignees", &result);
      for name in &result.data {
        println!("{}", name);
      }
    }
    Command::Refresh => {
      let outcome = cache.refresh_cache().await;
      report("matters", &outcome.matters);
      report("assignees", &outcome.assignees);
      println!(
        "matters: {} records, assignees: {} records",
        outcome.matters.data.len(),
        outcome.assignees.data.len()
      );
    }
  }

  Ok(())
}

/// Surface an absorbed fetch failure without failing the command.
fn report<T>(name: &str, result: &CacheResult<T>) {
  debug!(collection = name, source = ?result.source, "served");
  if let Some(error) = &result.error {
    match result.cached_at {
      Some(at) => eprintln!(
        "warning: {} list may be stale (cached {}, refresh failed: {})",
        name,
        at.format("%Y-%m-%d %H:%M:%S"),
        error
      ),
      None => eprintln!("warning: {} list unavailable ({})", name, error),
    }
  }
}
