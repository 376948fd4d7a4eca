mod config;
mod infrastructure;
pub mod session;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use estante_catalog::{CatalogConfig, GoodreadsCatalog};
use estante_core::services::Universe;
use estante_storage::{JsonRegistryStore, StorageConfig};

use crate::config::SessionConfig;
pub use crate::infrastructure::opener::{LinkOpener, SystemBrowser};
pub use crate::session::{Flow, PreviewCommand, Session};

/// Type alias to simplify the generic signature of the Session.
type ConcreteSession = Session<GoodreadsCatalog, GoodreadsCatalog, GoodreadsCatalog, JsonRegistryStore, SystemBrowser>;

/// Explore an author's literary influences, one search at a time.
#[derive(Debug, Parser)]
#[command(name = "estante", version, about)]
pub struct Args {
  /// Authors to add before the interactive prompt starts.
  pub authors: Vec<String>,

  /// State file to save to / load from (overrides `[storage] state_file`).
  #[arg(long)]
  pub state: Option<PathBuf>,

  /// Load the saved registry before starting.
  #[arg(long)]
  pub load: bool,

  /// Per-request deadline for catalog calls, in seconds.
  #[arg(long)]
  pub deadline_secs: Option<u64>,
}

/// Logs go to stderr so they never interleave with the prompt on stdout.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| "estante=info,estante_lib=info,estante_core=info,estante_catalog=info".into());

  tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
}

pub async fn run(args: Args) -> anyhow::Result<()> {
  // --- Dependency Injection Phase ---

  // 1. Config sections (defaults are written back on first run).
  let catalog_cfg = CatalogConfig::load()?;
  let storage_cfg = StorageConfig::load()?;
  let session_cfg = SessionConfig::load()?;

  // 2. Catalog Adapter (Goodreads). One client shared by the three ports.
  let catalog = GoodreadsCatalog::new(&catalog_cfg)?;

  // 3. Persistence Adapter (JSON file).
  let store = match args.state {
    Some(path) => JsonRegistryStore::new(path),
    None => JsonRegistryStore::from_config(&storage_cfg),
  };

  // 4. Core wiring.
  let deadline = Duration::from_secs(args.deadline_secs.unwrap_or(session_cfg.deadline_secs));
  let universe = Universe::new(catalog.clone(), catalog.clone(), catalog).with_deadline(deadline);

  let mut session: ConcreteSession = Session::new(universe, store, SystemBrowser, session_cfg.graph_file);
  let mut stdout = std::io::stdout();

  if args.load || session_cfg.load_on_start {
    session.load(&mut stdout)?;
  }

  if !args.authors.is_empty() {
    session.seed(&args.authors, &mut stdout).await?;
  }

  let stdin = tokio::io::BufReader::new(tokio::io::stdin());
  session.run(stdin, &mut stdout).await?;

  Ok(())
}
