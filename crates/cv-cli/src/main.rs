//! `cvtool`: inspect, migrate and store CV documents.
//!
//! Reads `cvtool.toml` (or the path given with `--config`) and `CVTOOL_*`
//! environment variables. The pure subcommands work on JSON files; `import`,
//! `export`, `list` and `delete` go through the SQLite store.
//!
//! ```
//! cvtool migrate old.json
//! cvtool render cv.json --field experiences.0 --tree
//! cvtool import cv.json --key drafts/main
//! ```

mod commands;
mod settings;

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use cv_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::ToolConfig;

#[derive(Parser)]
#[command(author, version, about = "CV document migration and sync tool")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "cvtool.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Migrate a stored document (any historical shape) and print canonical
  /// JSON.
  Migrate {
    /// JSON file, or `-` for stdin.
    file: PathBuf,
  },
  /// Parse one rich-text field and print it as plain text.
  Render {
    file:   PathBuf,
    /// `summary`, or `<section>.<index>` such as `experiences.0`.
    #[arg(short, long, default_value = "summary")]
    field:  String,
    /// Parse as a single inline run instead of blocks.
    #[arg(long)]
    inline: bool,
    /// Print the parsed tree as JSON.
    #[arg(long)]
    tree:   bool,
  },
  /// Print the content fingerprint of a document.
  Fingerprint {
    file: PathBuf,
    /// Fingerprint the file as-is instead of migrating it first.
    #[arg(long)]
    raw:  bool,
  },
  /// Report whether two documents are content-identical.
  Compare { local: PathBuf, remote: PathBuf },
  /// Migrate a file and save it in the store, skipping unchanged content.
  Import {
    file: PathBuf,
    #[arg(short, long)]
    key:  Option<String>,
  },
  /// Print a stored document as canonical JSON.
  Export {
    #[arg(short, long)]
    key: Option<String>,
  },
  /// List stored keys with their last write time.
  List,
  /// Remove a stored document.
  Delete {
    #[arg(short, long)]
    key: Option<String>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = ToolConfig::load(&cli.config)?;
  let strip = cfg.strip_keys();

  match cli.command {
    Command::Migrate { file } => commands::migrate_file(&file)?,
    Command::Render {
      file,
      field,
      inline,
      tree,
    } => commands::render(&file, &field, inline, tree)?,
    Command::Fingerprint { file, raw } => {
      commands::fingerprint_file(&file, raw, &strip)?
    }
    Command::Compare { local, remote } => {
      if !commands::compare(&local, &remote, &strip)? {
        return Ok(ExitCode::FAILURE);
      }
    }
    Command::Import { file, key } => {
      let store = open_store(&cfg).await?;
      let key = key.unwrap_or_else(|| cfg.document_key.clone());
      commands::import(&store, &file, &key, &strip).await?
    }
    Command::Export { key } => {
      let store = open_store(&cfg).await?;
      let key = key.unwrap_or_else(|| cfg.document_key.clone());
      commands::export(&store, &key).await?
    }
    Command::List => commands::list(&open_store(&cfg).await?).await?,
    Command::Delete { key } => {
      let store = open_store(&cfg).await?;
      let key = key.unwrap_or_else(|| cfg.document_key.clone());
      commands::delete(&store, &key).await?
    }
  }

  Ok(ExitCode::SUCCESS)
}

async fn open_store(cfg: &ToolConfig) -> anyhow::Result<SqliteStore> {
  let path = cfg.store_path();
  tracing::debug!(path = %path.display(), "opening store");
  SqliteStore::open(&path)
    .await
    .with_context(|| format!("failed to open store at {path:?}"))
}
