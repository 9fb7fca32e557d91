//! # Fezcodex Index CLI (`fezdex`)
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fezdex index` | Build the index once and summarize it |
//! | `fezdex search "<query>"` | Build the index and print matching records |
//! | `fezdex sources` | Check which content resources are reachable |
//! | `fezdex serve` | Start the HTTP search API |
//! | `fezdex completions <shell>` | Print a shell completion script |
//!
//! ## Examples
//!
//! ```bash
//! fezdex --base-url https://fezcode.com search "rust"
//! fezdex --root ./public index --json > index.json
//! fezdex --config ./config/fezdex.toml serve
//! ```

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use fezcodex_index::config::{self, Config};
use fezcodex_index::{index_cmd, search, server, sources};

/// Fezcodex Index: builds and searches the site's command-palette index.
///
/// Content comes either from a TOML config file (`--config`) or directly
/// from `--base-url` / `--root`, which override the file's `[content]`.
#[derive(Parser)]
#[command(
    name = "fezdex",
    about = "Fezcodex Index: build and search the site's command-palette index",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/fezdex.toml")]
    config: PathBuf,

    /// Fetch content over HTTP from this site root.
    #[arg(long, global = true, conflicts_with = "root")]
    base_url: Option<String>,

    /// Read content from this local directory (the site's `public/`).
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index once and print per-type counts.
    Index {
        /// Print every record as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Build the index and print records matching the query.
    ///
    /// Every whitespace-separated word must appear (case-insensitively) in
    /// a record's title, type, tags, technologies, or category.
    Search {
        /// The search query.
        query: String,

        /// Maximum number of results (defaults to `[search].default_limit`).
        #[arg(long)]
        limit: Option<usize>,

        /// Only show records of this type (`page`, `command`, `post`, ...).
        #[arg(long = "type")]
        kind: Option<String>,
    },

    /// Check which content resources are reachable.
    Sources,

    /// Start the HTTP search API on `[server].bind`.
    Serve,

    /// Print a shell completion script.
    Completions {
        shell: Shell,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Load the config file, or start from defaults when a location is given
/// on the command line and the file does not exist.
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let overridden = cli.base_url.is_some() || cli.root.is_some();
    let mut cfg = if overridden && !cli.config.exists() {
        Config::minimal()
    } else {
        config::load_config(&cli.config)?
    };

    if let Some(url) = &cli.base_url {
        cfg.content.base_url = Some(url.clone());
        cfg.content.root = None;
    }
    if let Some(root) = &cli.root {
        cfg.content.root = Some(root.clone());
        cfg.content.base_url = None;
    }
    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "fezdex", &mut std::io::stdout());
        return Ok(());
    }

    init_logging(cli.verbose);
    let cfg = resolve_config(&cli)?;

    match cli.command {
        Commands::Index { json } => {
            index_cmd::run_index(&cfg, json).await?;
        }
        Commands::Search { query, limit, kind } => {
            search::run_search(&cfg, &query, limit, kind).await?;
        }
        Commands::Sources => {
            let source = sources::open_source(&cfg.content)?;
            sources::list_sources(source.as_ref(), &cfg.index.catalog()).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Completions { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
