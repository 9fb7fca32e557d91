//! TOML configuration.
//!
//! ```toml
//! [content]
//! base_url = "https://fezcode.com"   # or: root = "./public"
//! # timeout_secs = 10
//!
//! [index]
//! log_categories = ["Book", "Movie", "Food"]
//!
//! [[index.routes]]
//! title = "Home"
//! path = "/"
//!
//! [[index.commands]]
//! title = "Scroll to Top"
//! command_id = "scrollToTop"
//!
//! [search]
//! default_limit = 20
//!
//! [server]
//! bind = "127.0.0.1:7341"
//! ```
//!
//! Every section is optional. Omitted index tables fall back to the
//! built-in catalog.

use anyhow::{Context, Result};
use fezcodex_index_core::catalog::{Catalog, CommandDescriptor, RouteDescriptor};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where the site's JSON resources come from. Exactly one of `base_url`
/// and `root` must be set.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ContentConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Per-request timeout for HTTP sources. Unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct IndexConfig {
    #[serde(default)]
    pub log_categories: Option<Vec<String>>,
    #[serde(default)]
    pub routes: Option<Vec<RouteDescriptor>>,
    #[serde(default)]
    pub commands: Option<Vec<CommandDescriptor>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

fn default_limit() -> usize {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}

impl IndexConfig {
    /// The catalog to build with: configured tables where given, built-in
    /// tables otherwise.
    pub fn catalog(&self) -> Catalog {
        let builtin = Catalog::builtin();
        Catalog {
            log_categories: self
                .log_categories
                .clone()
                .unwrap_or(builtin.log_categories),
            routes: self.routes.clone().unwrap_or(builtin.routes),
            commands: self.commands.clone().unwrap_or(builtin.commands),
        }
    }
}

impl Config {
    /// Defaults for every section and no content location. Used when the
    /// location comes from the command line instead of a file.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Check cross-field constraints. Called by [`load_config`] and again
    /// after command-line overrides are applied.
    pub fn validate(&self) -> Result<()> {
        match (&self.content.base_url, &self.content.root) {
            (Some(_), Some(_)) => {
                anyhow::bail!("content.base_url and content.root are mutually exclusive")
            }
            (None, None) => anyhow::bail!("one of content.base_url or content.root must be set"),
            (Some(url), None) => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    anyhow::bail!(
                        "content.base_url must start with http:// or https://, got '{}'",
                        url
                    );
                }
            }
            (None, Some(_)) => {}
        }

        if self.content.timeout_secs == Some(0) {
            anyhow::bail!("content.timeout_secs must be > 0");
        }

        if self.search.default_limit == 0 {
            anyhow::bail!("search.default_limit must be >= 1");
        }

        if let Some(categories) = &self.index.log_categories {
            if categories.iter().any(|c| c.trim().is_empty()) {
                anyhow::bail!("index.log_categories must not contain empty names");
            }
        }

        for route in self.index.routes.iter().flatten() {
            if route.title.trim().is_empty() || route.path.trim().is_empty() {
                anyhow::bail!(
                    "index.routes entries need a non-empty title and path (got title '{}', path '{}')",
                    route.title,
                    route.path
                );
            }
        }

        for command in self.index.commands.iter().flatten() {
            if command.title.trim().is_empty() || command.command_id.trim().is_empty() {
                anyhow::bail!(
                    "index.commands entries need a non-empty title and command_id (got title '{}', command_id '{}')",
                    command.title,
                    command.command_id
                );
            }
        }

        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;

    Ok(config)
}
