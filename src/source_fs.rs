//! Local directory content source.
//!
//! Serves resources from a directory laid out like the site's `public/`
//! folder: `/posts/posts.json` resolves to `{root}/posts/posts.json`.
//! Useful for indexing a checkout without running a web server.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use fezcodex_index_core::source::ContentSource;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};

pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a resource path onto the root, refusing anything that would
    /// escape it.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            bail!("invalid resource path: {}", path);
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ContentSource for DirSource {
    fn describe(&self) -> String {
        format!("file://{}", self.root.display())
    }

    async fn fetch_json(&self, path: &str) -> Result<Value> {
        let file = self.resolve(path)?;
        let content = tokio::fs::read_to_string(&file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid JSON", file.display()))
    }
}
