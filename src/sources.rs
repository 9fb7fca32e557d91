//! Content source selection and resource health listing.
//!
//! Used by every CLI command to open the configured [`ContentSource`], and
//! by `fezdex sources` / `GET /sources` to report which resources are
//! reachable.
//!
//! # Health Checks
//!
//! | Resource | Required | Healthy When |
//! |----------|----------|--------------|
//! | posts, projects, apps | yes | fetch succeeds and parses as JSON |
//! | `logs:<category>` | no | fetch succeeds and parses as JSON |

use anyhow::{bail, Result};
use fezcodex_index_core::catalog::{
    log_category_path, Catalog, APPS_PATH, POSTS_PATH, PROJECTS_PATH,
};
use fezcodex_index_core::source::ContentSource;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ContentConfig;
use crate::source_fs::DirSource;
use crate::source_http::HttpSource;

/// Open the source described by `[content]`.
pub fn open_source(content: &ContentConfig) -> Result<Arc<dyn ContentSource>> {
    match (&content.base_url, &content.root) {
        (Some(url), None) => {
            let timeout = content.timeout_secs.map(Duration::from_secs);
            Ok(Arc::new(HttpSource::new(url, timeout)?))
        }
        (None, Some(root)) => Ok(Arc::new(DirSource::new(root.clone()))),
        _ => bail!("exactly one of content.base_url or content.root must be set"),
    }
}

/// Reachability of one resource.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceStatus {
    /// `posts`, `projects`, `apps`, or `logs:<Category>`.
    pub name: String,
    pub path: String,
    /// A required resource failing fails the whole build.
    pub required: bool,
    pub healthy: bool,
    pub notes: Option<String>,
}

/// Probe every resource the index build would fetch, concurrently.
pub async fn get_sources(source: &dyn ContentSource, catalog: &Catalog) -> Vec<ResourceStatus> {
    let mut targets: Vec<(String, String, bool)> = vec![
        ("posts".to_string(), POSTS_PATH.to_string(), true),
        ("projects".to_string(), PROJECTS_PATH.to_string(), true),
        ("apps".to_string(), APPS_PATH.to_string(), true),
    ];
    targets.extend(
        catalog
            .log_categories
            .iter()
            .map(|c| (format!("logs:{}", c), log_category_path(c), false)),
    );

    join_all(targets.into_iter().map(|(name, path, required)| async move {
        let probe = source.fetch_json(&path).await;
        ResourceStatus {
            name,
            required,
            healthy: probe.is_ok(),
            notes: probe.err().map(|e| format!("{:#}", e)),
            path,
        }
    }))
    .await
}

pub async fn list_sources(source: &dyn ContentSource, catalog: &Catalog) -> Result<()> {
    println!("source: {}", source.describe());
    println!("{:<16} {:<10} {:<9} PATH", "RESOURCE", "REQUIRED", "HEALTHY");
    for status in get_sources(source, catalog).await {
        println!(
            "{:<16} {:<10} {:<9} {}",
            status.name, status.required, status.healthy, status.path
        );
        if let Some(notes) = &status.notes {
            println!("    {}", notes);
        }
    }
    Ok(())
}
