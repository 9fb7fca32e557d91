//! HTTP content source.
//!
//! Fetches the site's JSON resources relative to a base URL, the same
//! requests the browser makes:
//!
//! | Resource | URL |
//! |----------|-----|
//! | posts | `{base_url}/posts/posts.json` |
//! | projects | `{base_url}/projects/projects.json` |
//! | apps | `{base_url}/apps/apps.json` |
//! | logs | `{base_url}/logs/{category}/{category}.json` |
//!
//! No retries. A timeout applies only when configured.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use fezcodex_index_core::source::ContentSource;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// A [`ContentSource`] backed by a shared `reqwest::Client`.
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source for `base_url` (trailing slashes are ignored).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("fezdex/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    async fn fetch_json(&self, path: &str) -> Result<Value> {
        let url = self.url_for(path);
        debug!(%url, "fetching");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("GET {} returned {}", url, status);
        }

        response
            .json::<Value>()
            .await
            .with_context(|| format!("GET {} did not return valid JSON", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let source = HttpSource::new("https://fezcode.com/", None).unwrap();
        assert_eq!(
            source.url_for("/posts/posts.json"),
            "https://fezcode.com/posts/posts.json"
        );
        assert_eq!(source.url_for("apps/apps.json"), "https://fezcode.com/apps/apps.json");
        assert_eq!(source.describe(), "https://fezcode.com");
    }
}
