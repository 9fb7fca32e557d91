//! Content source abstraction.
//!
//! The index builder never talks to HTTP or the filesystem directly. It
//! asks a [`ContentSource`] for JSON documents by absolute resource path
//! (`/posts/posts.json`, `/logs/food/food.json`, ...), which keeps the
//! build logic testable with [`memory::MemorySource`].
//!
//! Implementations must be `Send + Sync` so a source can be shared by
//! concurrent builds.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Human-readable location, e.g. `"https://fezcode.com"`.
    fn describe(&self) -> String;

    /// Fetch and parse the JSON document at `path`.
    ///
    /// Missing resources, non-success responses, and invalid JSON are all
    /// errors; deciding which of them are fatal is the caller's job.
    async fn fetch_json(&self, path: &str) -> Result<Value>;
}
