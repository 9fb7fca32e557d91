//! The live search index: the committed record collection plus its
//! loading flag, observable through a `tokio::sync::watch` channel.
//!
//! Every [`SearchIndex::rebuild`] takes a fresh generation number. When a
//! build finishes it commits only if no newer build has started since, so a
//! slow, superseded build can never overwrite a newer result. `is_loading`
//! stays true until the latest build commits.
//!
//! A build that fails on a required source commits an empty collection
//! with `error` set; `is_loading` still clears.

use chrono::{DateTime, Utc};
use fezcodex_index_core::catalog::Catalog;
use fezcodex_index_core::filter::filter_items;
use fezcodex_index_core::models::SearchableRecord;
use fezcodex_index_core::source::ContentSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::indexer::build_index;

/// Consumer-visible state of the index.
#[derive(Debug, Clone)]
pub struct IndexState {
    pub items: Arc<Vec<SearchableRecord>>,
    pub is_loading: bool,
    /// Generation of the build that produced `items` (0 before any commit).
    pub generation: u64,
    /// Set when the last committed build failed on a required source.
    pub error: Option<String>,
    pub skipped_categories: Vec<String>,
    pub built_at: Option<DateTime<Utc>>,
}

impl Default for IndexState {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            is_loading: true,
            generation: 0,
            error: None,
            skipped_categories: Vec::new(),
            built_at: None,
        }
    }
}

pub struct SearchIndex {
    source: Arc<dyn ContentSource>,
    catalog: Arc<Catalog>,
    latest: AtomicU64,
    state: watch::Sender<IndexState>,
}

impl SearchIndex {
    pub fn new(source: Arc<dyn ContentSource>, catalog: Catalog) -> Self {
        let (state, _) = watch::channel(IndexState::default());
        Self {
            source,
            catalog: Arc::new(catalog),
            latest: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<IndexState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> IndexState {
        self.state.borrow().clone()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn source(&self) -> &dyn ContentSource {
        self.source.as_ref()
    }

    /// Build the index and commit the result if this build is still the
    /// latest. Returns this build's generation.
    pub async fn rebuild(&self) -> u64 {
        let generation = self.begin_build();
        self.run_build(generation).await;
        generation
    }

    /// Claim a new generation and mark the index as loading. Any build
    /// with an older generation will no longer commit.
    pub fn begin_build(&self) -> u64 {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_if_modified(|state| {
            let changed = !state.is_loading;
            state.is_loading = true;
            changed
        });
        generation
    }

    /// Run the build claimed by [`begin_build`](SearchIndex::begin_build).
    pub async fn run_build(&self, generation: u64) {
        info!(generation, source = %self.source.describe(), "building search index");

        let result = build_index(self.source.as_ref(), &self.catalog).await;
        let summary = match &result {
            Ok(outcome) => Ok((outcome.records.len(), outcome.skipped_categories.len())),
            Err(e) => Err(format!("{:#}", e)),
        };

        let committed = self.state.send_if_modified(move |state| {
            if self.latest.load(Ordering::SeqCst) != generation {
                return false;
            }
            state.generation = generation;
            state.is_loading = false;
            state.built_at = Some(Utc::now());
            match result {
                Ok(outcome) => {
                    state.items = Arc::new(outcome.records);
                    state.skipped_categories = outcome.skipped_categories;
                    state.error = None;
                }
                Err(e) => {
                    state.items = Arc::new(Vec::new());
                    state.skipped_categories = Vec::new();
                    state.error = Some(format!("{:#}", e));
                }
            }
            true
        });

        match summary {
            _ if !committed => debug!(generation, "build superseded, result discarded"),
            Ok((records, skipped)) => info!(generation, records, skipped, "search index ready"),
            Err(error) => error!(generation, %error, "failed to build search index"),
        }
    }

    /// Filter the committed items and keep at most `limit` results.
    pub fn search(&self, query: &str, limit: Option<usize>) -> Vec<SearchableRecord> {
        let state = self.state.borrow();
        let matches = filter_items(&state.items, query);
        matches
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::tests::fixture_source;
    use anyhow::Result;
    use async_trait::async_trait;
    use fezcodex_index_core::catalog::POSTS_PATH;
    use fezcodex_index_core::source::memory::MemorySource;
    use serde_json::{json, Value};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn index_over(source: MemorySource) -> SearchIndex {
        SearchIndex::new(Arc::new(source), Catalog::builtin())
    }

    #[tokio::test]
    async fn test_initially_loading_and_empty() {
        let index = index_over(fixture_source());
        let state = index.snapshot();
        assert!(state.is_loading);
        assert!(state.items.is_empty());
        assert_eq!(state.generation, 0);
    }

    #[tokio::test]
    async fn test_rebuild_commits_and_clears_loading() {
        let index = index_over(fixture_source());
        let mut rx = index.subscribe();

        let generation = index.rebuild().await;
        assert_eq!(generation, 1);
        assert!(rx.has_changed().unwrap());

        let state = rx.borrow_and_update().clone();
        assert!(!state.is_loading);
        assert_eq!(state.generation, 1);
        assert!(state.error.is_none());
        assert!(state.built_at.is_some());
        assert!(state.items.iter().any(|r| r.title == "Saga: Part Two"));
    }

    #[tokio::test]
    async fn test_required_failure_commits_empty_with_error() {
        let source = fixture_source();
        source.fail(POSTS_PATH, "HTTP 503");
        let index = index_over(source);

        index.rebuild().await;
        let state = index.snapshot();
        assert!(!state.is_loading);
        assert!(state.items.is_empty());
        assert!(state.error.as_deref().unwrap().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn test_degraded_category_still_completes() {
        let source = fixture_source();
        source.fail("/logs/food/food.json", "HTTP 404");
        let index = index_over(source);

        index.rebuild().await;
        let state = index.snapshot();
        assert!(!state.is_loading);
        assert_eq!(state.skipped_categories, vec!["Food"]);
        assert!(!state
            .items
            .iter()
            .any(|r| r.kind == "log" && r.category.as_deref() == Some("Food")));
    }

    #[tokio::test]
    async fn test_search_filters_and_limits() {
        let index = index_over(fixture_source());
        index.rebuild().await;

        let saga = index.search("saga part", None);
        assert_eq!(saga.len(), 2);
        assert_eq!(index.search("saga part", Some(1)).len(), 1);
        assert_eq!(index.search("", None).len(), index.snapshot().items.len());
        assert!(index.search("zzz-nothing", None).is_empty());
    }

    /// Serves the fixture, but the first posts request stalls and returns
    /// an older payload.
    struct SlowFirstPosts {
        inner: MemorySource,
        posts_calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentSource for SlowFirstPosts {
        fn describe(&self) -> String {
            "slow-first-posts".to_string()
        }

        async fn fetch_json(&self, path: &str) -> Result<Value> {
            if path == POSTS_PATH && self.posts_calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(200)).await;
                return Ok(json!([{ "slug": "stale", "title": "Stale Post" }]));
            }
            self.inner.fetch_json(path).await
        }
    }

    #[tokio::test]
    async fn test_superseded_build_does_not_overwrite_newer() {
        let source = SlowFirstPosts {
            inner: fixture_source(),
            posts_calls: AtomicUsize::new(0),
        };
        let index = Arc::new(SearchIndex::new(Arc::new(source), Catalog::builtin()));

        let slow = {
            let index = index.clone();
            tokio::spawn(async move { index.rebuild().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let fresh = index.rebuild().await;
        assert_eq!(fresh, 2);
        assert_eq!(slow.await.unwrap(), 1);

        let state = index.snapshot();
        assert_eq!(state.generation, 2);
        assert!(!state.is_loading);
        assert!(state.items.iter().any(|r| r.title == "Hello World"));
        assert!(!state.items.iter().any(|r| r.title == "Stale Post"));
    }
}
