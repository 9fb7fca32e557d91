//! Index build orchestration.
//!
//! One build fans out every request at once (one per log category plus
//! posts, projects, and apps) and joins them at a single barrier before
//! normalizing:
//!
//! ```text
//!   logs/book ─┐
//!   logs/...  ─┤ join_all ─┐
//!   logs/tools─┘           │
//!   posts ─────────────────┤ tokio::join! ──▶ normalize ──▶ assemble
//!   projects ──────────────┤
//!   apps ──────────────────┘
//! ```
//!
//! A failing log category is logged and contributes nothing. A failing
//! posts, projects, or apps fetch (or an unparseable payload) fails the
//! whole build.

use anyhow::{Context, Result};
use fezcodex_index_core::catalog::{
    log_category_path, Catalog, APPS_PATH, POSTS_PATH, PROJECTS_PATH,
};
use fezcodex_index_core::models::{AppCategory, RawEntry, SearchableRecord};
use fezcodex_index_core::normalize::{
    assemble, normalize_apps, normalize_logs, normalize_posts, normalize_projects, Collections,
};
use fezcodex_index_core::source::ContentSource;
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

/// Result of one successful build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildOutcome {
    /// Flat collection in display order.
    pub records: Vec<SearchableRecord>,
    /// Log categories that degraded to an empty contribution.
    pub skipped_categories: Vec<String>,
}

/// Fetch every source and produce the flat record collection.
pub async fn build_index(source: &dyn ContentSource, catalog: &Catalog) -> Result<BuildOutcome> {
    let category_fetches = join_all(
        catalog
            .log_categories
            .iter()
            .map(|category| fetch_log_category(source, category)),
    );

    let (log_results, posts, projects, apps) = tokio::join!(
        category_fetches,
        source.fetch_json(POSTS_PATH),
        source.fetch_json(PROJECTS_PATH),
        source.fetch_json(APPS_PATH),
    );

    let posts = RawEntry::list_from_value(posts.context("Failed to fetch posts")?)
        .context("Invalid posts payload")?;
    let projects = RawEntry::list_from_value(projects.context("Failed to fetch projects")?)
        .context("Invalid projects payload")?;
    let apps = AppCategory::map_from_value(apps.context("Failed to fetch apps")?)
        .context("Invalid apps payload")?;

    let mut groups = Vec::new();
    let mut skipped_categories = Vec::new();
    for (category, result) in catalog.log_categories.iter().zip(log_results) {
        match result {
            Some(entries) => groups.push((category.clone(), entries)),
            None => skipped_categories.push(category.clone()),
        }
    }

    let collections = Collections {
        posts: normalize_posts(posts),
        projects: normalize_projects(projects),
        logs: normalize_logs(groups),
        apps: normalize_apps(apps),
    };
    debug!(
        posts = collections.posts.len(),
        projects = collections.projects.len(),
        logs = collections.logs.len(),
        apps = collections.apps.len(),
        "normalized collections"
    );

    Ok(BuildOutcome {
        records: assemble(catalog, collections),
        skipped_categories,
    })
}

async fn fetch_log_category(source: &dyn ContentSource, category: &str) -> Option<Vec<RawEntry>> {
    let path = log_category_path(category);
    let result = match source.fetch_json(&path).await {
        Ok(value) => RawEntry::list_from_value(value),
        Err(e) => Err(e),
    };
    match result {
        Ok(entries) => Some(entries),
        Err(e) => {
            warn!(category, error = %format!("{:#}", e), "log category unavailable, skipping");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use fezcodex_index_core::source::memory::MemorySource;
    use serde_json::json;

    /// A source with one record of every kind and every log category
    /// present (empty unless noted).
    pub(crate) fn fixture_source() -> MemorySource {
        let source = MemorySource::new()
            .with(
                POSTS_PATH,
                json!([
                    { "slug": "hello", "title": "Hello World", "tags": ["intro"] },
                    { "title": "Saga", "series": { "posts": [
                        { "slug": "ep1", "title": "Part One" },
                        { "slug": "ep2", "title": "Part Two" }
                    ]}}
                ]),
            )
            .with(
                PROJECTS_PATH,
                json!([{ "slug": "fezcodex", "title": "Fezcodex", "technologies": ["Rust"] }]),
            )
            .with(
                APPS_PATH,
                json!({ "Utilities": { "apps": [{ "to": "/apps/clock", "title": "Clock" }] } }),
            );
        for category in Catalog::builtin().log_categories {
            source.insert(&log_category_path(&category), json!([]));
        }
        source.insert(
            &log_category_path("Music"),
            json!([{ "slug": "stylo", "title": "Stylo", "category": "Music", "tags": ["gorillaz"] }]),
        );
        source.insert(
            &log_category_path("Food"),
            json!([{ "slug": "ramen", "title": "Ramen", "category": "Food" }]),
        );
        source
    }

    fn kinds(records: &[SearchableRecord]) -> Vec<&str> {
        records.iter().map(|r| r.kind.as_str()).collect()
    }

    #[tokio::test]
    async fn test_full_build_order_and_shapes() {
        let catalog = Catalog::builtin();
        let outcome = build_index(&fixture_source(), &catalog).await.unwrap();
        let records = &outcome.records;
        let statics = catalog.routes.len() + catalog.commands.len();

        assert!(outcome.skipped_categories.is_empty());
        assert_eq!(
            &kinds(records)[statics..],
            &["post", "post", "post", "project", "log", "log", "app"]
        );
        assert_eq!(records[statics + 1].title, "Saga: Part One");
        assert_eq!(records[statics + 3].path.as_deref(), Some("/projects/fezcodex"));
        // Logs come in catalog category order: Music before Food.
        assert_eq!(records[statics + 4].path.as_deref(), Some("/logs/music/stylo"));
        assert_eq!(records[statics + 5].path.as_deref(), Some("/logs/food/ramen"));

        let app = records.last().unwrap();
        assert_eq!(
            (app.kind.as_str(), app.path.as_deref(), app.title.as_str()),
            ("app", Some("/apps/clock"), "Clock")
        );
    }

    #[tokio::test]
    async fn test_missing_category_degrades() {
        let source = fixture_source();
        source.fail(&log_category_path("Food"), "HTTP 404 Not Found");

        let outcome = build_index(&source, &Catalog::builtin()).await.unwrap();
        assert_eq!(outcome.skipped_categories, vec!["Food"]);
        assert!(!outcome
            .records
            .iter()
            .any(|r| r.kind == "log" && r.category.as_deref() == Some("Food")));
        assert!(outcome.records.iter().any(|r| r.title == "Stylo"));
    }

    #[tokio::test]
    async fn test_malformed_category_degrades() {
        let source = fixture_source();
        source.insert(&log_category_path("Music"), json!({ "oops": true }));

        let outcome = build_index(&source, &Catalog::builtin()).await.unwrap();
        assert_eq!(outcome.skipped_categories, vec!["Music"]);
        assert!(outcome.records.iter().any(|r| r.title == "Ramen"));
    }

    #[tokio::test]
    async fn test_required_source_failure_fails_build() {
        for path in [POSTS_PATH, PROJECTS_PATH, APPS_PATH] {
            let source = fixture_source();
            source.fail(path, "HTTP 500");
            let err = build_index(&source, &Catalog::builtin()).await.unwrap_err();
            assert!(format!("{:#}", err).contains("HTTP 500"), "{}", path);
        }
    }

    #[tokio::test]
    async fn test_invalid_required_payload_fails_build() {
        let source = fixture_source();
        source.insert(APPS_PATH, json!([1, 2, 3]));
        assert!(build_index(&source, &Catalog::builtin()).await.is_err());
    }

    #[tokio::test]
    async fn test_fixture_catalog() {
        let catalog = Catalog {
            log_categories: vec!["Music".to_string()],
            routes: Vec::new(),
            commands: Vec::new(),
        };
        let outcome = build_index(&fixture_source(), &catalog).await.unwrap();
        assert_eq!(kinds(&outcome.records), vec!["post", "post", "post", "project", "log", "app"]);
    }
}
