//! Per-source normalization into [`SearchableRecord`]s.
//!
//! Each content collection has its own native shape, so each gets one pure
//! mapping function. [`assemble`] concatenates the results with the static
//! tables in the fixed display order.
//!
//! Entries that cannot produce a valid record are dropped: a missing or
//! empty `title` everywhere, a missing `slug` where the route is derived
//! from it (posts, projects, logs), and a missing `to` for apps.

use crate::catalog::Catalog;
use crate::models::{record_type, AppCategory, RawEntry, SearchableRecord};

// Keys owned by the record itself; a raw entry carrying them must not
// shadow the normalized values when `extra` is flattened back out.
const RESERVED_KEYS: [&str; 3] = ["type", "path", "commandId"];

/// Expand the posts payload. Series wrappers are unrolled into one record
/// per episode titled `"<series>: <episode>"`; the wrapper itself is not
/// emitted.
pub fn normalize_posts(entries: Vec<RawEntry>) -> Vec<SearchableRecord> {
    let mut records = Vec::new();
    for mut entry in entries {
        match entry.series.take() {
            Some(series) => {
                let series_title = entry.title.unwrap_or_default();
                for episode in series.posts {
                    let Some(title) = non_empty(episode.title.as_deref()) else {
                        continue;
                    };
                    let title = if series_title.is_empty() {
                        title.to_string()
                    } else {
                        format!("{}: {}", series_title, title)
                    };
                    if let Some(record) = slug_routed(episode, record_type::POST, title, "/blog")
                    {
                        records.push(record);
                    }
                }
            }
            None => {
                let Some(title) = non_empty(entry.title.as_deref()).map(str::to_string) else {
                    continue;
                };
                if let Some(record) = slug_routed(entry, record_type::POST, title, "/blog") {
                    records.push(record);
                }
            }
        }
    }
    records
}

/// Tag projects and route them to `/projects/{slug}`.
pub fn normalize_projects(entries: Vec<RawEntry>) -> Vec<SearchableRecord> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let title = non_empty(entry.title.as_deref())?.to_string();
            slug_routed(entry, record_type::PROJECT, title, "/projects")
        })
        .collect()
}

/// Flatten per-category log lists into one list routed to
/// `/logs/{category}/{slug}`.
///
/// Each group pairs the category a list was fetched under with its
/// entries. The route uses the entry's own `category`; the fetch category
/// only fills in when the entry has none or an empty one.
pub fn normalize_logs(groups: Vec<(String, Vec<RawEntry>)>) -> Vec<SearchableRecord> {
    let mut records = Vec::new();
    for (fetched_category, entries) in groups {
        for mut entry in entries {
            let Some(title) = non_empty(entry.title.as_deref()).map(str::to_string) else {
                continue;
            };
            let Some(slug) = entry.slug.clone() else {
                continue;
            };
            let category = entry
                .category
                .take()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| fetched_category.clone());
            entry.category = Some(category.clone());
            let path = format!("/logs/{}/{}", category.to_lowercase(), slug);
            records.push(into_record(entry, record_type::LOG, title, Some(path)));
        }
    }
    records
}

/// Flatten all app categories, routing each app to its own `to` field.
pub fn normalize_apps(categories: Vec<(String, AppCategory)>) -> Vec<SearchableRecord> {
    categories
        .into_iter()
        .flat_map(|(_, category)| category.apps)
        .filter_map(|mut app| {
            let title = non_empty(app.title.as_deref())?.to_string();
            let path = app.to.take()?;
            Some(into_record(app, record_type::APP, title, Some(path)))
        })
        .collect()
}

/// The normalized dynamic collections of one build.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub posts: Vec<SearchableRecord>,
    pub projects: Vec<SearchableRecord>,
    pub logs: Vec<SearchableRecord>,
    pub apps: Vec<SearchableRecord>,
}

/// Concatenate: static routes, static commands, posts, projects, logs, apps.
pub fn assemble(catalog: &Catalog, collections: Collections) -> Vec<SearchableRecord> {
    let mut items = catalog.route_records();
    items.extend(catalog.command_records());
    items.extend(collections.posts);
    items.extend(collections.projects);
    items.extend(collections.logs);
    items.extend(collections.apps);
    items
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn slug_routed(
    entry: RawEntry,
    kind: &str,
    title: String,
    prefix: &str,
) -> Option<SearchableRecord> {
    let path = format!("{}/{}", prefix, entry.slug.as_deref()?);
    Some(into_record(entry, kind, title, Some(path)))
}

fn into_record(
    entry: RawEntry,
    kind: &str,
    title: String,
    path: Option<String>,
) -> SearchableRecord {
    let mut extra = entry.extra;
    for key in RESERVED_KEYS {
        extra.remove(key);
    }
    SearchableRecord {
        title,
        kind: kind.to_string(),
        path,
        command_id: None,
        slug: entry.slug,
        tags: entry.tags,
        technologies: entry.technologies,
        category: entry.category,
        description: entry.description,
        extra,
    }
}
