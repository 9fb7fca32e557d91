//! Core data models for the search index.
//!
//! [`SearchableRecord`] is the one shape every content collection is
//! flattened into. The `Raw*` types mirror the JSON payloads served by the
//! site and are deliberately lenient: content is hand-authored, so a stray
//! number where a string was expected should not sink a whole collection.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Well-known values of [`SearchableRecord::kind`].
///
/// The set is open: content may introduce other types, and the filter
/// engine treats the type as plain text.
pub mod record_type {
    pub const PAGE: &str = "page";
    pub const COMMAND: &str = "command";
    pub const POST: &str = "post";
    pub const PROJECT: &str = "project";
    pub const LOG: &str = "log";
    pub const APP: &str = "app";
}

/// A single entry of the flattened search index.
///
/// Either navigable (`path` set) or executable (`command_id` set).
/// Fields the index does not interpret are carried in `extra` and
/// serialized flat alongside the known ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchableRecord {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Display-only; not part of the match surface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchableRecord {
    /// A bare record with only the required fields set.
    pub fn new(title: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: kind.into(),
            path: None,
            command_id: None,
            slug: None,
            tags: None,
            technologies: None,
            category: None,
            description: None,
            extra: Map::new(),
        }
    }

    /// A static `page` record; the path doubles as the slug.
    pub fn page(title: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        let mut record = Self::new(title, record_type::PAGE);
        record.slug = Some(path.clone());
        record.path = Some(path);
        record
    }

    /// A static `command` record.
    pub fn command(title: impl Into<String>, command_id: impl Into<String>) -> Self {
        let mut record = Self::new(title, record_type::COMMAND);
        record.command_id = Some(command_id.into());
        record
    }
}

/// One element of a posts, projects, logs, or apps payload, before
/// normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    /// Route of an app entry.
    #[serde(default, deserialize_with = "lenient_string")]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub technologies: Option<Vec<String>>,
    /// Present on series wrappers in the posts payload.
    #[serde(default)]
    pub series: Option<RawSeries>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `series` object of a series wrapper post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSeries {
    #[serde(default)]
    pub posts: Vec<RawEntry>,
}

/// One category of the apps payload: `{ "apps": [...] }`.
///
/// A null or non-array `apps` reads as an empty category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppCategory {
    #[serde(default, deserialize_with = "lenient_entries")]
    pub apps: Vec<RawEntry>,
}

impl RawEntry {
    /// Parse a JSON array payload (posts, projects, one log category).
    pub fn list_from_value(value: Value) -> Result<Vec<RawEntry>> {
        serde_json::from_value(value).context("expected a JSON array of entries")
    }
}

impl AppCategory {
    /// Parse the apps payload, keeping categories in document order.
    pub fn map_from_value(value: Value) -> Result<Vec<(String, AppCategory)>> {
        let map: Map<String, Value> = match value {
            Value::Object(map) => map,
            other => anyhow::bail!(
                "expected a JSON object of app categories, got {}",
                json_kind(&other)
            ),
        };
        map.into_iter()
            .map(|(name, v)| {
                let category: AppCategory = serde_json::from_value(v)
                    .with_context(|| format!("invalid app category '{}'", name))?;
                Ok((name, category))
            })
            .collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

// Accepts `["a", "b"]`, `"a"`, or null. Non-string array members are dropped.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        Some(Value::String(s)) => Some(vec![s]),
        _ => None,
    })
}

// Non-object array members are dropped.
fn lenient_entries<'de, D>(deserializer: D) -> Result<Vec<RawEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}
