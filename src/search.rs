//! `fezdex search`: build the index once and print the matching records.

use anyhow::{bail, Result};
use fezcodex_index_core::models::SearchableRecord;

use crate::config::Config;
use crate::index::SearchIndex;
use crate::sources::open_source;

/// Keep only records of the given type, if one is requested.
pub fn narrow_by_type(records: Vec<SearchableRecord>, kind: Option<&str>) -> Vec<SearchableRecord> {
    match kind {
        Some(kind) => records.into_iter().filter(|r| r.kind == kind).collect(),
        None => records,
    }
}

pub async fn run_search(
    config: &Config,
    query: &str,
    limit: Option<usize>,
    kind: Option<String>,
) -> Result<()> {
    let limit = limit.unwrap_or(config.search.default_limit);
    if limit == 0 {
        bail!("--limit must be >= 1");
    }

    let index = SearchIndex::new(open_source(&config.content)?, config.index.catalog());
    index.rebuild().await;

    let state = index.snapshot();
    if let Some(err) = &state.error {
        bail!("search index unavailable: {}", err);
    }

    let mut results = narrow_by_type(index.search(query, None), kind.as_deref());
    let total = results.len();
    results.truncate(limit);

    if results.is_empty() {
        println!("No results found for \"{}\".", query);
        return Ok(());
    }

    for (i, record) in results.iter().enumerate() {
        println!("{}. [{}] {}", i + 1, record.kind, record.title);
        if let Some(path) = &record.path {
            println!("    path: {}", path);
        }
        if let Some(command) = &record.command_id {
            println!("    command: {}", command);
        }
        if let Some(tags) = record.tags.as_ref().filter(|t| !t.is_empty()) {
            println!("    tags: {}", tags.join(", "));
        }
    }
    if total > results.len() {
        println!("({} of {} matches shown)", results.len(), total);
    }

    Ok(())
}
