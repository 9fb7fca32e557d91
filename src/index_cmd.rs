//! `fezdex index`: build once and summarize, or dump the records as JSON.

use anyhow::{bail, Result};
use std::collections::BTreeMap;

use crate::config::Config;
use crate::index::SearchIndex;
use crate::sources::open_source;

pub async fn run_index(config: &Config, json: bool) -> Result<()> {
    let source = open_source(&config.content)?;
    let index = SearchIndex::new(source.clone(), config.index.catalog());
    index.rebuild().await;

    let state = index.snapshot();
    if let Some(err) = &state.error {
        bail!("failed to build search index: {}", err);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(state.items.as_slice())?);
        return Ok(());
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in state.items.iter() {
        *counts.entry(record.kind.as_str()).or_default() += 1;
    }

    println!("index {}", source.describe());
    for (kind, count) in &counts {
        println!("  {:<10} {}", kind, count);
    }
    println!("  total:     {}", state.items.len());
    if !state.skipped_categories.is_empty() {
        println!(
            "  skipped log categories: {}",
            state.skipped_categories.join(", ")
        );
    }
    println!("ok");

    Ok(())
}
