//! Multi-word substring filter over [`SearchableRecord`]s.
//!
//! A record matches when every whitespace-separated query token occurs,
//! case-insensitively, somewhere in its target text: title, type, tags,
//! technologies, and category joined by spaces. Tokens are ANDed, order is
//! irrelevant, and there is no word-boundary requirement (`"log"` matches
//! `"blogpost"`). The description is not searched.
//!
//! A query made only of whitespace yields no tokens and therefore matches
//! every record.

use crate::models::SearchableRecord;

/// Lowercase the query and split it into non-empty tokens.
pub fn tokenize_query(search_term: &str) -> Vec<String> {
    search_term
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// The lowercase text a record is matched against. Absent fields
/// contribute nothing.
pub fn target_text(record: &SearchableRecord) -> String {
    let mut parts: Vec<&str> = vec![record.title.as_str(), record.kind.as_str()];
    if let Some(tags) = &record.tags {
        parts.extend(tags.iter().map(String::as_str));
    }
    if let Some(technologies) = &record.technologies {
        parts.extend(technologies.iter().map(String::as_str));
    }
    if let Some(category) = &record.category {
        parts.push(category);
    }
    parts.join(" ").to_lowercase()
}

/// Return the records matching `search_term`, in their original order.
///
/// An empty term returns every record unchanged.
pub fn filter_items<'a>(
    items: &'a [SearchableRecord],
    search_term: &str,
) -> Vec<&'a SearchableRecord> {
    if search_term.is_empty() {
        return items.iter().collect();
    }
    let words = tokenize_query(search_term);
    items
        .iter()
        .filter(|record| matches_words(record, &words))
        .collect()
}

/// [`filter_items`] for callers holding an optional term; `None` behaves
/// like the empty string.
pub fn filter_items_opt<'a>(
    items: &'a [SearchableRecord],
    search_term: Option<&str>,
) -> Vec<&'a SearchableRecord> {
    filter_items(items, search_term.unwrap_or(""))
}

fn matches_words(record: &SearchableRecord, words: &[String]) -> bool {
    if words.is_empty() {
        return true;
    }
    let haystack = target_text(record);
    words.iter().all(|word| haystack.contains(word.as_str()))
}
