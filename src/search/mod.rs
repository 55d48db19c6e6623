//! Flat, append-only search index over compiled entries.
//!
//! One index spans every compiled tree. A query matches an entry when its
//! title or description contains the query case-insensitively, or is within
//! [`MAX_DISTANCE`] edits of it.

mod distance;

pub use distance::within;

use crate::compiler::CompiledEntry;
use crate::visualizer::RenderHandle;

/// Queries shorter than this (in characters) never match anything.
pub const MIN_QUERY_LEN: usize = 2;
pub const MAX_DISTANCE: usize = 2;

#[derive(Clone, Debug)]
struct IndexedEntry {
    title: String,
    description: Option<String>,
    folded_title: String,
    folded_description: Option<String>,
    widget: RenderHandle,
}

/// A matching entry, borrowed from the index.
#[derive(Clone, Copy, Debug)]
pub struct SearchHit<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub widget: &'a RenderHandle,
}

#[derive(Debug, Default)]
pub struct SearchIndex {
    entries: Vec<IndexedEntry>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&mut self, entry: &CompiledEntry) {
        self.entries.push(IndexedEntry {
            title: entry.title().to_owned(),
            description: entry.description().map(str::to_owned),
            folded_title: entry.title().to_lowercase(),
            folded_description: entry.description().map(str::to_lowercase),
            widget: entry.widget().clone(),
        });
    }

    /// Matching widgets in index order.
    pub fn query(&self, text: &str) -> Vec<RenderHandle> {
        self.hits(text)
            .into_iter()
            .map(|hit| hit.widget.clone())
            .collect()
    }

    /// Like [`query`](Self::query), keeping the title and description each
    /// widget was indexed under.
    pub fn hits(&self, text: &str) -> Vec<SearchHit<'_>> {
        if text.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        let needle = text.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                field_matches(&entry.folded_title, &needle)
                    || entry
                        .folded_description
                        .as_deref()
                        .is_some_and(|description| field_matches(description, &needle))
            })
            .map(|entry| SearchHit {
                title: &entry.title,
                description: entry.description.as_deref(),
                widget: &entry.widget,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn field_matches(field: &str, needle: &str) -> bool {
    field.contains(needle) || distance::within(field, needle, MAX_DISTANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::WidgetSpec;

    fn entry(title: &str, description: Option<&str>) -> CompiledEntry {
        CompiledEntry::new(
            title.to_owned(),
            description.map(str::to_owned),
            None,
            RenderHandle::new(WidgetSpec::Toggle),
        )
    }

    fn titles(index: &SearchIndex, text: &str) -> Vec<String> {
        index
            .hits(text)
            .into_iter()
            .map(|hit| hit.title.to_owned())
            .collect()
    }

    #[test]
    fn single_character_queries_match_nothing() {
        let mut index = SearchIndex::new();
        index.index(&entry("a", None));
        index.index(&entry("Audio", None));
        assert!(index.query("a").is_empty());
        assert!(index.query("").is_empty());
    }

    #[test]
    fn substring_and_typo_matches_keep_index_order() {
        let mut index = SearchIndex::new();
        index.index(&entry("Volume", None));
        index.index(&entry("Brightness", None));
        index.index(&entry("Volme", None));
        index.index(&entry("Master", Some("Overall VOLUME of the mix")));

        assert_eq!(titles(&index, "vol"), ["Volume", "Volme", "Master"]);
        assert_eq!(titles(&index, "Brihgtness"), ["Brightness"]);
    }

    #[test]
    fn typo_tolerance_stops_at_two_edits() {
        let mut index = SearchIndex::new();
        index.index(&entry("Gamma", None));
        assert_eq!(titles(&index, "Gamer"), ["Gamma"]);
        assert!(titles(&index, "Gxmxr").is_empty());
    }

    #[test]
    fn query_returns_the_indexed_handles() {
        let mut index = SearchIndex::new();
        let volume = entry("Volume", None);
        index.index(&volume);

        let results = index.query("Volume");
        assert_eq!(results.len(), 1);
        assert!(results[0].ptr_eq(volume.widget()));

        index.clear();
        assert!(index.query("Volume").is_empty());
    }
}
