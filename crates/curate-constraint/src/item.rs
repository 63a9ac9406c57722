//! Records handed to the constraint engine

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Path-derived facts for one record (`path.file`, `path.parent`, `path.ext`, `path.<capture>`)
pub type PathMetadata = BTreeMap<String, String>;

/// One validated record
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub type_name: String,
    /// Repository-relative source path with forward slashes
    pub file_path: String,
    /// Data row for tabular sources; `None` for whole-file records
    pub row_index: Option<usize>,
    pub data: Value,
    pub path_metadata: PathMetadata,
}

impl Item {
    pub fn new(type_name: impl Into<String>, file_path: impl Into<String>, data: Value) -> Self {
        Self {
            type_name: type_name.into(),
            file_path: file_path.into(),
            row_index: None,
            data,
            path_metadata: PathMetadata::new(),
        }
    }

    pub fn with_row(mut self, row_index: usize) -> Self {
        self.row_index = Some(row_index);
        self
    }

    pub fn with_path_metadata(mut self, path_metadata: PathMetadata) -> Self {
        self.path_metadata = path_metadata;
        self
    }
}

/// Every item of a run, grouped by owning type
#[derive(Debug, Default)]
pub struct ItemCorpus {
    by_type: HashMap<String, Vec<Item>>,
}

impl ItemCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: Item) {
        self.by_type
            .entry(item.type_name.clone())
            .or_default()
            .push(item);
    }

    /// Items of one type in insertion order; empty for unknown types
    pub fn items_of(&self, type_name: &str) -> &[Item] {
        self.by_type
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_type.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Item> for ItemCorpus {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        let mut corpus = ItemCorpus::new();
        for item in iter {
            corpus.push(item);
        }
        corpus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_corpus_groups_by_type() {
        let corpus: ItemCorpus = vec![
            Item::new("team", "teams/a.yaml", json!({"id": "a"})),
            Item::new("user", "users/u.yaml", json!({"id": "u"})),
            Item::new("team", "teams/b.yaml", json!({"id": "b"})),
        ]
        .into_iter()
        .collect();

        assert_eq!(corpus.len(), 3);
        let teams = corpus.items_of("team");
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].file_path, "teams/a.yaml");
        assert_eq!(teams[1].file_path, "teams/b.yaml");
    }

    #[test]
    fn test_unknown_type_is_empty() {
        let corpus = ItemCorpus::new();
        assert!(corpus.items_of("ghost").is_empty());
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_row_index() {
        let item = Item::new("row", "data.csv", json!({})).with_row(4);
        assert_eq!(item.row_index, Some(4));
    }
}
