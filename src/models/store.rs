// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label store state.
//!
//! The label store maps an image path to the regions labeled on that
//! image. It is loaded once per session and rewritten in full after every
//! processed image.

use super::region::{Rect, Region};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Regions of one image, keyed by their zero-based selection index.
pub type LabelEntry = BTreeMap<usize, Region>;

/// Complete label store for serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelStore {
    entries: BTreeMap<String, LabelEntry>,
}

impl LabelStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for `image` with the given labeled rectangles.
    ///
    /// Indices are assigned densely from zero in the order given. An empty
    /// list leaves any existing entry untouched.
    pub fn set_regions(&mut self, image: &str, regions: Vec<(Rect, String)>) {
        if regions.is_empty() {
            return;
        }
        let entry: LabelEntry = regions
            .into_iter()
            .enumerate()
            .map(|(index, (coords, class_name))| (index, Region::new(coords, class_name)))
            .collect();
        self.entries.insert(image.to_string(), entry);
    }

    pub fn get(&self, image: &str) -> Option<&LabelEntry> {
        self.entries.get(image)
    }

    pub fn contains(&self, image: &str) -> bool {
        self.entries.contains_key(image)
    }

    /// Keys of every image that already has labels.
    pub fn image_keys(&self) -> BTreeSet<String> {
        self.entries.keys().cloned().collect()
    }

    /// Number of labeled images.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of labeled regions across all images.
    pub fn region_count(&self) -> usize {
        self.entries.values().map(|entry| entry.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_regions_assigns_dense_indices() {
        let mut store = LabelStore::new();
        store.set_regions(
            "a.jpg",
            vec![
                (Rect::new(0, 0, 4, 4), "dog".to_string()),
                (Rect::new(5, 5, 2, 2), "cat".to_string()),
            ],
        );

        let entry = store.get("a.jpg").unwrap();
        assert_eq!(entry.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(entry[&1].class_name, "cat");
        assert_eq!(store.region_count(), 2);
    }

    #[test]
    fn test_empty_selection_keeps_previous_entry() {
        let mut store = LabelStore::new();
        store.set_regions("a.jpg", vec![(Rect::new(1, 2, 3, 4), "bird".to_string())]);
        store.set_regions("a.jpg", Vec::new());
        store.set_regions("b.jpg", Vec::new());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a.jpg").unwrap()[&0].class_name, "bird");
        assert!(!store.contains("b.jpg"));
    }

    #[test]
    fn test_relabel_replaces_entry() {
        let mut store = LabelStore::new();
        store.set_regions(
            "a.jpg",
            vec![
                (Rect::new(0, 0, 1, 1), "x".to_string()),
                (Rect::new(1, 1, 1, 1), "y".to_string()),
            ],
        );
        store.set_regions("a.jpg", vec![(Rect::new(2, 2, 2, 2), "z".to_string())]);

        let entry = store.get("a.jpg").unwrap();
        assert_eq!(entry.len(), 1);
        assert_eq!(entry[&0], Region::new(Rect::new(2, 2, 2, 2), "z"));
    }

    #[test]
    fn test_store_json_shape() {
        let mut store = LabelStore::new();
        store.set_regions("img1.jpg", vec![(Rect::new(10, 10, 50, 50), "cat".to_string())]);

        let value = serde_json::to_value(&store).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"img1.jpg": {"0": {"coords": [10, 10, 50, 50], "class": "cat"}}})
        );
    }
}
