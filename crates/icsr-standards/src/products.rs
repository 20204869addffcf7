//! Controlled company product vocabulary.
//!
//! Entry order is fixed and meaningful: the matcher scans entries in
//! vocabulary order and the first whole-word hit wins, with no
//! best-match scoring. A normalized-key subset marks membership in
//! the secondary regulatory category (category 2), consumed only by
//! the reportability classifier.

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::csv_utils::{find_column, open_reader, record_error};
use crate::error::Result;
use crate::normalize::normalize_name;

/// One vocabulary entry: canonical key plus its normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductEntry {
    /// Canonical product key as it appears in the vocabulary.
    pub key: String,
    /// Normalized form used for matching.
    pub normalized: String,
}

/// Immutable product vocabulary for the batch.
#[derive(Debug, Clone, Default)]
pub struct ProductVocabulary {
    entries: Vec<ProductEntry>,
    category2: HashSet<String>,
}

impl ProductVocabulary {
    /// Loads from a CSV with columns `Product` and `Category` (rows
    /// whose category is `2` join the secondary regulatory category).
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = open_reader(path)?;
        let headers = reader
            .headers()
            .map_err(|e| record_error(e, path))?
            .clone();
        let product_idx = find_column(&headers, "Product", path)?;
        let category_idx = find_column(&headers, "Category", path)?;

        let mut vocabulary = Self::default();
        for record in reader.records() {
            let record = record.map_err(|e| record_error(e, path))?;
            let key = record.get(product_idx).unwrap_or("").trim();
            if key.is_empty() {
                continue;
            }
            let category2 = record.get(category_idx).unwrap_or("").trim() == "2";
            vocabulary.push(key, category2);
        }
        info!(
            products = vocabulary.entries.len(),
            category2 = vocabulary.category2.len(),
            path = %path.display(),
            "loaded product vocabulary"
        );
        Ok(vocabulary)
    }

    /// Builds a vocabulary in memory, preserving entry order.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut vocabulary = Self::default();
        for (key, category2) in entries {
            vocabulary.push(key, category2);
        }
        vocabulary
    }

    fn push(&mut self, key: &str, category2: bool) {
        let normalized = normalize_name(key);
        if normalized.is_empty() || self.entries.iter().any(|e| e.normalized == normalized) {
            return;
        }
        if category2 {
            self.category2.insert(normalized.clone());
        }
        self.entries.push(ProductEntry {
            key: key.to_string(),
            normalized,
        });
    }

    /// Entries in fixed vocabulary order.
    pub fn entries(&self) -> &[ProductEntry] {
        &self.entries
    }

    /// Whether a matched canonical key belongs to category 2.
    pub fn is_category2(&self, key: &str) -> bool {
        self.category2.contains(&normalize_name(key))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_normalized_keys_keep_first_entry() {
        let vocabulary =
            ProductVocabulary::from_entries([("Facetin", false), ("FACETIN.", true)]);
        assert_eq!(vocabulary.entries().len(), 1);
        assert_eq!(vocabulary.entries()[0].key, "Facetin");
        // the duplicate's category flag is discarded with it
        assert!(!vocabulary.is_category2("Facetin"));
    }

    #[test]
    fn category2_membership_is_normalized() {
        let vocabulary = ProductVocabulary::from_entries([("Zolid Plus", true)]);
        assert!(vocabulary.is_category2("zolid plus"));
        assert!(vocabulary.is_category2("ZOLID, PLUS"));
    }

    #[test]
    fn missing_vocabulary_file_is_an_io_error() {
        let err = ProductVocabulary::load(Path::new("no/such/products.csv"))
            .expect_err("missing file");
        assert!(matches!(err, crate::error::StandardsError::Io { .. }));
    }
}
