//! Listedness reference table: (product, adverse-event-term) pairs
//! already documented as expected.
//!
//! Both columns are normalized at load time; lookups normalize their
//! inputs the same way. The derived known-product set distinguishes a
//! stale table (product absent entirely) from an unlisted event.

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::csv_utils::{find_column, open_reader, record_error};
use crate::error::Result;
use crate::normalize::normalize_name;

/// Immutable listedness pair-set for the batch.
#[derive(Debug, Clone, Default)]
pub struct ListednessTable {
    pairs: HashSet<(String, String)>,
    products: HashSet<String>,
}

impl ListednessTable {
    /// Loads from a CSV with columns `Drug Name`, `Event Term`.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = open_reader(path)?;
        let headers = reader
            .headers()
            .map_err(|e| record_error(e, path))?
            .clone();
        let drug_idx = find_column(&headers, "Drug Name", path)?;
        let event_idx = find_column(&headers, "Event Term", path)?;

        let mut table = Self::default();
        for record in reader.records() {
            let record = record.map_err(|e| record_error(e, path))?;
            let drug = normalize_name(record.get(drug_idx).unwrap_or(""));
            let event = normalize_name(record.get(event_idx).unwrap_or(""));
            if drug.is_empty() || event.is_empty() {
                continue;
            }
            table.products.insert(drug.clone());
            table.pairs.insert((drug, event));
        }
        info!(
            pairs = table.pairs.len(),
            products = table.products.len(),
            path = %path.display(),
            "loaded listedness table"
        );
        Ok(table)
    }

    /// Builds a table in memory (tests).
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut table = Self::default();
        for (drug, event) in pairs {
            let drug = normalize_name(drug);
            let event = normalize_name(event);
            table.products.insert(drug.clone());
            table.pairs.insert((drug, event));
        }
        table
    }

    /// True when the table covers this product at all.
    pub fn knows_product(&self, product: &str) -> bool {
        self.products.contains(&normalize_name(product))
    }

    /// True when (product, term) is a documented expected pair.
    pub fn is_listed(&self, product: &str, term: &str) -> bool {
        self.pairs
            .contains(&(normalize_name(product), normalize_name(term)))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_normalized_on_both_sides() {
        let table = ListednessTable::from_pairs([("Facetin", "Headache")]);
        assert!(table.is_listed("FACETIN", "headache"));
        assert!(table.is_listed("facetin.", "Headache!"));
        assert!(!table.is_listed("Facetin", "Nausea"));
    }

    #[test]
    fn known_products_track_coverage_not_listing() {
        let table = ListednessTable::from_pairs([("Facetin", "Headache")]);
        assert!(table.knows_product("Facetin"));
        assert!(!table.knows_product("Otherdrug"));
    }
}
