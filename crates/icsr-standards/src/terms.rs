//! Code/term mapping (MedDRA-style LLT -> LLT term + PT term).
//!
//! Lookup is by exact code string. A code with no row is not an
//! error: the caller records a per-case warning and substitutes the
//! raw code for the term.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::csv_utils::{find_column, open_reader, record_error};
use crate::error::Result;

/// One resolved term pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRow {
    pub llt_term: String,
    pub pt_term: String,
}

/// Immutable code -> term mapping for the batch.
#[derive(Debug, Clone, Default)]
pub struct TermMap {
    by_code: HashMap<String, TermRow>,
}

impl TermMap {
    /// Loads from a CSV with columns `LLT Code`, `LLT Term`, `PT Term`.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = open_reader(path)?;
        let headers = reader
            .headers()
            .map_err(|e| record_error(e, path))?
            .clone();
        let code_idx = find_column(&headers, "LLT Code", path)?;
        let llt_idx = find_column(&headers, "LLT Term", path)?;
        let pt_idx = find_column(&headers, "PT Term", path)?;

        let mut by_code = HashMap::new();
        for record in reader.records() {
            let record = record.map_err(|e| record_error(e, path))?;
            let code = record.get(code_idx).unwrap_or("").trim();
            if code.is_empty() {
                continue;
            }
            by_code.insert(
                code.to_string(),
                TermRow {
                    llt_term: record.get(llt_idx).unwrap_or("").trim().to_string(),
                    pt_term: record.get(pt_idx).unwrap_or("").trim().to_string(),
                },
            );
        }
        info!(rows = by_code.len(), path = %path.display(), "loaded term mapping");
        Ok(Self { by_code })
    }

    /// Builds a map in memory (tests, embedded defaults).
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, TermRow)>,
    {
        Self {
            by_code: rows.into_iter().collect(),
        }
    }

    pub fn lookup(&self, code: &str) -> Option<&TermRow> {
        self.by_code.get(code.trim())
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
