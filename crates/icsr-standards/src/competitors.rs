//! Competitor/company name list.
//!
//! A flat list of organization names consumed only by the anomaly
//! detectors (competitor tokens in lot numbers, mismatched brand
//! tags). The operating company's own name is filtered out at scan
//! time, not at load time, so one list can serve deployments under
//! different operating companies.

use std::path::Path;

use tracing::info;

use crate::csv_utils::{open_file, record_error};
use crate::error::Result;

/// Immutable organization-name list for the batch.
#[derive(Debug, Clone, Default)]
pub struct CompetitorList {
    names: Vec<String>,
}

impl CompetitorList {
    /// Loads from a headerless single-column CSV (one name per line).
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(open_file(path)?);

        let mut names = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| record_error(e, path))?;
            let name = record.get(0).unwrap_or("").trim();
            if !name.is_empty() && !names.iter().any(|n: &String| n.eq_ignore_ascii_case(name)) {
                names.push(name.to_string());
            }
        }
        info!(names = names.len(), path = %path.display(), "loaded competitor list");
        Ok(Self { names })
    }

    /// Builds a list in memory (tests).
    pub fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            names: names.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
