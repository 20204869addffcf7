//! Batch configuration.

use serde::{Deserialize, Serialize};

/// Immutable configuration shared by every case evaluation in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Operating-company name. Used by the non-company-product rule
    /// (manufacturer text must mention it) and by the anomaly
    /// detectors (competitor names exclude it).
    pub company_name: String,
}

impl BatchConfig {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
        }
    }

    /// Lowercased company name for case-insensitive containment checks.
    pub fn company_lower(&self) -> String {
        self.company_name.to_lowercase()
    }
}
