//! Launch registry: per-product market-availability dates.
//!
//! Each product carries a launch status and either one launch date or
//! a strength-keyed set of dates. The registry is loaded once per
//! batch and only read afterwards.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::csv_utils::{find_column, open_reader, record_error};
use crate::error::{Result, StandardsError};
use crate::normalize::normalize_name;

/// Launch status and payload for one product.
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchInfo {
    /// Launched everywhere on one date.
    Launched(NaiveDate),
    /// Launched per strength tier; keys are the reported strength
    /// values, compared numerically.
    LaunchedByStrength(Vec<(String, NaiveDate)>),
    /// Registered but not on the market yet.
    NotLaunched,
    /// Launch decision still awaited.
    Awaited,
}

impl LaunchInfo {
    /// True when validity rule 3 (product not launched) applies.
    pub fn blocks_validity(&self) -> bool {
        matches!(self, Self::NotLaunched | Self::Awaited)
    }

    /// The launch date a given drug exposure must not precede.
    ///
    /// For strength-gated products the strength-matched tier is used;
    /// when the strength is unknown or unmatched the *earliest* tier
    /// is the conservative fallback (an exposure before the earliest
    /// launch is before every launch).
    pub fn launch_date_for(&self, strength: Option<&str>) -> Option<NaiveDate> {
        match self {
            Self::Launched(date) => Some(*date),
            Self::LaunchedByStrength(tiers) => {
                if let Some(probe) = strength.and_then(parse_strength) {
                    for (tier, date) in tiers {
                        if parse_strength(tier) == Some(probe) {
                            return Some(*date);
                        }
                    }
                }
                tiers.iter().map(|(_, date)| *date).min()
            }
            Self::NotLaunched | Self::Awaited => None,
        }
    }
}

fn parse_strength(raw: &str) -> Option<f64> {
    let numeric: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    numeric.parse().ok()
}

/// Immutable launch registry keyed by normalized product name.
#[derive(Debug, Clone, Default)]
pub struct LaunchRegistry {
    by_product: HashMap<String, LaunchInfo>,
}

impl LaunchRegistry {
    /// Loads from a CSV with columns `Product`, `Status`, `Date`,
    /// `Strength`.
    ///
    /// Status values: `launched`, `launched_by_strength`,
    /// `not_launched`, `awaited`. Dates are `YYYY-MM-DD`. A
    /// strength-gated product has one row per tier.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = open_reader(path)?;
        let headers = reader
            .headers()
            .map_err(|e| record_error(e, path))?
            .clone();
        let product_idx = find_column(&headers, "Product", path)?;
        let status_idx = find_column(&headers, "Status", path)?;
        let date_idx = find_column(&headers, "Date", path)?;
        let strength_idx = find_column(&headers, "Strength", path)?;

        let mut registry = Self::default();
        for record in reader.records() {
            let record = record.map_err(|e| record_error(e, path))?;
            let product = normalize_name(record.get(product_idx).unwrap_or(""));
            if product.is_empty() {
                continue;
            }
            let status = record.get(status_idx).unwrap_or("").trim().to_lowercase();
            let date_raw = record.get(date_idx).unwrap_or("").trim();
            let strength = record.get(strength_idx).unwrap_or("").trim();

            match status.as_str() {
                "launched" => {
                    let date = parse_date(date_raw, path)?;
                    registry.by_product.insert(product, LaunchInfo::Launched(date));
                }
                "launched_by_strength" => {
                    let date = parse_date(date_raw, path)?;
                    match registry.by_product.get_mut(&product) {
                        Some(LaunchInfo::LaunchedByStrength(tiers)) => {
                            tiers.push((strength.to_string(), date));
                        }
                        _ => {
                            registry.by_product.insert(
                                product,
                                LaunchInfo::LaunchedByStrength(vec![(
                                    strength.to_string(),
                                    date,
                                )]),
                            );
                        }
                    }
                }
                "not_launched" => {
                    registry.by_product.insert(product, LaunchInfo::NotLaunched);
                }
                "awaited" => {
                    registry.by_product.insert(product, LaunchInfo::Awaited);
                }
                other => {
                    return Err(StandardsError::InvalidRow {
                        path: path.to_path_buf(),
                        message: format!("unknown launch status: {other}"),
                    });
                }
            }
        }
        info!(products = registry.by_product.len(), path = %path.display(), "loaded launch registry");
        Ok(registry)
    }

    /// Builds a registry in memory (tests).
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, LaunchInfo)>,
    {
        Self {
            by_product: entries
                .into_iter()
                .map(|(key, info)| (normalize_name(key), info))
                .collect(),
        }
    }

    pub fn get(&self, product: &str) -> Option<&LaunchInfo> {
        self.by_product.get(&normalize_name(product))
    }

    pub fn is_empty(&self) -> bool {
        self.by_product.is_empty()
    }
}

fn parse_date(raw: &str, path: &Path) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| StandardsError::InvalidRow {
        path: path.to_path_buf(),
        message: format!("invalid launch date: {raw}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn single_date_product() {
        let registry = LaunchRegistry::from_entries([(
            "Facetin",
            LaunchInfo::Launched(date(2022, 9, 8)),
        )]);
        let info = registry.get("FACETIN").expect("known product");
        assert_eq!(info.launch_date_for(None), Some(date(2022, 9, 8)));
        assert!(!info.blocks_validity());
    }

    #[test]
    fn strength_match_prefers_its_tier() {
        let info = LaunchInfo::LaunchedByStrength(vec![
            ("250".to_string(), date(2021, 1, 1)),
            ("500".to_string(), date(2023, 5, 1)),
        ]);
        assert_eq!(info.launch_date_for(Some("500")), Some(date(2023, 5, 1)));
        assert_eq!(info.launch_date_for(Some("500 mg")), Some(date(2023, 5, 1)));
    }

    #[test]
    fn unknown_strength_falls_back_to_earliest_tier() {
        let info = LaunchInfo::LaunchedByStrength(vec![
            ("250".to_string(), date(2021, 1, 1)),
            ("500".to_string(), date(2023, 5, 1)),
        ]);
        assert_eq!(info.launch_date_for(None), Some(date(2021, 1, 1)));
        assert_eq!(info.launch_date_for(Some("125")), Some(date(2021, 1, 1)));
    }

    #[test]
    fn awaited_blocks_validity_and_has_no_date() {
        assert!(LaunchInfo::Awaited.blocks_validity());
        assert_eq!(LaunchInfo::Awaited.launch_date_for(Some("10")), None);
    }
}
