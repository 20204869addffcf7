//! Anomaly detection over per-drug text fragments.
//!
//! Three independent detectors, each a pure function returning zero
//! or more advisory strings. Comments never change validity on their
//! own; they only demand a manual look.

use std::sync::LazyLock;

use icsr_model::{BatchConfig, CaseRecord};
use icsr_standards::CompetitorList;
use regex::Regex;

/// Regulatory authorization number: a short alphabetic prefix
/// followed by two slash-separated numeric groups (e.g. `MB/06/292`).
static LICENSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z]{1,5}/\d+/\d+\b").expect("license pattern compiles")
});

/// Bracketed tag on a product name: `(...)` or `[...]`.
static BRACKET_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]*)\)|\[([^\]]*)\]").expect("tag pattern compiles"));

/// Trailing `by <organization>` suffix on a product name.
static BY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bby\s+([^()\[\]]+)$").expect("by pattern compiles"));

/// Detector (a): embedded regulatory license numbers in product text.
pub fn detect_license_number(text: &str) -> Vec<String> {
    LICENSE_RE
        .find_iter(text)
        .map(|m| {
            format!(
                "License number '{}' embedded in product text: possible product-identity mismatch",
                m.as_str()
            )
        })
        .collect()
}

/// Detector (b): lot-number text naming a competitor.
///
/// The operating company's own name never triggers the detector.
pub fn detect_competitor_lot(
    lot: &str,
    competitors: &CompetitorList,
    config: &BatchConfig,
) -> Vec<String> {
    let lot_lower = lot.to_lowercase();
    let company = config.company_lower();
    competitors
        .iter()
        .filter(|name| {
            let name_lower = name.to_lowercase();
            name_lower != company && lot_lower.contains(&name_lower)
        })
        .map(|name| format!("Lot number '{lot}' references competitor '{name}': possible mislabeled lot"))
        .collect()
}

/// Detector (c): a bracketed or `by <name>` tag on the product name
/// naming an organization other than the operating company.
///
/// Bracketed tags are flagged only when they contain a known
/// competitor name (brackets also carry strengths and formulations);
/// an explicit `by <name>` suffix always names an organization and is
/// flagged whenever it does not mention the company.
pub fn detect_brand_tag(
    name: &str,
    competitors: &CompetitorList,
    config: &BatchConfig,
) -> Vec<String> {
    let company = config.company_lower();
    let mut comments = Vec::new();

    for captures in BRACKET_TAG_RE.captures_iter(name) {
        let tag = captures
            .get(1)
            .or_else(|| captures.get(2))
            .map(|m| m.as_str().trim())
            .unwrap_or("");
        if tag.is_empty() || tag.to_lowercase().contains(&company) {
            continue;
        }
        let tag_lower = tag.to_lowercase();
        for competitor in competitors.iter() {
            let competitor_lower = competitor.to_lowercase();
            if competitor_lower != company && tag_lower.contains(&competitor_lower) {
                comments.push(format!(
                    "Product name tagged with '{tag}', naming {competitor} rather than {}: possible molecule/brand mismatch",
                    config.company_name
                ));
            }
        }
    }

    if let Some(captures) = BY_TAG_RE.captures(name)
        && let Some(org) = captures.get(1)
    {
        let org = org.as_str().trim();
        if !org.is_empty() && !org.to_lowercase().contains(&company) {
            comments.push(format!(
                "Product name attributed to '{org}' rather than {}: possible molecule/brand mismatch",
                config.company_name
            ));
        }
    }

    comments
}

/// Runs all three detectors over every suspect drug and accumulates a
/// deduplicated, order-stable comment list.
pub fn collect_comments(
    record: &CaseRecord,
    competitors: &CompetitorList,
    config: &BatchConfig,
) -> Vec<String> {
    let mut comments: Vec<String> = Vec::new();
    let mut push_all = |mut found: Vec<String>, comments: &mut Vec<String>| {
        for comment in found.drain(..) {
            if !comments.contains(&comment) {
                comments.push(comment);
            }
        }
    };

    for drug in &record.drugs {
        let fragments = [
            Some(drug.name.as_str()),
            drug.manufacturer.as_deref(),
            drug.dosage_text.as_deref(),
            drug.formulation.as_deref(),
            drug.lot_number.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

        push_all(detect_license_number(&fragments), &mut comments);
        if let Some(lot) = drug.lot_number.as_deref() {
            push_all(detect_competitor_lot(lot, competitors, config), &mut comments);
        }
        push_all(detect_brand_tag(&drug.name, competitors, config), &mut comments);
    }
    comments
}
