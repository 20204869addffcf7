//! Unknown-token filtering.
//!
//! E2B senders mask or null out fields with a small set of marker
//! tokens. A marker must collapse to *absence* so that it contributes
//! nothing to the composed patient summary, instead of literally
//! rendering "Unknown". This module is the single place where that
//! collapse happens.

/// Markers meaning masked / unknown / not asked. Compared
/// case-insensitively against the trimmed value.
const UNKNOWN_TOKENS: &[&str] = &[
    "unknown",
    "unk",
    "asku",
    "nask",
    "msk",
    "masked",
    "not asked",
    "uns",
];

/// Collapses blank values and unknown-marker tokens to `None`.
pub fn filter_unknown(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if UNKNOWN_TOKENS.contains(&lower.as_str()) {
        return None;
    }
    Some(trimmed.to_string())
}

/// `filter_unknown` lifted over an optional source value.
pub fn filter_unknown_opt(value: Option<&str>) -> Option<String> {
    value.and_then(filter_unknown)
}
