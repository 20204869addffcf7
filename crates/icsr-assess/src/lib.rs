//! Case assessment: the derived judgments of the triage engine.
//!
//! Wires the extracted fields of one report through product matching,
//! the ordered validity rules, per-product listedness, reportability
//! classification, and the anomaly detectors.

pub mod comments;
pub mod listedness;
pub mod matcher;
pub mod pipeline;
pub mod reportability;
pub mod validity;

pub use comments::{
    collect_comments, detect_brand_tag, detect_competitor_lot, detect_license_number,
};
pub use listedness::evaluate_listedness;
pub use matcher::match_product;
pub use pipeline::{ReferenceTables, assess_case, process_document, process_file};
pub use reportability::classify_reportability;
pub use validity::{ValidityContext, evaluate_validity};

#[cfg(test)]
mod proptests {
    use icsr_standards::normalize_name;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalize_name_is_idempotent(raw in ".{0,64}") {
            let once = normalize_name(&raw);
            prop_assert_eq!(normalize_name(&once), once.clone());
        }

        #[test]
        fn normalized_names_contain_only_word_chars_and_separators(raw in ".{0,64}") {
            let normalized = normalize_name(&raw);
            prop_assert!(
                normalized
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == ' ' || c == '+' || c == '-')
            );
            prop_assert!(!normalized.starts_with(' '));
            prop_assert!(!normalized.ends_with(' '));
        }
    }
}
