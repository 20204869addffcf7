//! Per-product-per-event listedness evaluation.
//!
//! Listedness is product-specific: with two matched suspects, an
//! event can be expected for one product and novel for the other, so
//! results are reported per product per event and never merged.
//!
//! Three mutually exclusive situations per product:
//! - no reference table was supplied at all -> `Reference not uploaded`;
//! - the table exists but does not cover the product -> `Reference not
//!   updated` (the table is stale; this says nothing about the event);
//! - the product is covered -> `Listed`/`Unlisted` per event.

use icsr_model::{CaseRecord, Listedness, ListednessEntry};
use icsr_standards::ListednessTable;

/// Evaluates listedness for a case already judged valid.
///
/// The caller gates on validity; Non-Valid cases must not reach this
/// function and carry an empty listedness list.
pub fn evaluate_listedness(
    record: &CaseRecord,
    table: Option<&ListednessTable>,
) -> Vec<ListednessEntry> {
    let mut entries = Vec::new();

    for product in record.matched_products() {
        for event in &record.events {
            let term = event.resolved_term();
            let status = match table {
                None => Listedness::ReferenceNotUploaded,
                Some(table) if !table.knows_product(product) => Listedness::ReferenceNotUpdated,
                Some(table) => {
                    if table.is_listed(product, term) {
                        Listedness::Listed
                    } else {
                        Listedness::Unlisted
                    }
                }
            };
            entries.push(ListednessEntry {
                product: product.to_string(),
                event_seq: event.seq,
                event_term: term.to_string(),
                status,
            });
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use icsr_model::{AdverseEvent, SuspectDrug};

    fn case(products: &[&str], terms: &[&str]) -> CaseRecord {
        CaseRecord {
            drugs: products
                .iter()
                .map(|p| SuspectDrug {
                    name: p.to_string(),
                    product_key: Some(p.to_string()),
                    ..SuspectDrug::default()
                })
                .collect(),
            events: terms
                .iter()
                .enumerate()
                .map(|(i, t)| AdverseEvent {
                    seq: i + 1,
                    llt_term: Some(t.to_string()),
                    ..AdverseEvent::default()
                })
                .collect(),
            ..CaseRecord::default()
        }
    }

    #[test]
    fn no_table_means_reference_not_uploaded() {
        let record = case(&["Facetin"], &["Headache"]);
        let entries = evaluate_listedness(&record, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, Listedness::ReferenceNotUploaded);
    }

    #[test]
    fn uncovered_product_means_reference_not_updated() {
        let table = ListednessTable::from_pairs([("Otherdrug", "Nausea")]);
        let record = case(&["Facetin"], &["Headache"]);
        let entries = evaluate_listedness(&record, Some(&table));
        assert_eq!(entries[0].status, Listedness::ReferenceNotUpdated);
    }

    #[test]
    fn covered_product_classifies_each_event() {
        let table = ListednessTable::from_pairs([("Facetin", "Headache")]);
        let record = case(&["Facetin"], &["Headache", "Nausea"]);
        let entries = evaluate_listedness(&record, Some(&table));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].status, Listedness::Listed);
        assert_eq!(entries[1].status, Listedness::Unlisted);
    }

    #[test]
    fn two_products_are_reported_separately() {
        let table = ListednessTable::from_pairs([("Facetin", "Headache")]);
        let record = case(&["Facetin", "Zolid Plus"], &["Headache"]);
        let entries = evaluate_listedness(&record, Some(&table));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].product, "Facetin");
        assert_eq!(entries[0].status, Listedness::Listed);
        assert_eq!(entries[1].product, "Zolid Plus");
        assert_eq!(entries[1].status, Listedness::ReferenceNotUpdated);
    }

    #[test]
    fn event_term_falls_back_to_raw_code() {
        let table = ListednessTable::from_pairs([("Facetin", "10019211")]);
        let mut record = case(&["Facetin"], &[]);
        record.events.push(AdverseEvent {
            seq: 1,
            llt_code: Some("10019211".to_string()),
            ..AdverseEvent::default()
        });
        let entries = evaluate_listedness(&record, Some(&table));
        assert_eq!(entries[0].status, Listedness::Listed);
    }
}
