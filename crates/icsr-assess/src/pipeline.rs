//! Per-case assembly: extractor output -> assessed `CaseRecord`.
//!
//! One report flows extractor -> term resolution -> product matcher
//! -> anomaly detectors -> validity -> listedness (gated) ->
//! reportability. The record is not touched again after this function
//! returns.

use std::path::Path;

use icsr_ingest::{ExtractedCase, extract_case, extract_file, parse_document};
use icsr_model::{BatchConfig, CaseRecord, Listedness};
use icsr_standards::{
    CompetitorList, LaunchRegistry, ListednessTable, ProductVocabulary, TermMap,
};
use tracing::{info, warn};

use crate::comments::collect_comments;
use crate::listedness::evaluate_listedness;
use crate::matcher::match_product;
use crate::reportability::classify_reportability;
use crate::validity::{ValidityContext, evaluate_validity};

/// The read-only reference tables of one batch.
///
/// Loaded once before the first file, then only borrowed. The term
/// mapping and listedness table are optional: their absence degrades
/// to warnings and `Reference not uploaded`, never to an error.
#[derive(Debug, Default)]
pub struct ReferenceTables {
    pub terms: Option<TermMap>,
    pub listedness: Option<ListednessTable>,
    pub competitors: CompetitorList,
    pub vocabulary: ProductVocabulary,
    pub launch: LaunchRegistry,
}

/// Assembles and assesses one case from extractor output.
pub fn assess_case(
    extracted: ExtractedCase,
    file_name: &str,
    serial: usize,
    refs: &ReferenceTables,
    config: &BatchConfig,
) -> CaseRecord {
    let mut record = CaseRecord {
        file_name: file_name.to_string(),
        serial,
        sender_id: extracted.sender_id,
        transmission_date: extracted.transmission_date,
        reporter_qualification: extracted.reporter_qualification,
        patient: extracted.patient,
        drugs: extracted.drugs,
        events: extracted.events,
        narrative: extracted.narrative,
        ..CaseRecord::default()
    };

    resolve_terms(&mut record, refs.terms.as_ref());

    for drug in &mut record.drugs {
        if let Some(key) = match_product(&refs.vocabulary, &drug.name) {
            drug.category2 = refs.vocabulary.is_category2(key);
            drug.product_key = Some(key.to_string());
        }
    }

    record.comments = collect_comments(&record, &refs.competitors, config);

    let validity = evaluate_validity(
        &ValidityContext {
            record: &record,
            launch: &refs.launch,
            config,
        },
        !record.comments.is_empty(),
    );

    if validity.allows_listedness() {
        record.listedness = evaluate_listedness(&record, refs.listedness.as_ref());
        if record
            .listedness
            .iter()
            .any(|e| e.status == Listedness::ReferenceNotUpdated)
        {
            warn!(
                file = file_name,
                "listedness reference does not cover this case's products"
            );
        }
    }

    let reportability = classify_reportability(&record, &validity);
    info!(
        file = file_name,
        validity = %validity,
        reportability = %reportability,
        "case assessed"
    );
    record.reportability = Some(reportability);
    record.validity = Some(validity);
    record
}

/// Resolves coded event terms against the code/term mapping.
///
/// A code with no mapping row is a per-case warning; the raw code is
/// substituted for the term and processing continues.
fn resolve_terms(record: &mut CaseRecord, terms: Option<&TermMap>) {
    let Some(terms) = terms else {
        if record.events.iter().any(|e| e.llt_code.is_some()) {
            record
                .warnings
                .push("code/term mapping not loaded; raw codes used as terms".to_string());
        }
        return;
    };

    let mut warnings = Vec::new();
    for event in &mut record.events {
        let Some(code) = event.llt_code.as_deref() else {
            continue;
        };
        match terms.lookup(code) {
            Some(row) => {
                event.llt_term = Some(row.llt_term.clone());
                event.pt_term = Some(row.pt_term.clone());
            }
            None => warnings.push(format!(
                "Event {}: code {code} not found in mapping",
                event.seq
            )),
        }
    }
    record.warnings.extend(warnings);
}

/// Parses and assesses one in-memory document.
pub fn process_document(
    xml: &str,
    file_name: &str,
    serial: usize,
    refs: &ReferenceTables,
    config: &BatchConfig,
) -> icsr_ingest::Result<CaseRecord> {
    let root = parse_document(xml)?;
    Ok(assess_case(
        extract_case(&root),
        file_name,
        serial,
        refs,
        config,
    ))
}

/// Reads, parses, and assesses one report file.
pub fn process_file(
    path: &Path,
    serial: usize,
    refs: &ReferenceTables,
    config: &BatchConfig,
) -> icsr_ingest::Result<CaseRecord> {
    let extracted = extract_file(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(assess_case(extracted, &file_name, serial, refs, config))
}
