//! Field extraction from a parsed E2B(R3) report tree.
//!
//! Every field follows the same pipeline: locate the source node (no
//! node means the field is absent), map coded values to their named
//! forms, then pass free text through the unknown-token filter. No
//! extraction step can fail a case; missing data degrades to `None`.
//!
//! Two structural invariants are enforced here:
//!
//! - a drug administration becomes a [`SuspectDrug`] only when its
//!   `id@root` is referenced by a causality assessment whose value
//!   code marks it the suspected cause (`"1"`);
//! - an observation becomes an [`AdverseEvent`] only when its code
//!   node is display-named `"reaction"`. Seriousness and outcome
//!   sub-observations are nested children and are consumed in place,
//!   never surfaced as events of their own.

use icsr_model::{
    AdverseEvent, Age, AgeGroup, E2bDate, EventOutcome, Gender, Measurement, PatientSummary,
    ReporterQualification, SeriousnessCriterion, SuspectDrug, parse_e2b_date,
};
use tracing::debug;

use crate::dom::XmlNode;
use crate::text::{filter_unknown, filter_unknown_opt};

/// OID of the sender-identifier `id` node.
const SENDER_ID_ROOT: &str = "2.16.840.1.113883.3.989.2.1.3.1";

/// Causality value code marking a drug as the primary suspect.
const SUSPECT_CAUSALITY_CODE: &str = "1";

/// Code of the narrative text block.
const NARRATIVE_CODE: &str = "PAT_ADV_EVNT";

/// `nullFlavor` value marking an explicitly masked identifier.
const MASKED_NULL_FLAVOR: &str = "MSK";

/// Raw per-case extraction output, before product matching and term
/// resolution enrich it into a full `CaseRecord`.
#[derive(Debug, Clone, Default)]
pub struct ExtractedCase {
    pub sender_id: Option<String>,
    pub transmission_date: E2bDate,
    pub reporter_qualification: Option<ReporterQualification>,
    pub patient: PatientSummary,
    pub drugs: Vec<SuspectDrug>,
    pub events: Vec<AdverseEvent>,
    pub narrative: Option<String>,
}

/// Walks the report tree and pulls every field the case record needs.
pub fn extract_case(root: &XmlNode) -> ExtractedCase {
    let drugs = extract_suspect_drugs(root);
    let events = extract_events(root);
    debug!(
        drugs = drugs.len(),
        events = events.len(),
        "extracted case structure"
    );

    ExtractedCase {
        sender_id: root
            .find_with_attr("id", "root", SENDER_ID_ROOT)
            .and_then(|n| n.attr("extension"))
            .and_then(filter_unknown),
        transmission_date: root
            .find("creationTime")
            .and_then(|n| n.attr("value"))
            .map(parse_e2b_date)
            .unwrap_or_default(),
        reporter_qualification: root
            .find("asQualifiedEntity")
            .and_then(|n| n.find("code"))
            .and_then(|n| n.attr("code"))
            .map(ReporterQualification::from_code),
        patient: extract_patient(root),
        drugs,
        events,
        narrative: extract_narrative(root),
    }
}

fn extract_patient(root: &XmlNode) -> PatientSummary {
    PatientSummary {
        gender: root
            .find("administrativeGenderCode")
            .and_then(|n| n.attr("code"))
            .and_then(Gender::from_code),
        age: coded_observation_value(root, "age").and_then(|value| {
            let raw = filter_unknown_opt(value.attr("value"))?;
            Some(Age {
                value: raw,
                unit: age_unit_word(value.attr("unit").unwrap_or("")),
            })
        }),
        age_group: coded_observation_value(root, "ageGroup")
            .and_then(|n| n.attr("code"))
            .and_then(AgeGroup::from_code),
        height: measurement(root, "height"),
        weight: measurement(root, "bodyWeight"),
        patient_id: extract_patient_id(root),
    }
}

/// Maps an E2B age unit code to a singular unit word.
fn age_unit_word(unit: &str) -> String {
    match unit.trim() {
        "a" => "year".to_string(),
        "mo" => "month".to_string(),
        "wk" => "week".to_string(),
        "d" => "day".to_string(),
        "h" => "hour".to_string(),
        other => other.to_string(),
    }
}

fn measurement(root: &XmlNode, display_name: &str) -> Option<Measurement> {
    let value = coded_observation_value(root, display_name)?;
    let raw = filter_unknown_opt(value.attr("value"))?;
    Some(Measurement {
        value: raw,
        unit: value.attr("unit").unwrap_or("").trim().to_string(),
    })
}

/// Patient name/initials. An explicit `nullFlavor="MSK"` renders the
/// literal `"Masked"`: masking is meaningful provenance, distinct from
/// an absent field, and counts as patient detail.
fn extract_patient_id(root: &XmlNode) -> Option<String> {
    let patient = root.find("patient")?;
    let name = patient.find("name")?;
    if name.attr("nullFlavor") == Some(MASKED_NULL_FLAVOR) {
        return Some("Masked".to_string());
    }
    name.text_trimmed().and_then(filter_unknown)
}

/// Drug-administration ids flagged suspect by a causality assessment.
fn suspect_drug_ids(root: &XmlNode) -> Vec<String> {
    let mut ids = Vec::new();
    for causality in root.find_all("causalityAssessment") {
        if causality.find("value").and_then(|n| n.attr("code")) != Some(SUSPECT_CAUSALITY_CODE) {
            continue;
        }
        if let Some(id) = causality
            .find("productUseReference")
            .and_then(|n| n.find("id"))
            .and_then(|n| n.attr("root"))
        {
            ids.push(id.to_string());
        }
    }
    ids
}

fn extract_suspect_drugs(root: &XmlNode) -> Vec<SuspectDrug> {
    let suspect_ids = suspect_drug_ids(root);
    let mut drugs = Vec::new();

    for admin in root.find_all("substanceAdministration") {
        let Some(id) = admin.find("id").and_then(|n| n.attr("root")) else {
            continue;
        };
        if !suspect_ids.iter().any(|s| s == id) {
            continue;
        }

        let dose = admin.find("doseQuantity");
        drugs.push(SuspectDrug {
            name: admin
                .find("kindOfProduct")
                .and_then(|n| n.find("name"))
                .and_then(|n| n.text_trimmed())
                .unwrap_or("")
                .to_string(),
            product_key: None,
            category2: false,
            dosage_text: admin
                .find("text")
                .and_then(|n| n.text_trimmed())
                .and_then(filter_unknown),
            dose_value: dose.and_then(|n| filter_unknown_opt(n.attr("value"))),
            dose_unit: dose.and_then(|n| filter_unknown_opt(n.attr("unit"))),
            formulation: admin
                .find("formCode")
                .and_then(|n| n.find("originalText"))
                .and_then(|n| n.text_trimmed())
                .and_then(filter_unknown),
            lot_number: admin
                .find("lotNumberText")
                .and_then(|n| n.text_trimmed())
                .and_then(filter_unknown),
            manufacturer: admin
                .find("asManufacturedProduct")
                .and_then(|n| n.find("name"))
                .and_then(|n| n.text_trimmed())
                .and_then(filter_unknown),
            start: date_bound(admin, "low"),
            stop: date_bound(admin, "high"),
        });
    }
    drugs
}

fn extract_events(root: &XmlNode) -> Vec<AdverseEvent> {
    let mut events = Vec::new();

    for observation in root.find_all("observation") {
        // Seriousness/outcome sub-observations carry other display
        // names and are consumed below, inside their reaction.
        if observation.child("code").and_then(|n| n.attr("displayName")) != Some("reaction") {
            continue;
        }

        let seriousness: Vec<SeriousnessCriterion> = SeriousnessCriterion::ALL
            .into_iter()
            .filter(|criterion| {
                coded_observation_value(observation, criterion.xml_display_name())
                    .and_then(|n| n.attr("value"))
                    == Some("true")
            })
            .collect();

        events.push(AdverseEvent {
            seq: events.len() + 1,
            llt_code: observation
                .child("value")
                .and_then(|n| n.attr("code"))
                .and_then(filter_unknown),
            llt_term: None,
            pt_term: None,
            seriousness,
            outcome: coded_observation_value(observation, "outcome")
                .and_then(|n| n.attr("code"))
                .and_then(EventOutcome::from_code),
            start: observation
                .child("effectiveTime")
                .map(|time| bound_of(time, "low"))
                .unwrap_or_default(),
            stop: observation
                .child("effectiveTime")
                .map(|time| bound_of(time, "high"))
                .unwrap_or_default(),
        });
    }
    events
}

fn extract_narrative(root: &XmlNode) -> Option<String> {
    let holder = root
        .descendants()
        .find(|n| n.child("code").and_then(|c| c.attr("code")) == Some(NARRATIVE_CODE))?;
    holder
        .child("text")
        .and_then(|n| n.text_trimmed())
        .map(str::to_string)
}

/// Finds the `value` sibling of a `code` node with the given
/// `displayName`, scoped to the given subtree. This is the shape every
/// coded sub-observation takes (age, bodyWeight, seriousness flags,
/// outcome).
fn coded_observation_value<'a>(scope: &'a XmlNode, display_name: &str) -> Option<&'a XmlNode> {
    scope
        .descendants()
        .find(|n| n.child("code").and_then(|c| c.attr("displayName")) == Some(display_name))
        .and_then(|n| n.child("value"))
}

/// First `low`/`high` bound anywhere under the node, as a parsed date.
fn date_bound(scope: &XmlNode, bound: &str) -> E2bDate {
    scope
        .find(bound)
        .and_then(|n| n.attr("value"))
        .map(parse_e2b_date)
        .unwrap_or_default()
}

/// `low`/`high` bound directly under an `effectiveTime` node.
fn bound_of(time: &XmlNode, bound: &str) -> E2bDate {
    time.child(bound)
        .and_then(|n| n.attr("value"))
        .map(parse_e2b_date)
        .unwrap_or_default()
}
