//! Normalized case record assembled from one safety report.
//!
//! A [`CaseRecord`] is created fresh per input file, enriched by the
//! assessment pipeline, and never merged with other cases.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::datetime::E2bDate;
use crate::enums::{
    AgeGroup, EventOutcome, Gender, ReporterQualification, SeriousnessCriterion,
};
use crate::verdict::{ListednessEntry, Reportability, Validity};

/// Patient age with a normalized unit word (`year`/`month`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Age {
    /// Numeric value as reported (kept as text; precision varies).
    pub value: String,
    /// Unit word, already mapped from the E2B unit code.
    pub unit: String,
}

impl Age {
    /// Display form with the unit pluralized unless the value is
    /// exactly one.
    pub fn label(&self) -> String {
        if self.value.trim() == "1" {
            format!("{} {}", self.value.trim(), self.unit)
        } else {
            format!("{} {}s", self.value.trim(), self.unit)
        }
    }
}

/// A measured quantity with its reported unit (weight, height).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: String,
    pub unit: String,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}

/// Demographic fields that survived the unknown-token filter.
///
/// Every field is optional; the composed summary is built only from
/// present fields, and "has any patient detail" is true iff at least
/// one survived. A masked patient identifier surfaces as the literal
/// `"Masked"`, which does count as detail (masking is provenance, not
/// absence).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub gender: Option<Gender>,
    pub age: Option<Age>,
    pub age_group: Option<AgeGroup>,
    pub height: Option<Measurement>,
    pub weight: Option<Measurement>,
    /// Patient name/initials, or the literal `"Masked"`.
    pub patient_id: Option<String>,
}

impl PatientSummary {
    /// Ordered concatenation of all present field labels.
    pub fn compose(&self) -> String {
        let mut parts = Vec::new();
        if let Some(gender) = self.gender {
            parts.push(format!("Gender: {gender}"));
        }
        if let Some(age) = &self.age {
            parts.push(format!("Age: {}", age.label()));
        }
        if let Some(group) = self.age_group {
            parts.push(format!("Age group: {group}"));
        }
        if let Some(height) = &self.height {
            parts.push(format!("Height: {height}"));
        }
        if let Some(weight) = &self.weight {
            parts.push(format!("Weight: {weight}"));
        }
        if let Some(id) = &self.patient_id {
            parts.push(format!("Patient: {id}"));
        }
        parts.join(", ")
    }

    pub fn has_detail(&self) -> bool {
        self.gender.is_some()
            || self.age.is_some()
            || self.age_group.is_some()
            || self.height.is_some()
            || self.weight.is_some()
            || self.patient_id.is_some()
    }
}

/// One drug administration flagged suspect by a causality assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuspectDrug {
    /// Product name as reported.
    pub name: String,
    /// Canonical key from the product vocabulary, if matched.
    pub product_key: Option<String>,
    /// Whether the matched product belongs to the secondary regulatory
    /// category (feeds the reportability classifier only).
    pub category2: bool,
    /// Free-text dosage description.
    pub dosage_text: Option<String>,
    pub dose_value: Option<String>,
    pub dose_unit: Option<String>,
    pub formulation: Option<String>,
    pub lot_number: Option<String>,
    /// Manufacturer / authorization-holder organization name.
    pub manufacturer: Option<String>,
    pub start: E2bDate,
    pub stop: E2bDate,
}

impl SuspectDrug {
    pub fn is_company_product(&self) -> bool {
        self.product_key.is_some()
    }

    /// Pipe-separated detail string in report-row form.
    pub fn detail(&self) -> String {
        let mut parts = vec![format!("Drug: {}", self.name)];
        if let Some(text) = &self.dosage_text {
            parts.push(format!("Dosage: {text}"));
        }
        if self.dose_value.is_some() || self.dose_unit.is_some() {
            parts.push(format!(
                "Dose: {} {}",
                self.dose_value.as_deref().unwrap_or(""),
                self.dose_unit.as_deref().unwrap_or("")
            ));
        }
        if let Some(form) = &self.formulation {
            parts.push(format!("Formulation: {form}"));
        }
        if let Some(lot) = &self.lot_number {
            parts.push(format!("Lot No: {lot}"));
        }
        if !self.start.is_empty() {
            parts.push(format!("Start Date: {}", self.start));
        }
        if !self.stop.is_empty() {
            parts.push(format!("Stop Date: {}", self.stop));
        }
        parts.join(" | ")
    }
}

/// One reaction observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdverseEvent {
    /// 1-based sequence within the case.
    pub seq: usize,
    /// Coded term as reported (LLT code).
    pub llt_code: Option<String>,
    /// Lower-level term resolved from the code/term mapping.
    pub llt_term: Option<String>,
    /// Preferred term resolved from the code/term mapping.
    pub pt_term: Option<String>,
    /// Named seriousness criteria; empty means non-serious.
    pub seriousness: Vec<SeriousnessCriterion>,
    pub outcome: Option<EventOutcome>,
    pub start: E2bDate,
    pub stop: E2bDate,
}

impl AdverseEvent {
    /// The term used for listedness lookups: the resolved lower-level
    /// term, or the raw code when the mapping had no row for it.
    pub fn resolved_term(&self) -> &str {
        self.llt_term
            .as_deref()
            .or(self.llt_code.as_deref())
            .unwrap_or("")
    }

    pub fn is_serious(&self) -> bool {
        !self.seriousness.is_empty()
    }

    pub fn seriousness_label(&self) -> String {
        if self.seriousness.is_empty() {
            "Non-Serious".to_string()
        } else {
            self.seriousness
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// Report-row detail line for this event.
    pub fn detail(&self) -> String {
        let pt = self.pt_term.as_deref().unwrap_or("");
        let outcome = self
            .outcome
            .map(|o| o.as_str())
            .unwrap_or("");
        format!(
            "Event {}: {} ({}) (Seriousness: {}; Outcome: {})",
            self.seq,
            self.resolved_term(),
            pt,
            self.seriousness_label(),
            outcome
        )
    }
}

/// The fully assembled, immutable output record for one report file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Source file name (batch-local identifier).
    pub file_name: String,
    /// 1-based position in the batch.
    pub serial: usize,
    pub sender_id: Option<String>,
    pub transmission_date: E2bDate,
    pub reporter_qualification: Option<ReporterQualification>,
    pub patient: PatientSummary,
    pub drugs: Vec<SuspectDrug>,
    pub events: Vec<AdverseEvent>,
    pub narrative: Option<String>,
    pub validity: Option<Validity>,
    pub reportability: Option<Reportability>,
    /// Per-product-per-event listedness; empty for Non-Valid cases.
    pub listedness: Vec<ListednessEntry>,
    /// Advisory anomaly comments (deduplicated, order-stable).
    pub comments: Vec<String>,
    /// Per-case warnings (e.g. unresolvable event codes).
    pub warnings: Vec<String>,
}

impl CaseRecord {
    /// Combined product detail string across all suspect drugs.
    pub fn product_detail(&self) -> String {
        self.drugs
            .iter()
            .map(SuspectDrug::detail)
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Combined event detail string, one line per event.
    pub fn event_detail(&self) -> String {
        self.events
            .iter()
            .map(AdverseEvent::detail)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Canonical keys of all matched suspect products, in drug order,
    /// without duplicates.
    pub fn matched_products(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for drug in &self.drugs {
            if let Some(key) = drug.product_key.as_deref()
                && !keys.contains(&key)
            {
                keys.push(key);
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_summary_composes_only_present_fields() {
        let patient = PatientSummary {
            gender: Some(Gender::Female),
            age: Some(Age {
                value: "34".to_string(),
                unit: "year".to_string(),
            }),
            ..PatientSummary::default()
        };
        assert_eq!(patient.compose(), "Gender: Female, Age: 34 years");
        assert!(patient.has_detail());
    }

    #[test]
    fn empty_patient_summary_has_no_detail() {
        let patient = PatientSummary::default();
        assert_eq!(patient.compose(), "");
        assert!(!patient.has_detail());
    }

    #[test]
    fn age_of_one_stays_singular() {
        let age = Age {
            value: "1".to_string(),
            unit: "month".to_string(),
        };
        assert_eq!(age.label(), "1 month");
    }

    #[test]
    fn masked_identifier_counts_as_detail() {
        let patient = PatientSummary {
            patient_id: Some("Masked".to_string()),
            ..PatientSummary::default()
        };
        assert!(patient.has_detail());
        assert_eq!(patient.compose(), "Patient: Masked");
    }

    #[test]
    fn event_without_criteria_is_non_serious() {
        let event = AdverseEvent {
            seq: 1,
            llt_code: Some("10019211".to_string()),
            ..AdverseEvent::default()
        };
        assert!(!event.is_serious());
        assert_eq!(event.seriousness_label(), "Non-Serious");
        assert_eq!(event.resolved_term(), "10019211");
    }

    #[test]
    fn matched_products_deduplicates_in_order() {
        let record = CaseRecord {
            drugs: vec![
                SuspectDrug {
                    name: "A".to_string(),
                    product_key: Some("alpha".to_string()),
                    ..SuspectDrug::default()
                },
                SuspectDrug {
                    name: "B".to_string(),
                    product_key: Some("beta".to_string()),
                    ..SuspectDrug::default()
                },
                SuspectDrug {
                    name: "A again".to_string(),
                    product_key: Some("alpha".to_string()),
                    ..SuspectDrug::default()
                },
            ],
            ..CaseRecord::default()
        };
        assert_eq!(record.matched_products(), vec!["alpha", "beta"]);
    }
}
