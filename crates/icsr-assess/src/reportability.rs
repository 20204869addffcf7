//! Regulatory reportability classification.
//!
//! A pure function of two booleans, overridden to NA whenever the
//! case is Non-Valid (an invalid case cannot be assessed).

use icsr_model::{CaseRecord, Reportability, Validity};

/// Classifies a case's reportability.
///
/// Reportable iff the case has at least one serious event *and* at
/// least one matched suspect product in the secondary regulatory
/// category.
pub fn classify_reportability(record: &CaseRecord, validity: &Validity) -> Reportability {
    if !validity.allows_listedness() {
        return Reportability::NotApplicable;
    }
    let any_serious = record.events.iter().any(|e| e.is_serious());
    let any_category2 = record.drugs.iter().any(|d| d.category2);
    if any_serious && any_category2 {
        Reportability::Reportable
    } else {
        Reportability::NonReportable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icsr_model::{
        AdverseEvent, SeriousnessCriterion, SuspectDrug, ValidityReason,
    };

    fn serious_event() -> AdverseEvent {
        AdverseEvent {
            seq: 1,
            seriousness: vec![SeriousnessCriterion::Hospitalization],
            ..AdverseEvent::default()
        }
    }

    fn category2_drug() -> SuspectDrug {
        SuspectDrug {
            name: "Zolid Plus".to_string(),
            product_key: Some("Zolid Plus".to_string()),
            category2: true,
            ..SuspectDrug::default()
        }
    }

    #[test]
    fn serious_plus_category2_is_reportable() {
        let record = CaseRecord {
            events: vec![serious_event()],
            drugs: vec![category2_drug()],
            ..CaseRecord::default()
        };
        assert_eq!(
            classify_reportability(&record, &Validity::Valid),
            Reportability::Reportable
        );
    }

    #[test]
    fn either_leg_missing_is_non_reportable() {
        let serious_only = CaseRecord {
            events: vec![serious_event()],
            ..CaseRecord::default()
        };
        assert_eq!(
            classify_reportability(&serious_only, &Validity::Valid),
            Reportability::NonReportable
        );

        let category2_only = CaseRecord {
            drugs: vec![category2_drug()],
            events: vec![AdverseEvent::default()],
            ..CaseRecord::default()
        };
        assert_eq!(
            classify_reportability(&category2_only, &Validity::Valid),
            Reportability::NonReportable
        );
    }

    #[test]
    fn non_valid_case_is_not_applicable() {
        let record = CaseRecord {
            events: vec![serious_event()],
            drugs: vec![category2_drug()],
            ..CaseRecord::default()
        };
        assert_eq!(
            classify_reportability(
                &record,
                &Validity::NonValid(ValidityReason::NoPatientDetails)
            ),
            Reportability::NotApplicable
        );
    }
}
