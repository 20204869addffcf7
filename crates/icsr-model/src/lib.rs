pub mod case;
pub mod config;
pub mod datetime;
pub mod enums;
pub mod verdict;

pub use case::{Age, AdverseEvent, CaseRecord, Measurement, PatientSummary, SuspectDrug};
pub use config::BatchConfig;
pub use datetime::{DatePrecision, E2bDate, parse_e2b_date};
pub use enums::{
    AgeGroup, EventOutcome, Gender, ReporterQualification, SeriousnessCriterion,
};
pub use verdict::{Listedness, ListednessEntry, Reportability, Validity, ValidityReason};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_record_serializes() {
        let record = CaseRecord {
            file_name: "case-001.xml".to_string(),
            serial: 1,
            sender_id: Some("SENDER-1".to_string()),
            transmission_date: parse_e2b_date("20230615"),
            validity: Some(Validity::Valid),
            reportability: Some(Reportability::NonReportable),
            ..CaseRecord::default()
        };
        let json = serde_json::to_string(&record).expect("serialize record");
        let round: CaseRecord = serde_json::from_str(&json).expect("deserialize record");
        assert_eq!(round, record);
    }
}
