//! Case validity: an ordered list of named predicate rules.
//!
//! Rules are evaluated top to bottom and the first match wins, so
//! exactly one reason ever surfaces even when several would apply.
//! Each rule is a pure function over the evaluation context and is
//! testable in isolation.

use chrono::NaiveDate;
use icsr_model::{BatchConfig, CaseRecord, Validity, ValidityReason};
use icsr_standards::LaunchRegistry;
use tracing::debug;

/// Borrowed inputs for one case's validity evaluation.
pub struct ValidityContext<'a> {
    pub record: &'a CaseRecord,
    pub launch: &'a LaunchRegistry,
    pub config: &'a BatchConfig,
}

type Rule = for<'a> fn(&ValidityContext<'a>) -> Option<ValidityReason>;

/// The rule order is the priority order; do not reorder.
const RULES: &[(&str, Rule)] = &[
    ("no_patient_details", no_patient_details),
    ("non_company_product", non_company_product),
    ("product_not_launched", product_not_launched),
    ("exposure_prior_to_launch", exposure_prior_to_launch),
];

/// Evaluates validity for a case whose products are already matched.
///
/// `has_comments` flags cases that pass every hard rule but carry
/// anomaly comments: these are valid with a manual-review advisory
/// rather than auto-passed.
pub fn evaluate_validity(ctx: &ValidityContext<'_>, has_comments: bool) -> Validity {
    for (name, rule) in RULES {
        if let Some(reason) = rule(ctx) {
            debug!(rule = name, "validity rule fired");
            return Validity::NonValid(reason);
        }
    }
    if has_comments {
        Validity::ValidNeedsReview
    } else {
        Validity::Valid
    }
}

/// Rule 1: the field extractor found zero surviving demographic
/// fields.
pub fn no_patient_details(ctx: &ValidityContext<'_>) -> Option<ValidityReason> {
    if ctx.record.patient.has_detail() {
        None
    } else {
        Some(ValidityReason::NoPatientDetails)
    }
}

/// Rule 2: suspect drugs exist but none matched the vocabulary, or a
/// drug's declared manufacturer does not mention the operating
/// company.
pub fn non_company_product(ctx: &ValidityContext<'_>) -> Option<ValidityReason> {
    let drugs = &ctx.record.drugs;
    if !drugs.is_empty() && drugs.iter().all(|d| d.product_key.is_none()) {
        return Some(ValidityReason::NonCompanyProduct);
    }
    let company = ctx.config.company_lower();
    for drug in drugs {
        if let Some(manufacturer) = &drug.manufacturer
            && !manufacturer.to_lowercase().contains(&company)
        {
            return Some(ValidityReason::NonCompanyProduct);
        }
    }
    None
}

/// Rule 3: any matched suspect product is not on the market yet.
pub fn product_not_launched(ctx: &ValidityContext<'_>) -> Option<ValidityReason> {
    for key in ctx.record.matched_products() {
        if let Some(info) = ctx.launch.get(key)
            && info.blocks_validity()
        {
            return Some(ValidityReason::ProductNotLaunched);
        }
    }
    None
}

/// Rule 4: any case date precedes a matched product's launch date.
///
/// The launch date per drug is the single registered date, the
/// strength-matched tier, or (strength unknown) the earliest tier —
/// conservative, since exposure before the earliest launch precedes
/// every launch. Case dates checked: transmission, drug start/stop,
/// event start/stop. Partial dates were already rounded *up* at
/// parse time, so an imprecise date only fires when even its latest
/// reading is too early.
pub fn exposure_prior_to_launch(ctx: &ValidityContext<'_>) -> Option<ValidityReason> {
    for drug in &ctx.record.drugs {
        let Some(key) = drug.product_key.as_deref() else {
            continue;
        };
        let Some(info) = ctx.launch.get(key) else {
            continue;
        };
        let Some(launch_date) = info.launch_date_for(drug.dose_value.as_deref()) else {
            continue;
        };
        if case_dates(ctx.record).any(|date| date < launch_date) {
            return Some(ValidityReason::ExposurePriorToLaunch);
        }
    }
    None
}

/// All comparable dates a case carries, in no particular order.
fn case_dates(record: &CaseRecord) -> impl Iterator<Item = NaiveDate> + '_ {
    let transmission = record.transmission_date.comparable.into_iter();
    let drug_dates = record
        .drugs
        .iter()
        .flat_map(|d| [d.start.comparable, d.stop.comparable])
        .flatten();
    let event_dates = record
        .events
        .iter()
        .flat_map(|e| [e.start.comparable, e.stop.comparable])
        .flatten();
    transmission.chain(drug_dates).chain(event_dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use icsr_model::{
        Gender, PatientSummary, SuspectDrug, parse_e2b_date,
    };
    use icsr_standards::LaunchInfo;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn with_gender() -> PatientSummary {
        PatientSummary {
            gender: Some(Gender::Male),
            ..PatientSummary::default()
        }
    }

    fn matched_drug(key: &str) -> SuspectDrug {
        SuspectDrug {
            name: key.to_string(),
            product_key: Some(key.to_string()),
            ..SuspectDrug::default()
        }
    }

    fn config() -> BatchConfig {
        BatchConfig::new("Acme")
    }

    #[test]
    fn empty_patient_fires_first_rule() {
        let record = CaseRecord::default();
        let launch = LaunchRegistry::default();
        let ctx = ValidityContext {
            record: &record,
            launch: &launch,
            config: &config(),
        };
        assert_eq!(
            evaluate_validity(&ctx, false),
            Validity::NonValid(ValidityReason::NoPatientDetails)
        );
    }

    #[test]
    fn unmatched_drugs_fire_non_company_rule() {
        let record = CaseRecord {
            patient: with_gender(),
            drugs: vec![SuspectDrug {
                name: "Somedrug".to_string(),
                ..SuspectDrug::default()
            }],
            ..CaseRecord::default()
        };
        let launch = LaunchRegistry::default();
        let ctx = ValidityContext {
            record: &record,
            launch: &launch,
            config: &config(),
        };
        assert_eq!(
            evaluate_validity(&ctx, false),
            Validity::NonValid(ValidityReason::NonCompanyProduct)
        );
    }

    #[test]
    fn foreign_manufacturer_fires_non_company_rule() {
        let mut drug = matched_drug("Facetin");
        drug.manufacturer = Some("Globex Laboratories".to_string());
        let record = CaseRecord {
            patient: with_gender(),
            drugs: vec![drug],
            ..CaseRecord::default()
        };
        let launch =
            LaunchRegistry::from_entries([("Facetin", LaunchInfo::Launched(date(2020, 1, 1)))]);
        let ctx = ValidityContext {
            record: &record,
            launch: &launch,
            config: &config(),
        };
        assert_eq!(
            non_company_product(&ctx),
            Some(ValidityReason::NonCompanyProduct)
        );
    }

    #[test]
    fn awaited_product_fires_regardless_of_dates() {
        let record = CaseRecord {
            patient: with_gender(),
            drugs: vec![matched_drug("Newdrug")],
            transmission_date: parse_e2b_date("20230615"),
            ..CaseRecord::default()
        };
        let launch = LaunchRegistry::from_entries([("Newdrug", LaunchInfo::Awaited)]);
        let ctx = ValidityContext {
            record: &record,
            launch: &launch,
            config: &config(),
        };
        assert_eq!(
            evaluate_validity(&ctx, false),
            Validity::NonValid(ValidityReason::ProductNotLaunched)
        );
    }

    #[test]
    fn drug_start_before_launch_fires_exposure_rule() {
        let mut drug = matched_drug("Facetin");
        drug.start = parse_e2b_date("20220101");
        let record = CaseRecord {
            patient: with_gender(),
            drugs: vec![drug],
            transmission_date: parse_e2b_date("20230615"),
            ..CaseRecord::default()
        };
        let launch =
            LaunchRegistry::from_entries([("Facetin", LaunchInfo::Launched(date(2022, 9, 8)))]);
        let ctx = ValidityContext {
            record: &record,
            launch: &launch,
            config: &config(),
        };
        assert_eq!(
            evaluate_validity(&ctx, false),
            Validity::NonValid(ValidityReason::ExposurePriorToLaunch)
        );
    }

    #[test]
    fn unknown_strength_uses_earliest_tier() {
        let mut drug = matched_drug("Tierdrug");
        drug.start = parse_e2b_date("20210601");
        let record = CaseRecord {
            patient: with_gender(),
            drugs: vec![drug],
            ..CaseRecord::default()
        };
        let launch = LaunchRegistry::from_entries([(
            "Tierdrug",
            LaunchInfo::LaunchedByStrength(vec![
                ("250".to_string(), date(2021, 1, 1)),
                ("500".to_string(), date(2022, 1, 1)),
            ]),
        )]);
        let ctx = ValidityContext {
            record: &record,
            launch: &launch,
            config: &config(),
        };
        // 2021-06-01 is after the earliest tier (2021-01-01): no fire
        assert_eq!(evaluate_validity(&ctx, false), Validity::Valid);

        let mut early = matched_drug("Tierdrug");
        early.start = parse_e2b_date("20201201");
        let record = CaseRecord {
            patient: with_gender(),
            drugs: vec![early],
            ..CaseRecord::default()
        };
        let ctx = ValidityContext {
            record: &record,
            launch: &launch,
            config: &config(),
        };
        assert_eq!(
            evaluate_validity(&ctx, false),
            Validity::NonValid(ValidityReason::ExposurePriorToLaunch)
        );
    }

    #[test]
    fn clean_case_is_valid_and_comments_demand_review() {
        let mut drug = matched_drug("Facetin");
        drug.start = parse_e2b_date("20230101");
        let record = CaseRecord {
            patient: with_gender(),
            drugs: vec![drug],
            transmission_date: parse_e2b_date("20230615"),
            ..CaseRecord::default()
        };
        let launch =
            LaunchRegistry::from_entries([("Facetin", LaunchInfo::Launched(date(2022, 9, 8)))]);
        let ctx = ValidityContext {
            record: &record,
            launch: &launch,
            config: &config(),
        };
        assert_eq!(evaluate_validity(&ctx, false), Validity::Valid);
        assert_eq!(evaluate_validity(&ctx, true), Validity::ValidNeedsReview);
    }

    #[test]
    fn only_first_applicable_reason_surfaces() {
        // both no-patient-details and non-company-product would apply
        let record = CaseRecord {
            drugs: vec![SuspectDrug {
                name: "Somedrug".to_string(),
                ..SuspectDrug::default()
            }],
            ..CaseRecord::default()
        };
        let launch = LaunchRegistry::default();
        let ctx = ValidityContext {
            record: &record,
            launch: &launch,
            config: &config(),
        };
        assert_eq!(
            evaluate_validity(&ctx, false),
            Validity::NonValid(ValidityReason::NoPatientDetails)
        );
    }
}
