use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use indicatif::ProgressBar;
use tracing::{error, info, info_span, warn};

use icsr_assess::{ReferenceTables, process_file};
use icsr_model::{BatchConfig, ValidityReason};
use icsr_standards::{
    CompetitorList, LaunchRegistry, ListednessTable, ProductVocabulary, TermMap,
};

use crate::cli::BatchArgs;
use crate::summary::apply_table_style;
use crate::types::BatchResult;

pub fn run_rules() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Priority", "Verdict", "Condition"]);
    apply_table_style(&mut table);
    for (priority, reason) in ValidityReason::ALL.into_iter().enumerate() {
        table.add_row(vec![
            (priority + 1).to_string(),
            format!("Non-Valid ({})", reason.as_str()),
            rule_condition(reason).to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn rule_condition(reason: ValidityReason) -> &'static str {
    match reason {
        ValidityReason::NoPatientDetails => {
            "No demographic field survived the unknown-token filter"
        }
        ValidityReason::NonCompanyProduct => {
            "No suspect drug matched the vocabulary, or a manufacturer does not mention the company"
        }
        ValidityReason::ProductNotLaunched => {
            "A matched suspect product is registered but not on the market"
        }
        ValidityReason::ExposurePriorToLaunch => {
            "A case date precedes a matched product's launch date"
        }
    }
}

pub fn run_batch(args: &BatchArgs) -> Result<BatchResult> {
    let batch_span = info_span!("batch", company = %args.company);
    let _batch_guard = batch_span.enter();

    let refs = load_references(args)?;
    let config = BatchConfig::new(args.company.clone());

    let files = discover_reports(args)?;
    if files.is_empty() {
        warn!(folder = %args.report_folder.display(), "no XML reports found");
    }

    let mut cases = Vec::new();
    let mut errors = Vec::new();
    let progress = ProgressBar::new(files.len() as u64);
    let batch_start = Instant::now();

    for (index, path) in files.iter().enumerate() {
        progress.set_message(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        match process_file(path, index + 1, &refs, &config) {
            Ok(record) => cases.push(record),
            Err(error) => {
                error!(file = %path.display(), %error, "report skipped");
                errors.push(format!("{}: {error}", path.display()));
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!(
        files = files.len(),
        assessed = cases.len(),
        skipped = errors.len(),
        duration_ms = batch_start.elapsed().as_millis(),
        "batch complete"
    );

    if let Some(path) = &args.json_out {
        let json = serde_json::to_string_pretty(&cases).context("serialize cases")?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    }

    let has_errors = !errors.is_empty();
    Ok(BatchResult {
        company: args.company.clone(),
        report_folder: args.report_folder.clone(),
        cases,
        errors,
        json_out: args.json_out.clone(),
        has_errors,
    })
}

fn load_references(args: &BatchArgs) -> Result<ReferenceTables> {
    let vocabulary =
        ProductVocabulary::load(&args.products).context("load product vocabulary")?;
    let launch = LaunchRegistry::load(&args.launch).context("load launch registry")?;
    let terms = match &args.terms {
        Some(path) => Some(TermMap::load(path).context("load code/term mapping")?),
        None => {
            warn!("no code/term mapping supplied; raw codes will be used as terms");
            None
        }
    };
    let listedness = match &args.listedness {
        Some(path) => Some(ListednessTable::load(path).context("load listedness reference")?),
        None => {
            warn!("no listedness reference supplied");
            None
        }
    };
    let competitors = match &args.competitors {
        Some(path) => CompetitorList::load(path).context("load competitor list")?,
        None => CompetitorList::default(),
    };
    Ok(ReferenceTables {
        terms,
        listedness,
        competitors,
        vocabulary,
        launch,
    })
}

/// XML files directly under the report folder, in name order.
fn discover_reports(args: &BatchArgs) -> Result<Vec<PathBuf>> {
    let folder = &args.report_folder;
    let entries = fs::read_dir(folder)
        .with_context(|| format!("read report folder {}", folder.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("read report folder {}", folder.display()))?
            .path();
        let is_xml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        if path.is_file() && is_xml {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REPORT: &str = r#"<MCCI_IN200100UV01 xmlns="urn:hl7-org:v3">
  <id root="2.16.840.1.113883.3.989.2.1.3.1" extension="SNDR-001"/>
  <creationTime value="20230615"/>
  <administrativeGenderCode code="2"/>
  <substanceAdministration>
    <id root="drug-1"/>
    <effectiveTime><low value="20230101"/></effectiveTime>
    <kindOfProduct><name>Facetin</name></kindOfProduct>
  </substanceAdministration>
  <causalityAssessment>
    <value code="1"/>
    <subject2><productUseReference><id root="drug-1"/></productUseReference></subject2>
  </causalityAssessment>
  <observation>
    <code displayName="reaction"/>
    <value code="10019211"/>
  </observation>
</MCCI_IN200100UV01>"#;

    fn batch_args(dir: &TempDir) -> BatchArgs {
        let products = dir.path().join("products.csv");
        fs::write(&products, "Product,Category\nFacetin,2\n").expect("write vocabulary");
        let launch = dir.path().join("launch.csv");
        fs::write(
            &launch,
            "Product,Status,Date,Strength\nFacetin,launched,2022-09-08,\n",
        )
        .expect("write registry");
        BatchArgs {
            report_folder: dir.path().join("reports"),
            company: "Acme".to_string(),
            products,
            launch,
            terms: None,
            listedness: None,
            competitors: None,
            json_out: None,
        }
    }

    #[test]
    fn malformed_report_is_recorded_and_the_batch_continues() {
        let dir = TempDir::new().expect("temp dir");
        let args = batch_args(&dir);
        fs::create_dir(&args.report_folder).expect("reports dir");
        fs::write(args.report_folder.join("a-broken.xml"), "<not><balanced>")
            .expect("write report");
        fs::write(args.report_folder.join("b-intact.xml"), REPORT).expect("write report");

        let result = run_batch(&args).expect("batch runs");

        assert!(result.has_errors);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("a-broken.xml"));
        assert_eq!(result.cases.len(), 1);
        assert_eq!(result.cases[0].file_name, "b-intact.xml");
        assert_eq!(result.cases[0].serial, 2);
        assert!(result.cases[0].validity.is_some());
    }
}
