use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use icsr_model::{CaseRecord, Listedness, Reportability, Validity};

use crate::types::BatchResult;

pub fn print_summary(result: &BatchResult) {
    println!("Company: {}", result.company);
    println!("Reports: {}", result.report_folder.display());
    if let Some(path) = &result.json_out {
        println!("JSON output: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("File"),
        header_cell("Sender"),
        header_cell("Patient"),
        header_cell("Suspect drugs"),
        header_cell("Events"),
        header_cell("Validity"),
        header_cell("Reportability"),
        header_cell("Comments"),
    ]);
    apply_case_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 8, CellAlignment::Right);
    for case in &result.cases {
        table.add_row(vec![
            Cell::new(case.serial),
            Cell::new(&case.file_name),
            sender_cell(case),
            patient_cell(case),
            Cell::new(drug_names(case)),
            Cell::new(event_terms(case)),
            validity_cell(case.validity.as_ref()),
            reportability_cell(case.reportability.as_ref()),
            count_cell(case.comments.len()),
        ]);
    }
    println!("{table}");

    print_listedness_table(result);
    print_comment_list(result);

    if !result.errors.is_empty() {
        eprintln!("Skipped files:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
    }
}

fn print_listedness_table(result: &BatchResult) {
    let mut rows = Vec::new();
    for case in &result.cases {
        for entry in &case.listedness {
            rows.push((case.file_name.as_str(), entry));
        }
    }
    if rows.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Product"),
        header_cell("Event"),
        header_cell("Term"),
        header_cell("Listedness"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for (file, entry) in rows {
        table.add_row(vec![
            Cell::new(file),
            Cell::new(&entry.product),
            Cell::new(entry.event_seq),
            Cell::new(&entry.event_term),
            listedness_cell(entry.status),
        ]);
    }
    println!();
    println!("Listedness:");
    println!("{table}");
}

fn print_comment_list(result: &BatchResult) {
    let mut any = false;
    for case in &result.cases {
        for comment in case.comments.iter().chain(case.warnings.iter()) {
            if !any {
                println!();
                println!("Review items:");
                any = true;
            }
            println!("- {}: {comment}", case.file_name);
        }
    }
}

fn sender_cell(case: &CaseRecord) -> Cell {
    match case.sender_id.as_deref() {
        Some(sender) => Cell::new(sender),
        None => dim_cell("-"),
    }
}

fn patient_cell(case: &CaseRecord) -> Cell {
    let composed = case.patient.compose();
    if composed.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(composed)
    }
}

fn drug_names(case: &CaseRecord) -> String {
    if case.drugs.is_empty() {
        return "-".to_string();
    }
    case.drugs
        .iter()
        .map(|d| d.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn event_terms(case: &CaseRecord) -> String {
    if case.events.is_empty() {
        return "-".to_string();
    }
    case.events
        .iter()
        .map(|e| e.resolved_term())
        .collect::<Vec<_>>()
        .join(", ")
}

fn validity_cell(validity: Option<&Validity>) -> Cell {
    match validity {
        Some(Validity::Valid) => Cell::new("Valid").fg(Color::Green),
        Some(v @ Validity::ValidNeedsReview) => Cell::new(v.verdict()).fg(Color::Yellow),
        Some(v @ Validity::NonValid(_)) => Cell::new(v.verdict()).fg(Color::Red),
        None => dim_cell("-"),
    }
}

fn reportability_cell(reportability: Option<&Reportability>) -> Cell {
    match reportability {
        Some(r @ Reportability::Reportable) => Cell::new(r.as_str())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Some(r @ Reportability::NonReportable) => Cell::new(r.as_str()),
        Some(r @ Reportability::NotApplicable) => dim_cell(r.as_str()),
        None => dim_cell("-"),
    }
}

fn listedness_cell(status: Listedness) -> Cell {
    match status {
        Listedness::Listed => Cell::new(status.as_str()).fg(Color::Green),
        Listedness::Unlisted => Cell::new(status.as_str()).fg(Color::Yellow),
        Listedness::ReferenceNotUploaded | Listedness::ReferenceNotUpdated => {
            dim_cell(status.as_str())
        }
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_case_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(165);
    if table.column_count() >= 9 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(4)),
            ColumnConstraint::UpperBoundary(Width::Fixed(24)),
            ColumnConstraint::UpperBoundary(Width::Fixed(14)),
            ColumnConstraint::UpperBoundary(Width::Percentage(22)),
            ColumnConstraint::UpperBoundary(Width::Percentage(18)),
            ColumnConstraint::UpperBoundary(Width::Percentage(18)),
            ColumnConstraint::LowerBoundary(Width::Fixed(12)),
            ColumnConstraint::LowerBoundary(Width::Fixed(14)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
