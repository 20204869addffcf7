use std::path::PathBuf;

use icsr_model::CaseRecord;

#[derive(Debug)]
pub struct BatchResult {
    pub company: String,
    pub report_folder: PathBuf,
    pub cases: Vec<CaseRecord>,
    pub errors: Vec<String>,
    pub json_out: Option<PathBuf>,
    pub has_errors: bool,
}
