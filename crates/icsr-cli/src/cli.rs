//! CLI argument definitions for the ICSR triage tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "icsr-triage",
    version,
    about = "ICSR Triage - Assess E2B(R3) safety reports",
    long_about = "Assess individual case safety reports (E2B(R3) XML) against\n\
                  company reference data: product vocabulary, launch registry,\n\
                  code/term mapping, and listedness reference."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Assess a folder of E2B(R3) XML reports.
    Batch(BatchArgs),

    /// List the validity rules in evaluation order.
    Rules,
}

#[derive(Parser)]
pub struct BatchArgs {
    /// Folder containing E2B(R3) XML report files.
    #[arg(value_name = "REPORT_FOLDER")]
    pub report_folder: PathBuf,

    /// Operating-company name for the non-company-product rule and
    /// the anomaly detectors.
    #[arg(long = "company", value_name = "NAME")]
    pub company: String,

    /// Product vocabulary CSV (columns: Product, Category).
    #[arg(long = "products", value_name = "CSV")]
    pub products: PathBuf,

    /// Launch registry CSV (columns: Product, Status, Date, Strength).
    #[arg(long = "launch", value_name = "CSV")]
    pub launch: PathBuf,

    /// Code/term mapping CSV (columns: LLT Code, LLT Term, PT Term).
    ///
    /// When omitted, raw codes are used as event terms and each case
    /// carries a warning.
    #[arg(long = "terms", value_name = "CSV")]
    pub terms: Option<PathBuf>,

    /// Listedness reference CSV (columns: Drug Name, Event Term).
    ///
    /// When omitted, every listedness entry reads "Reference not
    /// uploaded".
    #[arg(long = "listedness", value_name = "CSV")]
    pub listedness: Option<PathBuf>,

    /// Competitor/organization name list (one name per line).
    #[arg(long = "competitors", value_name = "CSV")]
    pub competitors: Option<PathBuf>,

    /// Write the assessed cases as JSON to this path.
    #[arg(long = "json-out", value_name = "PATH")]
    pub json_out: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
