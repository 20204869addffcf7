//! CLI library components for the ICSR triage tool.

pub mod logging;
