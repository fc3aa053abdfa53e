//! Shared data model for the data quality checker.
//!
//! Findings, check kinds, rule configuration and report types used by the
//! config loaders, the validation engine and the CLI.

mod checks;
mod finding;
mod rules;

pub use checks::{CheckFlags, CheckKind};
pub use finding::{CheckStatus, Finding, Report, RunSummary, TableFindings};
pub use rules::{CodeList, FieldRule, RuleSet, TableRules};
