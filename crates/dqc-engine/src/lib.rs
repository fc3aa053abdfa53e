//! Data quality validation engine.
//!
//! Loads per-field rule declarations and code-list allow-lists, interrogates
//! a relational data source through the [`DataSource`] seam, applies a fixed
//! catalogue of checks and emits a normalized PASS/FAIL/WARNING/ERROR
//! [`Report`](dqc_model::Report). The engine never mutates the inspected
//! data and keeps no state between runs beyond its loaded configuration.

pub mod checker;
pub mod report;
pub mod source;
pub mod validators;

pub use checker::{QualityChecker, SAMPLE_LIMIT};
pub use report::{FailingValue, write_failing_values_csv, write_report_json, write_results_csv};
pub use source::{DataSource, DuplicateGroup, SourceError, SqliteSource};
