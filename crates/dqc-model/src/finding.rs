use serde::{Deserialize, Serialize};

use crate::checks::CheckKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Pass,
    Fail,
    Warning,
    Error,
}

impl CheckStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Warning => "WARNING",
            CheckStatus::Error => "ERROR",
        }
    }

    /// ERROR counts as a failure for summary purposes.
    pub fn counts_as_failure(self) -> bool {
        matches!(self, CheckStatus::Fail | CheckStatus::Error)
    }
}

/// One normalized result of applying a single check to a single field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub table: String,
    pub field: String,
    /// Which check produced this finding.
    #[serde(rename = "check_type")]
    pub check: CheckKind,
    pub status: CheckStatus,
    /// Human-readable message describing the outcome.
    pub message: String,
}

/// Findings for a single table, in dispatch order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableFindings {
    pub table: String,
    pub findings: Vec<Finding>,
}

/// The result of one run: tables in rule-declaration order, each with its
/// findings in dispatch order. Tables that produced no findings (including
/// tables absent from the data source) have no entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    pub tables: Vec<TableFindings>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Appends a table entry unless it has zero findings.
    pub fn push_table(&mut self, table: impl Into<String>, findings: Vec<Finding>) {
        if findings.is_empty() {
            return;
        }
        self.tables.push(TableFindings {
            table: table.into(),
            findings,
        });
    }

    pub fn table(&self, name: &str) -> Option<&TableFindings> {
        self.tables.iter().find(|entry| entry.table == name)
    }

    /// All findings across all tables, in report order.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.tables.iter().flat_map(|entry| entry.findings.iter())
    }
}

/// Aggregate counts over a report. Owned by the caller; the engine never
/// keeps a running summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
}

impl RunSummary {
    pub fn from_report(report: &Report) -> Self {
        let mut summary = RunSummary::default();
        for finding in report.findings() {
            summary.total += 1;
            match finding.status {
                CheckStatus::Pass => summary.passed += 1,
                CheckStatus::Warning => summary.warnings += 1,
                CheckStatus::Fail | CheckStatus::Error => summary.failed += 1,
            }
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
