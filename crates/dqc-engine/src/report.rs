//! Report export: versioned JSON payload plus flat CSV variants.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use dqc_model::{CheckKind, Report, RunSummary, TableFindings};

const REPORT_SCHEMA: &str = "dqcheck.quality-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct QualityReportPayload<'a> {
    schema: &'static str,
    schema_version: u32,
    generated_at: String,
    database: String,
    summary: RunSummary,
    tables: &'a [TableFindings],
}

/// One exported offending value, for the failing-values CSV.
#[derive(Debug, Clone, Serialize)]
pub struct FailingValue {
    pub table: String,
    pub field: String,
    #[serde(rename = "check_type")]
    pub check: CheckKind,
    pub value: String,
}

/// Writes the full report as a versioned JSON document
/// (`quality_report.json` in `output_dir`), returning the path written.
pub fn write_report_json(output_dir: &Path, database: &str, report: &Report) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join("quality_report.json");
    let payload = QualityReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        database: database.to_string(),
        summary: RunSummary::from_report(report),
        tables: &report.tables,
    };
    let json = serde_json::to_string_pretty(&payload)?;
    std::fs::write(&output_path, format!("{json}\n"))
        .with_context(|| format!("writing {}", output_path.display()))?;
    Ok(output_path)
}

/// Writes every finding as one CSV row
/// (`table,field,check_type,status,message`), returning the path written.
pub fn write_results_csv(output_dir: &Path, report: &Report) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join("results.csv");
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("writing {}", output_path.display()))?;
    writer.write_record(["table", "field", "check_type", "status", "message"])?;
    for finding in report.findings() {
        writer.write_record([
            finding.table.as_str(),
            finding.field.as_str(),
            finding.check.as_str(),
            finding.status.as_str(),
            finding.message.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(output_path)
}

/// Writes the offending values behind FAIL findings
/// (`table,field,check_type,value`), returning the path written.
pub fn write_failing_values_csv(output_dir: &Path, values: &[FailingValue]) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join("failing_values.csv");
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("writing {}", output_path.display()))?;
    writer.write_record(["table", "field", "check_type", "value"])?;
    for entry in values {
        writer.write_record([
            entry.table.as_str(),
            entry.field.as_str(),
            entry.check.as_str(),
            entry.value.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(output_path)
}
