use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info;

use dqc_engine::{
    DataSource, FailingValue, QualityChecker, SAMPLE_LIMIT, SqliteSource,
    write_failing_values_csv, write_report_json, write_results_csv,
};
use dqc_model::{CheckStatus, Report, RunSummary};

use crate::cli::{CheckArgs, TablesArgs};
use crate::summary::apply_table_style;

pub struct CheckOutcome {
    pub report: Report,
    pub summary: RunSummary,
    /// Report files written to the output directory, in write order.
    pub written: Vec<PathBuf>,
}

pub fn run_check(args: &CheckArgs) -> Result<CheckOutcome> {
    let source = SqliteSource::open(&args.database)
        .with_context(|| format!("open database {}", args.database.display()))?;
    let mut checker = QualityChecker::new(source);
    checker
        .load_rules(&args.rules)
        .with_context(|| format!("load rules from {}", args.rules.display()))?;
    if let Some(codes) = &args.codes {
        checker
            .load_codes(codes)
            .with_context(|| format!("load codes from {}", codes.display()))?;
    }

    let report = match &args.table {
        Some(table) => checker.run_for_table(table),
        None => checker.run_all(),
    };
    let summary = RunSummary::from_report(&report);
    info!(
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        warnings = summary.warnings,
        "checks complete"
    );

    let mut written = Vec::new();
    if let Some(output_dir) = &args.output_dir {
        let database = args
            .database
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("database");
        written.push(write_report_json(output_dir, database, &report)?);
        written.push(write_results_csv(output_dir, &report)?);
        if args.export_failures {
            let values = collect_failing_values(&checker, &report)
                .context("collect failing values")?;
            written.push(write_failing_values_csv(output_dir, &values)?);
        }
    }

    Ok(CheckOutcome {
        report,
        summary,
        written,
    })
}

fn collect_failing_values(
    checker: &QualityChecker<SqliteSource>,
    report: &Report,
) -> Result<Vec<FailingValue>> {
    let limit = usize::try_from(SAMPLE_LIMIT).unwrap_or(usize::MAX);
    let mut values = Vec::new();
    for finding in report.findings() {
        if finding.status != CheckStatus::Fail {
            continue;
        }
        for value in checker.failing_values(&finding.table, &finding.field, finding.check, limit)? {
            values.push(FailingValue {
                table: finding.table.clone(),
                field: finding.field.clone(),
                check: finding.check,
                value,
            });
        }
    }
    Ok(values)
}

pub fn run_tables(args: &TablesArgs) -> Result<()> {
    let source = SqliteSource::open(&args.database)
        .with_context(|| format!("open database {}", args.database.display()))?;
    let names = source.table_names().context("list tables")?;

    let mut table = Table::new();
    table.set_header(vec!["Table", "Columns", "Rows"]);
    apply_table_style(&mut table);
    for name in names {
        let columns = source.column_names(&name)?.len();
        let rows = source.count_rows(&name)?;
        table.add_row(vec![name, columns.to_string(), rows.to_string()]);
    }
    println!("{table}");
    Ok(())
}
