use std::path::PathBuf;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use dqc_model::{CheckStatus, Report, RunSummary};

/// Renders the findings table, the aggregate summary and the list of written
/// report files.
pub fn print_summary(report: &Report, summary: &RunSummary, written: &[PathBuf]) {
    if report.is_empty() {
        println!("No findings: no configured table was present in the database.");
    } else {
        print_findings_table(report);
    }
    println!();
    print_totals_table(summary);
    for path in written {
        println!("Wrote: {}", path.display());
    }
}

fn print_findings_table(report: &Report) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Field"),
        header_cell("Check"),
        header_cell("Status"),
        header_cell("Message"),
    ]);
    apply_findings_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for finding in report.findings() {
        table.add_row(vec![
            Cell::new(&finding.table)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&finding.field),
            Cell::new(finding.check.as_str()),
            status_cell(finding.status),
            Cell::new(&finding.message),
        ]);
    }
    println!("{table}");
}

fn print_totals_table(summary: &RunSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Checks"),
        header_cell("Passed"),
        header_cell("Failed"),
        header_cell("Warnings"),
    ]);
    apply_totals_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(summary.total).add_attribute(Attribute::Bold),
        count_cell(summary.passed, Color::Green),
        count_cell(summary.failed, Color::Red),
        count_cell(summary.warnings, Color::Yellow),
    ]);
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_findings_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(18)),
            ColumnConstraint::UpperBoundary(Width::Fixed(18)),
            ColumnConstraint::UpperBoundary(Width::Fixed(26)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
        ]);
    }
}

fn apply_totals_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: CheckStatus) -> Cell {
    match status {
        CheckStatus::Pass => Cell::new("PASS").fg(Color::Green),
        CheckStatus::Fail => Cell::new("FAIL")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        CheckStatus::Warning => Cell::new("WARNING").fg(Color::Yellow),
        CheckStatus::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
