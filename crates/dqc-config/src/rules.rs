#![deny(unsafe_code)]

use std::io::Read;
use std::path::Path;

use dqc_model::{CheckFlags, CheckKind, RuleSet};

use crate::error::ConfigError;

/// Non-flag columns every rule configuration must carry.
const BASE_COLUMNS: [&str; 3] = ["table_name", "field_name", "description"];

fn header_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Parse a rule-declaration CSV into a [`RuleSet`].
///
/// The header row must contain `table_name`, `field_name`, `description` and
/// one column per configurable check kind; any missing column fails the whole
/// load with no partial result. Flag cells are enabled only by the literal
/// `"1"`; every other value (including `"true"` and blank) means disabled,
/// which silently switches a check off rather than erroring. Table and field
/// names are trimmed; rows with a blank table or field name are skipped.
pub fn parse_rules<R: Read>(reader: R) -> Result<RuleSet, ConfigError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers = reader.headers().map_err(|e| ConfigError::csv(&e))?.clone();

    let idx_table = header_index(&headers, "table_name");
    let idx_field = header_index(&headers, "field_name");
    let idx_description = header_index(&headers, "description");
    let flag_columns: Vec<(CheckKind, Option<usize>)> = CheckKind::FLAG_KINDS
        .iter()
        .map(|kind| (*kind, header_index(&headers, kind.as_str())))
        .collect();

    let mut missing: Vec<String> = Vec::new();
    for (name, idx) in BASE_COLUMNS
        .iter()
        .zip([idx_table, idx_field, idx_description])
    {
        if idx.is_none() {
            missing.push((*name).to_string());
        }
    }
    for (kind, idx) in &flag_columns {
        if idx.is_none() {
            missing.push(kind.as_str().to_string());
        }
    }
    if !missing.is_empty() {
        return Err(ConfigError::MissingColumns { columns: missing });
    }

    let mut rules = RuleSet::new();
    for row in reader.records() {
        let row = row.map_err(|e| ConfigError::csv(&e))?;
        let table = row
            .get(idx_table.expect("checked above"))
            .unwrap_or_default()
            .trim();
        let field = row
            .get(idx_field.expect("checked above"))
            .unwrap_or_default()
            .trim();
        if table.is_empty() || field.is_empty() {
            continue;
        }
        let description = row
            .get(idx_description.expect("checked above"))
            .unwrap_or_default()
            .to_string();

        let mut flags = CheckFlags::default();
        for (kind, idx) in &flag_columns {
            // Strict equality with "1"; no trimming, no truthiness.
            let enabled = row.get(idx.expect("checked above")) == Some("1");
            flags.set(*kind, enabled);
        }
        rules.insert(table, field, description, flags);
    }
    Ok(rules)
}

/// Load a rule-declaration CSV from disk. See [`parse_rules`].
pub fn load_rules(path: &Path) -> Result<RuleSet, ConfigError> {
    let bytes = std::fs::read(path).map_err(|e| ConfigError::io(path, e))?;
    parse_rules(bytes.as_slice())
}
