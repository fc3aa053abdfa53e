#![deny(unsafe_code)]

use std::io::Read;
use std::path::Path;

use dqc_model::CodeList;

use crate::error::ConfigError;

const REQUIRED_COLUMNS: [&str; 3] = ["table_name", "field_name", "valid_codes"];

fn header_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Parse a code-list CSV into a [`CodeList`].
///
/// Required columns: `table_name`, `field_name`, `valid_codes`. The
/// `valid_codes` cell is a comma-separated list; tokens are trimmed and empty
/// tokens dropped. Missing columns fail the load with no partial result.
pub fn parse_codes<R: Read>(reader: R) -> Result<CodeList, ConfigError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers = reader.headers().map_err(|e| ConfigError::csv(&e))?.clone();

    let indices: Vec<Option<usize>> = REQUIRED_COLUMNS
        .iter()
        .map(|name| header_index(&headers, name))
        .collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .zip(&indices)
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| (*name).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingColumns { columns: missing });
    }
    let (idx_table, idx_field, idx_codes) = (
        indices[0].expect("checked above"),
        indices[1].expect("checked above"),
        indices[2].expect("checked above"),
    );

    let mut codes = CodeList::new();
    for row in reader.records() {
        let row = row.map_err(|e| ConfigError::csv(&e))?;
        let table = row.get(idx_table).unwrap_or_default().trim();
        let field = row.get(idx_field).unwrap_or_default().trim();
        if table.is_empty() || field.is_empty() {
            continue;
        }
        let declared: Vec<String> = row
            .get(idx_codes)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();
        codes.insert(table, field, declared);
    }
    Ok(codes)
}

/// Load a code-list CSV from disk. See [`parse_codes`].
pub fn load_codes(path: &Path) -> Result<CodeList, ConfigError> {
    let bytes = std::fs::read(path).map_err(|e| ConfigError::io(path, e))?;
    parse_codes(bytes.as_slice())
}
