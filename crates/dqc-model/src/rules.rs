use std::collections::BTreeMap;

use crate::checks::CheckFlags;

/// Rules declared for one field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: String,
    pub description: String,
    pub flags: CheckFlags,
}

/// Rules declared for one table, fields in declaration order.
#[derive(Debug, Clone)]
pub struct TableRules {
    pub table: String,
    pub fields: Vec<FieldRule>,
}

/// The loaded rule configuration: `table -> field -> enabled checks`.
///
/// Declaration order of tables and fields is preserved because it dictates
/// report order. Lookup is case-sensitive on trimmed names. Built once by a
/// load call and replaced wholesale on reload.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    tables: Vec<TableRules>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the rule entry for `(table, field)`.
    ///
    /// A repeated declaration overwrites the earlier one in place, keeping
    /// its original position.
    pub fn insert(&mut self, table: &str, field: &str, description: String, flags: CheckFlags) {
        let entry = FieldRule {
            field: field.to_string(),
            description,
            flags,
        };
        match self.tables.iter_mut().find(|t| t.table == table) {
            Some(rules) => match rules.fields.iter_mut().find(|f| f.field == field) {
                Some(existing) => *existing = entry,
                None => rules.fields.push(entry),
            },
            None => self.tables.push(TableRules {
                table: table.to_string(),
                fields: vec![entry],
            }),
        }
    }

    /// Configured tables in declaration order.
    pub fn tables(&self) -> &[TableRules] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&TableRules> {
        self.tables.iter().find(|t| t.table == name)
    }

    /// Number of configured tables, for "N tables configured" reporting.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// The loaded allow-lists of valid codes: `table -> field -> codes`.
///
/// Codes keep their declared order and spelling; comparison against observed
/// values is the engine's concern (both sides upper-cased there).
#[derive(Debug, Clone, Default)]
pub struct CodeList {
    entries: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl CodeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the code list for `(table, field)`.
    pub fn insert(&mut self, table: &str, field: &str, codes: Vec<String>) {
        self.entries
            .entry(table.to_string())
            .or_default()
            .insert(field.to_string(), codes);
    }

    /// Declared codes for a field; `None` when no codes were declared.
    pub fn codes_for(&self, table: &str, field: &str) -> Option<&[String]> {
        self.entries
            .get(table)
            .and_then(|fields| fields.get(field))
            .map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
