//! Check dispatch and run orchestration.

use std::path::Path;

use tracing::{debug, info, warn};

use dqc_config::ConfigError;
use dqc_model::{CheckFlags, CheckKind, CheckStatus, CodeList, Finding, Report, RuleSet};

use crate::source::{DataSource, SourceError};
use crate::validators;

/// Upper bound on the number of values fetched for a sampled check. Value
/// checks validate at most this many rows (distinct values for system codes);
/// counts in messages still refer to the full qualifying population.
pub const SAMPLE_LIMIT: u64 = 100;

/// The validation engine: owns one data source plus the loaded rule and
/// code-list configuration, and produces a [`Report`] per run.
///
/// Runs take `&self` and configuration loads take `&mut self`, so a reload
/// cannot overlap a run on the same instance.
#[derive(Debug)]
pub struct QualityChecker<S> {
    source: S,
    rules: RuleSet,
    codes: CodeList,
}

impl<S: DataSource> QualityChecker<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            rules: RuleSet::new(),
            codes: CodeList::new(),
        }
    }

    /// Loads the rule configuration CSV, replacing any previous rule set.
    /// On error the previous rule set stays in effect.
    pub fn load_rules(&mut self, path: &Path) -> Result<(), ConfigError> {
        let rules = dqc_config::load_rules(path)?;
        info!(tables = rules.table_count(), "rule configuration loaded");
        self.rules = rules;
        Ok(())
    }

    /// Loads the code-list CSV, replacing any previous code lists.
    /// On error the previous code lists stay in effect.
    pub fn load_codes(&mut self, path: &Path) -> Result<(), ConfigError> {
        self.codes = dqc_config::load_codes(path)?;
        Ok(())
    }

    pub fn set_rules(&mut self, rules: RuleSet) {
        self.rules = rules;
    }

    pub fn set_codes(&mut self, codes: CodeList) {
        self.codes = codes;
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of tables in the loaded rule configuration.
    pub fn table_count(&self) -> usize {
        self.rules.table_count()
    }

    /// Runs every configured check against every configured table.
    ///
    /// Tables absent from the data source are skipped without a finding;
    /// tables whose findings come up empty get no report entry.
    pub fn run_all(&self) -> Report {
        let mut report = Report::default();
        for table_rules in self.rules.tables() {
            self.run_table_into(&mut report, &table_rules.table);
        }
        info!(tables = report.tables.len(), "run complete");
        report
    }

    /// Runs checks for a single configured table. A table with no rules, or
    /// one absent from the source, yields an empty report.
    pub fn run_for_table(&self, table: &str) -> Report {
        let mut report = Report::default();
        if self.rules.table(table).is_some() {
            self.run_table_into(&mut report, table);
        }
        report
    }

    fn run_table_into(&self, report: &mut Report, table: &str) {
        match self.source.table_exists(table) {
            Ok(true) => {}
            Ok(false) => {
                debug!(table, "table not present in source, skipping");
                return;
            }
            Err(error) => {
                warn!(table, %error, "table lookup failed, skipping");
                return;
            }
        }
        let Some(table_rules) = self.rules.table(table) else {
            return;
        };
        let mut findings = Vec::new();
        for rule in &table_rules.fields {
            findings.extend(self.check_field(table, &rule.field, rule.flags));
        }
        debug!(table, findings = findings.len(), "table checked");
        report.push_table(table, findings);
    }

    /// Applies every enabled check to one field, in fixed dispatch order.
    fn check_field(&self, table: &str, field: &str, flags: CheckFlags) -> Vec<Finding> {
        let mut findings = Vec::new();

        match self.source.column_exists(table, field) {
            Ok(true) => {}
            Ok(false) => {
                findings.push(finding(
                    table,
                    field,
                    CheckKind::ColumnExistence,
                    CheckStatus::Fail,
                    format!("Column '{field}' does not exist in table '{table}'"),
                ));
                return findings;
            }
            Err(error) => {
                findings.push(database_error(table, field, &error));
                return findings;
            }
        }

        let total_rows = match self.source.count_rows(table) {
            Ok(count) => count,
            Err(error) => {
                findings.push(database_error(table, field, &error));
                return findings;
            }
        };
        if total_rows == 0 {
            findings.push(finding(
                table,
                field,
                CheckKind::DataExistence,
                CheckStatus::Warning,
                format!("Table '{table}' has no data"),
            ));
            return findings;
        }

        for kind in CheckKind::PROBE_ORDER {
            if !flags.is_enabled(kind) {
                continue;
            }
            match self.probe(table, field, kind, total_rows) {
                Ok(Some(result)) => findings.push(result),
                Ok(None) => debug!(table, field, %kind, "no qualifying values, check skipped"),
                Err(error) => {
                    findings.push(database_error(table, field, &error));
                    break;
                }
            }
        }
        findings
    }

    /// Runs one probe. `Ok(None)` means the check was skipped because it had
    /// no qualifying values; this is distinct from a PASS and produces no
    /// finding at all.
    fn probe(
        &self,
        table: &str,
        field: &str,
        kind: CheckKind,
        total_rows: u64,
    ) -> Result<Option<Finding>, SourceError> {
        let result = match kind {
            CheckKind::NullCheck => {
                let nulls = self.source.count_null(table, field)?;
                if nulls > 0 {
                    finding(
                        table,
                        field,
                        kind,
                        CheckStatus::Fail,
                        format!("Found {nulls} NULL values out of {total_rows} total rows"),
                    )
                } else {
                    finding(
                        table,
                        field,
                        kind,
                        CheckStatus::Pass,
                        "No NULL values found".to_string(),
                    )
                }
            }
            CheckKind::BlankCheck => {
                let blanks = self.source.count_blank(table, field)?;
                if blanks > 0 {
                    finding(
                        table,
                        field,
                        kind,
                        CheckStatus::Fail,
                        format!("Found {blanks} blank values out of {total_rows} total rows"),
                    )
                } else {
                    finding(
                        table,
                        field,
                        kind,
                        CheckStatus::Pass,
                        "No blank values found".to_string(),
                    )
                }
            }
            CheckKind::DuplicateCheck => {
                let groups = self.source.duplicate_groups(table, field)?;
                if groups.is_empty() {
                    finding(
                        table,
                        field,
                        kind,
                        CheckStatus::Pass,
                        "No duplicate values found".to_string(),
                    )
                } else {
                    let excess: u64 = groups.iter().map(|g| g.count.saturating_sub(1)).sum();
                    finding(
                        table,
                        field,
                        kind,
                        CheckStatus::Fail,
                        format!(
                            "Found {excess} duplicate values across {} distinct values",
                            groups.len()
                        ),
                    )
                }
            }
            CheckKind::SystemCodesCheck => {
                return self.system_codes_probe(table, field);
            }
            CheckKind::EmailCheck
            | CheckKind::NumericCheck
            | CheckKind::SpecialCharactersCheck
            | CheckKind::LanguageCheck
            | CheckKind::PhoneNumberCheck
            | CheckKind::DateCheck => {
                return self.value_probe(table, field, kind);
            }
            // Flagged but not probed; filtered out by PROBE_ORDER.
            CheckKind::MaxValueCheck
            | CheckKind::MinValueCheck
            | CheckKind::MaxCountCheck
            | CheckKind::ColumnExistence
            | CheckKind::DataExistence
            | CheckKind::DatabaseError => return Ok(None),
        };
        Ok(Some(result))
    }

    /// Sample-bounded value-shape probe shared by the email, numeric,
    /// special-characters, language, phone and date checks.
    fn value_probe(
        &self,
        table: &str,
        field: &str,
        kind: CheckKind,
    ) -> Result<Option<Finding>, SourceError> {
        let qualifying = self.source.count_non_blank(table, field)?;
        if qualifying == 0 {
            return Ok(None);
        }
        let sample = self.source.sample_non_blank(table, field, SAMPLE_LIMIT)?;
        let invalid = sample
            .iter()
            .filter(|value| !value_is_valid(kind, value.trim()))
            .count();
        let (status, message) = value_probe_outcome(kind, invalid, qualifying);
        Ok(Some(finding(table, field, kind, status, message)))
    }

    fn system_codes_probe(
        &self,
        table: &str,
        field: &str,
    ) -> Result<Option<Finding>, SourceError> {
        let qualifying = self.source.count_non_blank(table, field)?;
        if qualifying == 0 {
            return Ok(None);
        }
        let sample = self
            .source
            .sample_distinct_non_blank(table, field, SAMPLE_LIMIT)?;
        let declared = self.codes.codes_for(table, field).unwrap_or_default();
        let declared_upper: Vec<String> = declared.iter().map(|c| c.to_uppercase()).collect();

        // Without declared codes nothing can be flagged invalid, so the
        // check passes vacuously.
        let invalid = if declared.is_empty() {
            0
        } else {
            sample
                .iter()
                .filter(|value| !declared_upper.contains(&value.trim().to_uppercase()))
                .count()
        };

        let result = if invalid > 0 {
            let mut message =
                format!("Found {invalid} invalid system codes out of {qualifying} values");
            message.push_str(&format!(" (Valid codes: {} defined)", declared.len()));
            finding(table, field, CheckKind::SystemCodesCheck, CheckStatus::Fail, message)
        } else {
            finding(
                table,
                field,
                CheckKind::SystemCodesCheck,
                CheckStatus::Pass,
                format!("All {qualifying} values are valid system codes"),
            )
        };
        Ok(Some(result))
    }

    /// Concrete offending values behind a FAIL finding, up to `limit`.
    ///
    /// Value-shape and code checks re-run their bounded sample; the
    /// duplicate check returns the duplicated values themselves. Null and
    /// existence findings have no representable values and yield an empty
    /// list, as do the inert max/min/max-count flags.
    pub fn failing_values(
        &self,
        table: &str,
        field: &str,
        kind: CheckKind,
        limit: usize,
    ) -> Result<Vec<String>, SourceError> {
        let mut values = match kind {
            CheckKind::BlankCheck => {
                let blanks = self.source.count_blank(table, field)?;
                let shown = usize::try_from(blanks).unwrap_or(usize::MAX).min(limit);
                vec![String::new(); shown]
            }
            CheckKind::EmailCheck
            | CheckKind::NumericCheck
            | CheckKind::SpecialCharactersCheck
            | CheckKind::LanguageCheck
            | CheckKind::PhoneNumberCheck
            | CheckKind::DateCheck => self
                .source
                .sample_non_blank(table, field, SAMPLE_LIMIT)?
                .into_iter()
                .map(|value| value.trim().to_string())
                .filter(|value| !value_is_valid(kind, value))
                .collect(),
            CheckKind::SystemCodesCheck => {
                let declared = self.codes.codes_for(table, field).unwrap_or_default();
                if declared.is_empty() {
                    Vec::new()
                } else {
                    let declared_upper: Vec<String> =
                        declared.iter().map(|c| c.to_uppercase()).collect();
                    self.source
                        .sample_distinct_non_blank(table, field, SAMPLE_LIMIT)?
                        .into_iter()
                        .map(|value| value.trim().to_string())
                        .filter(|value| !declared_upper.contains(&value.to_uppercase()))
                        .collect()
                }
            }
            CheckKind::DuplicateCheck => self
                .source
                .duplicate_groups(table, field)?
                .into_iter()
                .map(|group| group.value)
                .collect(),
            CheckKind::NullCheck
            | CheckKind::MaxValueCheck
            | CheckKind::MinValueCheck
            | CheckKind::MaxCountCheck
            | CheckKind::ColumnExistence
            | CheckKind::DataExistence
            | CheckKind::DatabaseError => Vec::new(),
        };
        values.truncate(limit);
        Ok(values)
    }
}

fn finding(
    table: &str,
    field: &str,
    check: CheckKind,
    status: CheckStatus,
    message: String,
) -> Finding {
    Finding {
        table: table.to_string(),
        field: field.to_string(),
        check,
        status,
        message,
    }
}

fn database_error(table: &str, field: &str, error: &SourceError) -> Finding {
    warn!(table, field, %error, "query failed");
    finding(
        table,
        field,
        CheckKind::DatabaseError,
        CheckStatus::Error,
        format!("Database error: {error}"),
    )
}

fn value_is_valid(kind: CheckKind, value: &str) -> bool {
    match kind {
        CheckKind::EmailCheck => validators::is_valid_email(value),
        CheckKind::NumericCheck => validators::is_numeric(value),
        CheckKind::SpecialCharactersCheck => !validators::has_disallowed_characters(value),
        CheckKind::LanguageCheck => !validators::has_non_ascii(value),
        CheckKind::PhoneNumberCheck => validators::is_valid_phone(value),
        CheckKind::DateCheck => validators::is_valid_date(value),
        _ => true,
    }
}

fn value_probe_outcome(kind: CheckKind, invalid: usize, qualifying: u64) -> (CheckStatus, String) {
    let message = match kind {
        CheckKind::EmailCheck => {
            if invalid > 0 {
                format!("Found {invalid} invalid email formats out of {qualifying} values")
            } else {
                format!("All {qualifying} email formats appear valid")
            }
        }
        CheckKind::NumericCheck => {
            if invalid > 0 {
                format!("Found {invalid} non-numeric values out of {qualifying} values")
            } else {
                format!("All {qualifying} values are numeric")
            }
        }
        CheckKind::SpecialCharactersCheck => {
            if invalid > 0 {
                format!("Found {invalid} values with special characters out of {qualifying} values")
            } else {
                format!("All {qualifying} values are free of special characters")
            }
        }
        CheckKind::LanguageCheck => {
            if invalid > 0 {
                format!("Found {invalid} values with non-ASCII characters out of {qualifying} values")
            } else {
                format!("All {qualifying} values are ASCII")
            }
        }
        CheckKind::PhoneNumberCheck => {
            if invalid > 0 {
                format!("Found {invalid} invalid phone numbers out of {qualifying} values")
            } else {
                format!("All {qualifying} phone numbers appear valid")
            }
        }
        CheckKind::DateCheck => {
            if invalid > 0 {
                format!("Found {invalid} invalid date formats out of {qualifying} values")
            } else {
                format!("All {qualifying} date formats appear valid")
            }
        }
        other => unreachable!("{other} is not a value-shape check"),
    };
    let status = if invalid > 0 {
        CheckStatus::Fail
    } else {
        CheckStatus::Pass
    };
    (status, message)
}
