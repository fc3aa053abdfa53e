use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed catalogue of check kinds.
///
/// The first thirteen variants correspond one-to-one to the flag columns of
/// the rule configuration CSV; the last three only ever appear on findings
/// (column missing, empty table, query failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    NullCheck,
    BlankCheck,
    EmailCheck,
    NumericCheck,
    DuplicateCheck,
    SpecialCharactersCheck,
    SystemCodesCheck,
    LanguageCheck,
    PhoneNumberCheck,
    DateCheck,
    MaxValueCheck,
    MinValueCheck,
    MaxCountCheck,
    ColumnExistence,
    DataExistence,
    DatabaseError,
}

impl CheckKind {
    /// Kinds that have a flag column in the rule configuration.
    pub const FLAG_KINDS: [CheckKind; 13] = [
        CheckKind::NullCheck,
        CheckKind::BlankCheck,
        CheckKind::EmailCheck,
        CheckKind::NumericCheck,
        CheckKind::DuplicateCheck,
        CheckKind::SpecialCharactersCheck,
        CheckKind::SystemCodesCheck,
        CheckKind::LanguageCheck,
        CheckKind::PhoneNumberCheck,
        CheckKind::DateCheck,
        CheckKind::MaxValueCheck,
        CheckKind::MinValueCheck,
        CheckKind::MaxCountCheck,
    ];

    /// Dispatch order for the kinds the engine actually probes.
    ///
    /// Max-value, min-value and max-count are accepted in configuration but
    /// have no probe; they are deliberately absent here.
    pub const PROBE_ORDER: [CheckKind; 10] = [
        CheckKind::NullCheck,
        CheckKind::BlankCheck,
        CheckKind::EmailCheck,
        CheckKind::NumericCheck,
        CheckKind::DuplicateCheck,
        CheckKind::SpecialCharactersCheck,
        CheckKind::SystemCodesCheck,
        CheckKind::LanguageCheck,
        CheckKind::PhoneNumberCheck,
        CheckKind::DateCheck,
    ];

    /// The configuration column / report `check_type` string for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            CheckKind::NullCheck => "null_check",
            CheckKind::BlankCheck => "blank_check",
            CheckKind::EmailCheck => "email_check",
            CheckKind::NumericCheck => "numeric_check",
            CheckKind::DuplicateCheck => "duplicate_check",
            CheckKind::SpecialCharactersCheck => "special_characters_check",
            CheckKind::SystemCodesCheck => "system_codes_check",
            CheckKind::LanguageCheck => "language_check",
            CheckKind::PhoneNumberCheck => "phone_number_check",
            CheckKind::DateCheck => "date_check",
            CheckKind::MaxValueCheck => "max_value_check",
            CheckKind::MinValueCheck => "min_value_check",
            CheckKind::MaxCountCheck => "max_count_check",
            CheckKind::ColumnExistence => "column_existence",
            CheckKind::DataExistence => "data_existence",
            CheckKind::DatabaseError => "database_error",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field record of enabled checks, one switch per configurable kind.
///
/// A fixed struct rather than a map so that adding a check kind is a
/// compile-time-visible change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckFlags {
    pub null_check: bool,
    pub blank_check: bool,
    pub email_check: bool,
    pub numeric_check: bool,
    pub duplicate_check: bool,
    pub special_characters_check: bool,
    pub system_codes_check: bool,
    pub language_check: bool,
    pub phone_number_check: bool,
    pub date_check: bool,
    pub max_value_check: bool,
    pub min_value_check: bool,
    pub max_count_check: bool,
}

impl CheckFlags {
    /// Returns whether the given kind is switched on.
    ///
    /// Finding-only kinds are never enabled through configuration.
    pub fn is_enabled(&self, kind: CheckKind) -> bool {
        match kind {
            CheckKind::NullCheck => self.null_check,
            CheckKind::BlankCheck => self.blank_check,
            CheckKind::EmailCheck => self.email_check,
            CheckKind::NumericCheck => self.numeric_check,
            CheckKind::DuplicateCheck => self.duplicate_check,
            CheckKind::SpecialCharactersCheck => self.special_characters_check,
            CheckKind::SystemCodesCheck => self.system_codes_check,
            CheckKind::LanguageCheck => self.language_check,
            CheckKind::PhoneNumberCheck => self.phone_number_check,
            CheckKind::DateCheck => self.date_check,
            CheckKind::MaxValueCheck => self.max_value_check,
            CheckKind::MinValueCheck => self.min_value_check,
            CheckKind::MaxCountCheck => self.max_count_check,
            CheckKind::ColumnExistence | CheckKind::DataExistence | CheckKind::DatabaseError => {
                false
            }
        }
    }

    /// Switches the given kind on or off. Finding-only kinds are ignored.
    pub fn set(&mut self, kind: CheckKind, enabled: bool) {
        match kind {
            CheckKind::NullCheck => self.null_check = enabled,
            CheckKind::BlankCheck => self.blank_check = enabled,
            CheckKind::EmailCheck => self.email_check = enabled,
            CheckKind::NumericCheck => self.numeric_check = enabled,
            CheckKind::DuplicateCheck => self.duplicate_check = enabled,
            CheckKind::SpecialCharactersCheck => self.special_characters_check = enabled,
            CheckKind::SystemCodesCheck => self.system_codes_check = enabled,
            CheckKind::LanguageCheck => self.language_check = enabled,
            CheckKind::PhoneNumberCheck => self.phone_number_check = enabled,
            CheckKind::DateCheck => self.date_check = enabled,
            CheckKind::MaxValueCheck => self.max_value_check = enabled,
            CheckKind::MinValueCheck => self.min_value_check = enabled,
            CheckKind::MaxCountCheck => self.max_count_check = enabled,
            CheckKind::ColumnExistence | CheckKind::DataExistence | CheckKind::DatabaseError => {}
        }
    }

    pub fn any_enabled(&self) -> bool {
        CheckKind::FLAG_KINDS.iter().any(|kind| self.is_enabled(*kind))
    }
}
