//! Loaders for the tabular rule and code-list configuration.
//!
//! Both loaders are all-or-nothing: they build a fresh value and return it
//! only on full success, so a failed reload can never corrupt previously
//! loaded configuration.

mod codes;
mod error;
mod rules;

pub use codes::{load_codes, parse_codes};
pub use error::ConfigError;
pub use rules::{load_rules, parse_rules};
