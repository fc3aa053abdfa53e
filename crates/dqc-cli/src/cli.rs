//! CLI argument definitions for the data quality checker.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dqcheck",
    version,
    about = "Data Quality Checker - Validate database contents against declarative rules",
    long_about = "Validate the contents of a SQLite database against a CSV rule \
                  declaration and optional code-list allow-lists.\n\n\
                  Emits PASS/FAIL/WARNING/ERROR findings per table and field, with \
                  optional JSON and CSV report export."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the configured quality checks against a database.
    Check(CheckArgs),

    /// List the tables of a database.
    Tables(TablesArgs),
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the SQLite database to inspect.
    #[arg(long = "database", value_name = "FILE")]
    pub database: PathBuf,

    /// Rule declaration CSV (one row per table/field, one column per check).
    #[arg(long = "rules", value_name = "CSV")]
    pub rules: PathBuf,

    /// Code-list CSV declaring the valid codes per table/field.
    #[arg(long = "codes", value_name = "CSV")]
    pub codes: Option<PathBuf>,

    /// Restrict the run to a single configured table.
    #[arg(long = "table", value_name = "NAME")]
    pub table: Option<String>,

    /// Directory for the JSON report and results CSV (skipped when absent).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Also export the offending values behind FAIL findings.
    ///
    /// Requires --output-dir; writes failing_values.csv next to the report.
    #[arg(long = "export-failures", requires = "output_dir")]
    pub export_failures: bool,
}

#[derive(Parser)]
pub struct TablesArgs {
    /// Path to the SQLite database to inspect.
    #[arg(value_name = "DATABASE")]
    pub database: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
