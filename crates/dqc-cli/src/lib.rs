//! Shared infrastructure for the `dqcheck` binary.

pub mod logging;
