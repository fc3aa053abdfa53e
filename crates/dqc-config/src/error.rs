#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration CSV: {message}")]
    Csv { message: String },

    #[error("configuration is missing required column(s): {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(error: &csv::Error) -> Self {
        Self::Csv {
            message: error.to_string(),
        }
    }
}
