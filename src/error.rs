use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading one source export.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {0}")]
    Missing(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing timestamp")]
    MissingTimestamp,

    #[error("invalid timestamp '{0}'")]
    Timestamp(String),
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::Missing(path)
        } else {
            LoadError::Io { path, source }
        }
    }
}

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    Date(String),

    #[error("{0}")]
    Source(String),
}
