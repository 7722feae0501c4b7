//! Error taxonomy for the export pipeline.
//! Config errors are fatal for the whole run; everything else is scoped to one
//! account or one output group by the callers.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication failed for {account}: {reason}")]
    Auth { account: String, reason: String },

    #[error("fetching {feed} for {account} failed: {reason}")]
    Fetch { account: String, feed: String, reason: String },

    #[error("cannot export an empty group to {}", path.display())]
    EmptyGroup { path: PathBuf },

    #[error("record {index} has columns {found:?}, expected {expected:?}")]
    SchemaMismatch { index: usize, expected: Vec<String>, found: Vec<String> },

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io { path: path.into(), source }
    }
}
