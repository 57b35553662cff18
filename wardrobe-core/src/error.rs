//! Import errors
//!
//! Every variant aborts the operation before anything is written.

use crate::selection::RecordKind;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("No record selected")]
    MissingSelection,

    #[error("{path} is not {expected} record")]
    WrongRecordKind { path: String, expected: RecordKind },

    #[error("Input file not found: {0}")]
    MissingInputFile(String),

    #[error("Failed to parse {path}: {reason}")]
    ParseFailure { path: String, reason: String },

    #[error("Failed to find '{field}' in {path}")]
    MissingExpectedField { path: String, field: String },

    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ImportError {
    pub(crate) fn parse(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::ParseFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn missing_field(path: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingExpectedField {
            path: path.into(),
            field: field.into(),
        }
    }
}
