//! Error types for GEDCOM decoding and record lookup.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecordError>;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("GEDCOM file is empty: {0}")]
    EmptyFile(PathBuf),

    #[error("Malformed GEDCOM at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Malformed GEDCOM: record @{0}@ is defined more than once")]
    DuplicateRecord(String),

    #[error("Malformed GEDCOM: family @{family}@ references unknown individual @{reference}@")]
    UnresolvedReference { family: String, reference: String },

    #[error("Individual {0} not found")]
    NotFound(String),
}

impl RecordError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// True for faults in the source file itself, as opposed to lookups
    /// against a store that loaded fine.
    pub fn is_decode_failure(&self) -> bool {
        !matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_failures_are_labeled() {
        let err = RecordError::syntax(12, "missing tag");
        assert!(err.is_decode_failure());
        assert_eq!(
            err.to_string(),
            "Malformed GEDCOM at line 12: missing tag"
        );

        let err = RecordError::NotFound("@I9@".into());
        assert!(!err.is_decode_failure());
        assert_eq!(err.to_string(), "Individual @I9@ not found");
    }
}
