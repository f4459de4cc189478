//! Error types for document loading and analysis.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the analyzer itself.
///
/// Analysis is tolerant of incomplete documents: missing sections are empty
/// collections and unresolvable references are skipped. Only a document whose
/// top level cannot be interpreted at all is rejected.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("invalid specification document: {message}")]
    InvalidDocument { message: String },
}

impl AnalyzeError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            AnalyzeError::InvalidDocument { .. } => 2,
        }
    }
}

/// Errors while loading a document, context snapshot, or config file.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            LoadError::InvalidJson { .. } => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("openapi.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = LoadError::InvalidJson { source };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn analyze_error_display() {
        let err = AnalyzeError::InvalidDocument {
            message: "missing paths section".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid specification document: missing paths section"
        );
        assert_eq!(err.exit_code(), 2);
    }
}
