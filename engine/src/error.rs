//! Error types for document loading and conversion.

use std::path::PathBuf;

use oscal_cli_core::{DocumentFormat, DocumentType, OperationError};
use thiserror::Error;

/// Errors raised by the engine before any model rule is evaluated.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The input file could not be read.
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not well-formed in its serialization format.
    #[error("invalid {format} in '{}': {message}", .path.display())]
    Parse {
        path: PathBuf,
        format: DocumentFormat,
        message: String,
    },

    /// The format is recognized but has no reader or writer.
    #[error("{0} documents are not supported; use json or yaml")]
    UnsupportedFormat(DocumentFormat),

    /// The document is not a mapping with exactly one root property.
    #[error("document root must be a mapping with a single property naming the document type")]
    InvalidRoot,

    /// The root property names no known OSCAL model.
    #[error("unrecognized OSCAL root property '{0}'")]
    UnknownRoot(String),

    /// The root property names a different model than the one requested.
    #[error(
        "document is an OSCAL {}, not an OSCAL {}",
        .found.display_name(),
        .expected.display_name()
    )]
    TypeMismatch {
        expected: DocumentType,
        found: DocumentType,
    },

    /// Serializing to the target format failed.
    #[error("failed to write {format}: {message}")]
    Serialize {
        format: DocumentFormat,
        message: String,
    },
}

/// Convenience alias for results with [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;

impl From<EngineError> for OperationError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Read { path, source } => OperationError::Io { path, source },
            EngineError::Parse {
                path,
                format,
                message,
            } => OperationError::Parse {
                path,
                message: format!("{format}: {message}"),
            },
            other => OperationError::Format(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oscal_cli_core::ErrorCategory;

    #[test]
    fn test_categories_at_the_seam() {
        let read = EngineError::Read {
            path: "a.json".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(OperationError::from(read).category(), ErrorCategory::Io);

        let parse = EngineError::Parse {
            path: "a.json".into(),
            format: DocumentFormat::Json,
            message: "EOF while parsing".into(),
        };
        let parse = OperationError::from(parse);
        assert_eq!(parse.category(), ErrorCategory::Parse);
        assert_eq!(parse.to_string(), "failed to parse 'a.json': json: EOF while parsing");

        let mismatch = EngineError::TypeMismatch {
            expected: DocumentType::AssessmentPlan,
            found: DocumentType::Catalog,
        };
        let mismatch = OperationError::from(mismatch);
        assert_eq!(mismatch.category(), ErrorCategory::Format);
        assert_eq!(
            mismatch.to_string(),
            "document is an OSCAL Catalog, not an OSCAL Assessment Plan"
        );
    }

    #[test]
    fn test_unsupported_format_message() {
        assert_eq!(
            EngineError::UnsupportedFormat(DocumentFormat::Xml).to_string(),
            "xml documents are not supported; use json or yaml"
        );
    }
}
