//! Error taxonomy for tree construction, command resolution, and operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::{DocumentType, ValidationReport};

/// Defects in the statically composed command tree.
///
/// Raised while building the tree at startup; never recovered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyName,
    /// Two children of one parent share a name.
    #[error("duplicate command '{name}' under '{parent}'")]
    DuplicateChild { parent: String, name: String },
    /// A leaf was bound to a document type the engine has no rules for.
    #[error("no schema support registered for document type {0}")]
    UnsupportedDocumentType(DocumentType),
}

impl ConstructionError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Construction
    }
}

/// Failure to resolve a token sequence to a leaf.
///
/// `path` is the resolved prefix, starting with the program name, and
/// `candidates` are the valid child names at the failing depth.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unknown command '{token}' for '{}'; expected one of: {}", .path.join(" "), .candidates.join(", "))]
    UnknownCommand {
        path: Vec<String>,
        token: String,
        candidates: Vec<String>,
    },
    #[error("'{}' requires a subcommand; expected one of: {}", .path.join(" "), .candidates.join(", "))]
    MissingCommand {
        path: Vec<String>,
        candidates: Vec<String>,
    },
}

impl ResolveError {
    /// Replaces the reported prefix with the full path walked so far.
    pub fn at_path(self, full_path: &[String]) -> Self {
        match self {
            Self::UnknownCommand {
                token, candidates, ..
            } => Self::UnknownCommand {
                path: full_path.to_vec(),
                token,
                candidates,
            },
            Self::MissingCommand { candidates, .. } => Self::MissingCommand {
                path: full_path.to_vec(),
                candidates,
            },
        }
    }

    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Usage
    }

    /// Number of tokens consumed before resolution failed.
    pub fn depth(&self) -> usize {
        self.path().len().saturating_sub(1)
    }

    pub fn path(&self) -> &[String] {
        match self {
            Self::UnknownCommand { path, .. } | Self::MissingCommand { path, .. } => path,
        }
    }

    pub fn candidates(&self) -> &[String] {
        match self {
            Self::UnknownCommand { candidates, .. } | Self::MissingCommand { candidates, .. } => {
                candidates
            }
        }
    }
}

/// Coarse classification used for exit-status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Usage,
    Parse,
    SchemaViolation,
    Format,
    Io,
    Construction,
}

/// Failure of a validate or convert operation.
#[derive(Debug, Error)]
pub enum OperationError {
    /// Input is not well-formed in its serialization format.
    #[error("failed to parse '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Document parsed but violates its model's constraints.
    #[error(
        "'{}' is not a valid OSCAL {} ({} error(s), {} warning(s))",
        .0.source.display(),
        .0.document_type.display_name(),
        .0.error_count(),
        .0.warning_count()
    )]
    SchemaViolation(ValidationReport),

    /// Unsupported source/target format, or a document of the wrong type.
    #[error("{0}")]
    Format(String),

    /// Input could not be read or output could not be written.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OperationError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Parse { .. } => ErrorCategory::Parse,
            Self::SchemaViolation(_) => ErrorCategory::SchemaViolation,
            Self::Format(_) => ErrorCategory::Format,
            Self::Io { .. } => ErrorCategory::Io,
        }
    }
}
