//! The seam between the dispatch core and the validation/conversion engine.

use std::path::Path;

use crate::{DocumentFormat, DocumentType, OperationError, ValidationReport};

/// Validation and conversion services keyed by document type.
///
/// The dispatch core treats implementations as black boxes. Errors must be
/// categorized as [`OperationError`] variants; implementations never panic
/// across this boundary on bad input.
pub trait DocumentEngine {
    /// Whether this engine has schema rules for `document_type`.
    ///
    /// Checked once per leaf while the command tree is built.
    fn supports(&self, document_type: DocumentType) -> bool;

    /// Validates the document at `input` as `document_type`.
    ///
    /// A returned report may contain findings; only parse, format, and I/O
    /// problems are reported as `Err`.
    fn validate(
        &self,
        document_type: DocumentType,
        input: &Path,
        source_format: Option<DocumentFormat>,
    ) -> Result<ValidationReport, OperationError>;

    /// Converts the document at `input` and returns it serialized as `target`.
    fn convert(
        &self,
        document_type: DocumentType,
        input: &Path,
        source_format: Option<DocumentFormat>,
        target: DocumentFormat,
    ) -> Result<String, OperationError>;
}
