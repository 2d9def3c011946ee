//! In-memory engine used by unit tests.

use std::path::Path;

use crate::{DocumentEngine, DocumentFormat, DocumentType, OperationError, ValidationReport};

pub(crate) struct StubEngine {
    supported: Vec<DocumentType>,
    report: Option<ValidationReport>,
}

impl Default for StubEngine {
    fn default() -> Self {
        Self {
            supported: DocumentType::ALL.to_vec(),
            report: None,
        }
    }
}

impl StubEngine {
    pub(crate) fn supporting(types: &[DocumentType]) -> Self {
        Self {
            supported: types.to_vec(),
            report: None,
        }
    }

    pub(crate) fn with_report(report: ValidationReport) -> Self {
        Self {
            report: Some(report),
            ..Self::default()
        }
    }
}

impl DocumentEngine for StubEngine {
    fn supports(&self, document_type: DocumentType) -> bool {
        self.supported.contains(&document_type)
    }

    fn validate(
        &self,
        document_type: DocumentType,
        input: &Path,
        _source_format: Option<DocumentFormat>,
    ) -> Result<ValidationReport, OperationError> {
        Ok(self
            .report
            .clone()
            .unwrap_or_else(|| ValidationReport::new(document_type, input)))
    }

    fn convert(
        &self,
        _document_type: DocumentType,
        _input: &Path,
        _source_format: Option<DocumentFormat>,
        target: DocumentFormat,
    ) -> Result<String, OperationError> {
        Ok(format!("converted:{target}"))
    }
}
