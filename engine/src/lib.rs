//! Validation and conversion engine for OSCAL documents.
//!
//! [`OscalEngine`] implements the [`DocumentEngine`] seam of
//! `oscal-cli-core`. Documents are read as JSON or YAML into a generic value
//! tree, typed by their single root property, checked against per-model
//! [`rules`], and re-serialized on conversion.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use oscal_cli_core::{DocumentEngine, DocumentFormat, DocumentType};
//! use oscal_cli_engine::OscalEngine;
//!
//! let engine = OscalEngine::new();
//! let report = engine
//!     .validate(DocumentType::Catalog, Path::new("catalog.json"), None)
//!     .unwrap();
//! println!("{report}");
//!
//! let yaml = engine
//!     .convert(
//!         DocumentType::Catalog,
//!         Path::new("catalog.json"),
//!         None,
//!         DocumentFormat::Yaml,
//!     )
//!     .unwrap();
//! println!("{yaml}");
//! ```

pub mod document;
pub mod error;
pub mod format;
pub mod rules;

use std::path::Path;

use oscal_cli_core::{
    DocumentEngine, DocumentFormat, DocumentType, OperationError, ValidationReport,
};
use tracing::{debug, info};

pub use document::Document;
pub use error::{EngineError, Result};

/// The stock engine: JSON and YAML input, rules for every document type.
#[derive(Debug, Clone, Copy, Default)]
pub struct OscalEngine;

impl OscalEngine {
    pub fn new() -> Self {
        Self
    }

    fn load(
        &self,
        document_type: DocumentType,
        input: &Path,
        source_format: Option<DocumentFormat>,
    ) -> Result<Document> {
        let document = Document::load(input, source_format)?;
        document.expect_type(document_type)?;
        Ok(document)
    }
}

impl DocumentEngine for OscalEngine {
    fn supports(&self, document_type: DocumentType) -> bool {
        DocumentType::ALL.contains(&document_type)
    }

    fn validate(
        &self,
        document_type: DocumentType,
        input: &Path,
        source_format: Option<DocumentFormat>,
    ) -> std::result::Result<ValidationReport, OperationError> {
        let document = self.load(document_type, input, source_format)?;

        let mut report = ValidationReport::new(document_type, input);
        report.extend(rules::check(document_type, document.body()));
        info!(
            document_type = %document_type,
            path = %input.display(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            "Validated document"
        );
        Ok(report)
    }

    fn convert(
        &self,
        document_type: DocumentType,
        input: &Path,
        source_format: Option<DocumentFormat>,
        target: DocumentFormat,
    ) -> std::result::Result<String, OperationError> {
        let document = self.load(document_type, input, source_format)?;
        debug!(from = %document.source_format(), to = %target, "Converting document");

        let rendered = document.render(target)?;
        info!(
            document_type = %document_type,
            path = %input.display(),
            to = %target,
            "Converted document"
        );
        Ok(rendered)
    }
}
