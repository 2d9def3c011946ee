//! The validate/convert operation contract shared by every document type.
//!
//! A leaf never implements an operation itself. It holds one
//! [`DocumentOperation`] built from its [`DocumentBinding`], so every document
//! type gets exactly the same validate and convert behavior.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::{
    DocumentBinding, DocumentEngine, DocumentType, InvocationContext, OperationError,
    OperationKind,
};

/// Stand-in path used in I/O errors about standard output.
const STDOUT: &str = "<stdout>";

/// Uniform shape of a document-type operation.
pub trait DocumentOperation: Send + Sync {
    /// One-line summary of what the operation does for its document type.
    fn description(&self) -> String;

    /// The document model this operation targets.
    fn document_type(&self) -> DocumentType;

    /// Runs the operation through `engine`, writing user-facing output to `out`
    /// or to the destination named in `ctx`.
    fn execute(
        &self,
        ctx: &InvocationContext,
        engine: &dyn DocumentEngine,
        out: &mut dyn Write,
    ) -> Result<(), OperationError>;
}

/// Builds the operation a binding names.
pub fn operation_for(binding: DocumentBinding) -> Box<dyn DocumentOperation> {
    match binding.kind() {
        OperationKind::Validate => Box::new(ValidateOperation::new(binding.document_type())),
        OperationKind::Convert => Box::new(ConvertOperation::new(binding.document_type())),
    }
}

/// Checks a document against its model and reports findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOperation {
    document_type: DocumentType,
}

impl ValidateOperation {
    pub fn new(document_type: DocumentType) -> Self {
        Self { document_type }
    }
}

impl DocumentOperation for ValidateOperation {
    fn description(&self) -> String {
        format!(
            "Check that the specified OSCAL {} is well-formed and valid",
            self.document_type.display_name()
        )
    }

    fn document_type(&self) -> DocumentType {
        self.document_type
    }

    fn execute(
        &self,
        ctx: &InvocationContext,
        engine: &dyn DocumentEngine,
        out: &mut dyn Write,
    ) -> Result<(), OperationError> {
        debug!(document_type = %self.document_type, input = %ctx.input.display(), "Validating");
        let report = engine.validate(self.document_type, &ctx.input, ctx.source_format)?;

        if let Some(dest) = &ctx.output {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| OperationError::Format(format!("failed to serialize report: {e}")))?;
            write_file(dest, &json, true)?;
            debug!(report = %dest.display(), "Wrote validation report");
        }

        if !report.passes(ctx.strict) {
            return Err(OperationError::SchemaViolation(report));
        }

        write!(out, "{report}").map_err(|e| OperationError::io(STDOUT, e))?;
        writeln!(
            out,
            "The file '{}' is a valid OSCAL {}.",
            ctx.input.display(),
            self.document_type.display_name()
        )
        .map_err(|e| OperationError::io(STDOUT, e))?;
        info!(input = %ctx.input.display(), "Validation passed");
        Ok(())
    }
}

/// Re-serializes a document into another format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOperation {
    document_type: DocumentType,
}

impl ConvertOperation {
    pub fn new(document_type: DocumentType) -> Self {
        Self { document_type }
    }
}

impl DocumentOperation for ConvertOperation {
    fn description(&self) -> String {
        format!(
            "Convert the specified OSCAL {} to a different format",
            self.document_type.display_name()
        )
    }

    fn document_type(&self) -> DocumentType {
        self.document_type
    }

    fn execute(
        &self,
        ctx: &InvocationContext,
        engine: &dyn DocumentEngine,
        out: &mut dyn Write,
    ) -> Result<(), OperationError> {
        let Some(target) = ctx.target_format else {
            return Err(OperationError::Format(
                "no target format given; pass --to <json|yaml|xml>".to_string(),
            ));
        };

        // Fail before doing any work if the destination is taken.
        if let Some(dest) = &ctx.output {
            if dest.exists() && !ctx.overwrite {
                return Err(OperationError::io(
                    dest,
                    std::io::Error::new(
                        std::io::ErrorKind::AlreadyExists,
                        "destination exists; pass --overwrite to replace it",
                    ),
                ));
            }
        }

        debug!(
            document_type = %self.document_type,
            input = %ctx.input.display(),
            target = %target,
            "Converting"
        );
        let mut rendered =
            engine.convert(self.document_type, &ctx.input, ctx.source_format, target)?;
        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }

        match &ctx.output {
            Some(dest) => {
                write_file(dest, &rendered, ctx.overwrite)?;
                info!(output = %dest.display(), format = %target, "Conversion written");
            }
            None => out
                .write_all(rendered.as_bytes())
                .map_err(|e| OperationError::io(STDOUT, e))?,
        }
        Ok(())
    }
}

fn write_file(path: &Path, contents: &str, overwrite: bool) -> Result<(), OperationError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| OperationError::io(parent, e))?;
        }
    }
    let result = if overwrite {
        fs::write(path, contents)
    } else {
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .and_then(|mut file| file.write_all(contents.as_bytes()))
    };
    result.map_err(|e| OperationError::io(path, e))
}
