//! Command tree nodes.
//!
//! The tree is a tagged variant: every node is either a [`LeafCommand`] bound
//! to one document operation, or a [`ParentCommand`] that routes to its
//! children by exact name. Nodes are built once at startup and hold no
//! per-invocation state.

use std::io::Write;

use tracing::debug;

use crate::args::parse_context;
use crate::operation::{DocumentOperation, operation_for};
use crate::{
    ConstructionError, DocumentBinding, DocumentEngine, ErrorCategory, ExitStatus, Invocation,
    OperationDefaults, OperationError, ResolveError,
};

/// A named, described unit of the dispatch tree.
#[derive(Debug)]
pub enum CommandNode {
    Leaf(LeafCommand),
    Parent(ParentCommand),
}

impl CommandNode {
    pub fn name(&self) -> &str {
        match self {
            Self::Leaf(leaf) => leaf.name(),
            Self::Parent(parent) => parent.name(),
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::Leaf(leaf) => leaf.description(),
            Self::Parent(parent) => parent.description().to_string(),
        }
    }
}

/// Terminal node bound to exactly one (document type, operation kind) pair.
pub struct LeafCommand {
    binding: DocumentBinding,
    operation: Box<dyn DocumentOperation>,
}

impl LeafCommand {
    /// Binds a leaf, failing if `engine` has no rules for the document type.
    ///
    /// The leaf's name is the operation kind's command name.
    pub fn bind(
        binding: DocumentBinding,
        engine: &dyn DocumentEngine,
    ) -> Result<Self, ConstructionError> {
        let operation = operation_for(binding);
        if !engine.supports(operation.document_type()) {
            return Err(ConstructionError::UnsupportedDocumentType(
                operation.document_type(),
            ));
        }
        Ok(Self { binding, operation })
    }

    pub fn name(&self) -> &str {
        self.binding.kind().command_name()
    }

    pub fn description(&self) -> String {
        self.operation.description()
    }

    pub fn binding(&self) -> DocumentBinding {
        self.binding
    }

    /// Parses leaf arguments, executes the bound operation, and maps the
    /// outcome to an exit status.
    ///
    /// Operation errors never escape: they are reported on stderr (schema
    /// violations print the full report on stdout) and turned into the
    /// category's status.
    pub fn run(
        &self,
        invocation: &Invocation,
        engine: &dyn DocumentEngine,
        defaults: &OperationDefaults,
    ) -> ExitStatus {
        let about = self.description();
        let ctx = match parse_context(self.binding.kind(), invocation, &about, defaults) {
            Ok(ctx) => ctx,
            Err(err) => {
                use clap::error::ErrorKind;
                let _ = err.print();
                return match err.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitStatus::SUCCESS,
                    _ => ExitStatus::from(ErrorCategory::Usage),
                };
            }
        };

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match self.operation.execute(&ctx, engine, &mut out) {
            Ok(()) => ExitStatus::SUCCESS,
            Err(err) => report_failure(&err, &mut out),
        }
    }
}

fn report_failure(err: &OperationError, out: &mut dyn Write) -> ExitStatus {
    if let OperationError::SchemaViolation(report) = err {
        let _ = write!(out, "{report}");
    }
    eprintln!("error: {err}");
    let status = ExitStatus::from(err.category());
    debug!(category = ?err.category(), code = status.code(), "Operation failed");
    status
}

impl std::fmt::Debug for LeafCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeafCommand")
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

/// Non-terminal node routing to children by exact, case-sensitive name.
#[derive(Debug)]
pub struct ParentCommand {
    name: String,
    description: String,
    children: Vec<CommandNode>,
}

impl ParentCommand {
    /// Creates a parent with no children.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::EmptyName`] for an empty or blank name.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ConstructionError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConstructionError::EmptyName);
        }
        Ok(Self {
            name,
            description: description.into(),
            children: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    /// Registers a child, rejecting a name already used by a sibling.
    pub fn add_child(&mut self, node: CommandNode) -> Result<(), ConstructionError> {
        if self.child(node.name()).is_some() {
            return Err(ConstructionError::DuplicateChild {
                parent: self.name.clone(),
                name: node.name().to_string(),
            });
        }
        self.children.push(node);
        Ok(())
    }

    /// Builder-style [`add_child`](Self::add_child).
    pub fn with_child(mut self, node: CommandNode) -> Result<Self, ConstructionError> {
        self.add_child(node)?;
        Ok(self)
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|c| c.name() == name)
    }

    /// Child names in registration order.
    pub fn child_names(&self) -> Vec<String> {
        self.children.iter().map(|c| c.name().to_string()).collect()
    }

    /// Consumes the first token as a child name.
    ///
    /// No abbreviation or fuzzy matching is attempted. On failure the error's
    /// path holds only this parent's name; the dispatcher widens it.
    pub fn resolve<'t>(
        &self,
        tokens: &'t [String],
    ) -> Result<(&CommandNode, &'t [String]), ResolveError> {
        let Some((first, rest)) = tokens.split_first() else {
            return Err(ResolveError::MissingCommand {
                path: vec![self.name.clone()],
                candidates: self.child_names(),
            });
        };
        match self.child(first) {
            Some(child) => {
                debug!(parent = %self.name, child = %first, "Resolved command segment");
                Ok((child, rest))
            }
            None => Err(ResolveError::UnknownCommand {
                path: vec![self.name.clone()],
                token: first.clone(),
                candidates: self.child_names(),
            }),
        }
    }

    /// Help listing: name, description, and one line per child.
    pub fn usage(&self, path: &[String]) -> String {
        let mut out = format!(
            "{}\n\nUsage: {} <COMMAND>\n\nCommands:\n",
            self.description,
            path.join(" ")
        );
        let width = self
            .children
            .iter()
            .map(|c| c.name().len())
            .max()
            .unwrap_or(0);
        for child in &self.children {
            out.push_str(&format!(
                "  {:<width$}  {}\n",
                child.name(),
                child.description(),
                width = width
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubEngine;
    use crate::{DocumentType, OperationKind};

    fn leaf(ty: DocumentType, kind: OperationKind) -> CommandNode {
        CommandNode::Leaf(
            LeafCommand::bind(DocumentBinding::new(ty, kind), &StubEngine::default()).unwrap(),
        )
    }

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_duplicate_sibling_is_rejected_at_construction() {
        let mut ap = ParentCommand::new("ap", "Assessment plans").unwrap();
        ap.add_child(leaf(DocumentType::AssessmentPlan, OperationKind::Validate))
            .unwrap();

        let err = ap
            .add_child(leaf(DocumentType::AssessmentPlan, OperationKind::Validate))
            .unwrap_err();
        assert_eq!(
            err,
            ConstructionError::DuplicateChild {
                parent: "ap".to_string(),
                name: "validate".to_string()
            }
        );
        assert_eq!(ap.children().len(), 1);
    }

    #[test]
    fn test_empty_parent_name_is_rejected() {
        assert_eq!(
            ParentCommand::new("  ", "blank").unwrap_err(),
            ConstructionError::EmptyName
        );
    }

    #[test]
    fn test_bind_fails_fast_for_unsupported_type() {
        let engine = StubEngine::supporting(&[DocumentType::Catalog]);
        let err = LeafCommand::bind(
            DocumentBinding::new(DocumentType::Profile, OperationKind::Validate),
            &engine,
        )
        .err();
        assert_eq!(
            err,
            Some(ConstructionError::UnsupportedDocumentType(
                DocumentType::Profile
            ))
        );
    }

    #[test]
    fn test_resolve_exact_match_only() {
        let ap = ParentCommand::new("ap", "Assessment plans")
            .unwrap()
            .with_child(leaf(DocumentType::AssessmentPlan, OperationKind::Validate))
            .unwrap()
            .with_child(leaf(DocumentType::AssessmentPlan, OperationKind::Convert))
            .unwrap();

        let input = tokens(&["convert", "plan.json"]);
        let (node, rest) = ap.resolve(&input).unwrap();
        assert_eq!(node.name(), "convert");
        assert_eq!(rest, ["plan.json"]);

        for bad in ["Convert", "conv", "validatee"] {
            let err = ap.resolve(&tokens(&[bad])).unwrap_err();
            assert_eq!(err.candidates(), ["validate", "convert"]);
        }
    }

    #[test]
    fn test_resolve_without_tokens_is_missing_command() {
        let ap = ParentCommand::new("ap", "Assessment plans")
            .unwrap()
            .with_child(leaf(DocumentType::AssessmentPlan, OperationKind::Validate))
            .unwrap();
        let err = ap.resolve(&[]).unwrap_err();
        assert!(matches!(err, ResolveError::MissingCommand { .. }));
    }

    #[test]
    fn test_usage_lists_children_with_descriptions() {
        let ap = ParentCommand::new("ap", "Perform an operation on an OSCAL Assessment Plan")
            .unwrap()
            .with_child(leaf(DocumentType::AssessmentPlan, OperationKind::Validate))
            .unwrap();
        let usage = ap.usage(&tokens(&["oscal-cli", "ap"]));
        assert!(usage.contains("Usage: oscal-cli ap <COMMAND>"));
        assert!(usage.contains(
            "  validate  Check that the specified OSCAL Assessment Plan is well-formed and valid"
        ));
    }
}
