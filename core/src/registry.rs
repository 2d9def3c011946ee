//! Static registration of every (document type, operation) leaf.
//!
//! Adding a document type means adding one row to [`REGISTRY`]; nothing in
//! the dispatcher or in other rows changes.

use crate::{
    CommandNode, ConstructionError, DocumentBinding, DocumentEngine, DocumentType, LeafCommand,
    OperationKind, ParentCommand,
};

const BOTH: &[OperationKind] = &[OperationKind::Validate, OperationKind::Convert];

/// Operations registered per document type, in listing order.
///
/// `render` is intentionally absent for every family.
pub const REGISTRY: &[(DocumentType, &[OperationKind])] = &[
    (DocumentType::Catalog, BOTH),
    (DocumentType::Profile, BOTH),
    (DocumentType::ComponentDefinition, BOTH),
    (DocumentType::SystemSecurityPlan, BOTH),
    (DocumentType::AssessmentPlan, BOTH),
    (DocumentType::AssessmentResults, BOTH),
    (DocumentType::PlanOfActionAndMilestones, BOTH),
];

/// Builds the parent command for one document type.
pub fn document_command(
    document_type: DocumentType,
    operations: &[OperationKind],
    engine: &dyn DocumentEngine,
) -> Result<ParentCommand, ConstructionError> {
    let mut parent = ParentCommand::new(
        document_type.command_name(),
        format!(
            "Perform an operation on an OSCAL {}",
            document_type.display_name()
        ),
    )?;
    for &kind in operations {
        let binding = DocumentBinding::new(document_type, kind);
        parent.add_child(CommandNode::Leaf(LeafCommand::bind(binding, engine)?))?;
    }
    Ok(parent)
}

/// Builds the full command tree from [`REGISTRY`].
///
/// # Errors
///
/// Any [`ConstructionError`]: a duplicate name anywhere in the tree, or a
/// document type `engine` does not support.
pub fn build_command_tree(
    program: &str,
    engine: &dyn DocumentEngine,
) -> Result<ParentCommand, ConstructionError> {
    let mut root = ParentCommand::new(
        program,
        "Validate and convert OSCAL documents between JSON and YAML",
    )?;
    for &(document_type, operations) in REGISTRY {
        root.add_child(CommandNode::Parent(document_command(
            document_type,
            operations,
            engine,
        )?))?;
    }
    Ok(root)
}
