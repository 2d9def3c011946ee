//! Document-type, format, and operation-kind definitions.
//!
//! These are the identifiers the dispatch tree binds leaves to. They carry no
//! behavior of their own beyond naming; the engine behind
//! [`DocumentEngine`](crate::DocumentEngine) decides what each one means.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A structured OSCAL document model recognized by the engine.
///
/// Serializes as the document's root property name (e.g. `"assessment-plan"`).
///
/// # Examples
///
/// ```
/// use oscal_cli_core::DocumentType;
///
/// let ap = DocumentType::AssessmentPlan;
/// assert_eq!(ap.identifier(), "AssessmentPlan");
/// assert_eq!(ap.root_key(), "assessment-plan");
/// assert_eq!(ap.command_name(), "ap");
/// assert_eq!(DocumentType::from_root_key("catalog"), Some(DocumentType::Catalog));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    Catalog,
    Profile,
    ComponentDefinition,
    SystemSecurityPlan,
    AssessmentPlan,
    AssessmentResults,
    PlanOfActionAndMilestones,
}

impl DocumentType {
    /// Every document type, in command-listing order.
    pub const ALL: [DocumentType; 7] = [
        DocumentType::Catalog,
        DocumentType::Profile,
        DocumentType::ComponentDefinition,
        DocumentType::SystemSecurityPlan,
        DocumentType::AssessmentPlan,
        DocumentType::AssessmentResults,
        DocumentType::PlanOfActionAndMilestones,
    ];

    /// Model type identifier (e.g. `"Catalog"`).
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Catalog => "Catalog",
            Self::Profile => "Profile",
            Self::ComponentDefinition => "ComponentDefinition",
            Self::SystemSecurityPlan => "SystemSecurityPlan",
            Self::AssessmentPlan => "AssessmentPlan",
            Self::AssessmentResults => "AssessmentResults",
            Self::PlanOfActionAndMilestones => "PlanOfActionAndMilestones",
        }
    }

    /// Name of the single root property a serialized document of this type has.
    pub fn root_key(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Profile => "profile",
            Self::ComponentDefinition => "component-definition",
            Self::SystemSecurityPlan => "system-security-plan",
            Self::AssessmentPlan => "assessment-plan",
            Self::AssessmentResults => "assessment-results",
            Self::PlanOfActionAndMilestones => "plan-of-action-and-milestones",
        }
    }

    /// Name of the parent command grouping this type's operations.
    pub fn command_name(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Profile => "profile",
            Self::ComponentDefinition => "component-definition",
            Self::SystemSecurityPlan => "ssp",
            Self::AssessmentPlan => "ap",
            Self::AssessmentResults => "ar",
            Self::PlanOfActionAndMilestones => "poam",
        }
    }

    /// Human-readable name used in descriptions and messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Catalog => "Catalog",
            Self::Profile => "Profile",
            Self::ComponentDefinition => "Component Definition",
            Self::SystemSecurityPlan => "System Security Plan",
            Self::AssessmentPlan => "Assessment Plan",
            Self::AssessmentResults => "Assessment Results",
            Self::PlanOfActionAndMilestones => "Plan of Action and Milestones",
        }
    }

    /// Looks up a document type by its root property name.
    pub fn from_root_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.root_key() == key)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Serialization format of a document on disk.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    #[value(alias = "yml")]
    #[serde(alias = "yml")]
    Yaml,
    Xml,
}

impl DocumentFormat {
    /// Lowercase format name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Xml => "xml",
        }
    }

    /// Infers a format from a file extension (without the dot).
    ///
    /// # Examples
    ///
    /// ```
    /// use oscal_cli_core::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::from_extension("yml"), Some(DocumentFormat::Yaml));
    /// assert_eq!(DocumentFormat::from_extension("JSON"), Some(DocumentFormat::Json));
    /// assert_eq!(DocumentFormat::from_extension("txt"), None);
    /// ```
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s.trim()).ok_or_else(|| format!("unknown document format: {s}"))
    }
}

/// The uniform actions every document type supports.
///
/// There is no `render` variant; rendering has no defined semantics yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Validate,
    Convert,
}

impl OperationKind {
    /// Leaf command name for this operation.
    pub fn command_name(self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Convert => "convert",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command_name())
    }
}

/// Immutable association of one document type with one operation kind.
///
/// Fields are private; a binding cannot be re-pointed once built.
///
/// # Examples
///
/// ```
/// use oscal_cli_core::{DocumentBinding, DocumentType, OperationKind};
///
/// let binding = DocumentBinding::new(DocumentType::Catalog, OperationKind::Convert);
/// assert_eq!(binding.document_type(), DocumentType::Catalog);
/// assert_eq!(binding.kind(), OperationKind::Convert);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentBinding {
    document_type: DocumentType,
    kind: OperationKind,
}

impl DocumentBinding {
    pub const fn new(document_type: DocumentType, kind: OperationKind) -> Self {
        Self {
            document_type,
            kind,
        }
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }
}
