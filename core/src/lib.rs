//! Command dispatch core for the OSCAL command-line front end.
//!
//! This crate owns the part of the tool that does not depend on any document
//! format:
//!
//! - [`DocumentOperation`]: the validate/convert contract shared by every
//!   document type.
//! - [`LeafCommand`]: binds one [`DocumentType`] to one [`OperationKind`].
//! - [`ParentCommand`]: groups children under a name and routes by exact
//!   match.
//! - [`Dispatcher`]: resolves a token sequence to one leaf, runs it, and
//!   returns the process [`ExitStatus`].
//!
//! The actual schema checking and format transformation sit behind the
//! [`DocumentEngine`] trait.
//!
//! # Example
//!
//! ```no_run
//! use oscal_cli_core::*;
//! # fn engine() -> Box<dyn DocumentEngine> { unimplemented!() }
//!
//! let engine = engine();
//! let tree = build_command_tree("oscal-cli", engine.as_ref()).unwrap();
//! assert_eq!(tree.child_names()[0], "catalog");
//!
//! let dispatcher = Dispatcher::new(&tree, engine.as_ref());
//! let args = vec!["ap".to_string(), "validate".to_string(), "plan.json".to_string()];
//! let status = dispatcher.dispatch(&args);
//! std::process::exit(status.code());
//! ```

mod args;
mod command;
mod context;
mod dispatch;
mod engine;
mod error;
mod exit;
mod operation;
mod registry;
mod report;
mod types;

#[cfg(test)]
mod testing;

pub use args::parse_context;
pub use command::{CommandNode, LeafCommand, ParentCommand};
pub use context::{Invocation, InvocationContext, OperationDefaults};
pub use dispatch::{Dispatcher, Resolution};
pub use engine::DocumentEngine;
pub use error::{ConstructionError, ErrorCategory, OperationError, ResolveError};
pub use exit::ExitStatus;
pub use operation::{ConvertOperation, DocumentOperation, ValidateOperation, operation_for};
pub use registry::{REGISTRY, build_command_tree, document_command};
pub use report::{Finding, Severity, ValidationReport};
pub use types::{DocumentBinding, DocumentFormat, DocumentType, OperationKind};
