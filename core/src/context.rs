//! Per-invocation state handed from the dispatcher to a leaf.

use std::path::{Path, PathBuf};

use crate::DocumentFormat;

/// Raw outcome of resolution: the walked path plus the unconsumed tokens.
///
/// Created by the [`Dispatcher`](crate::Dispatcher) for a single invocation
/// and consumed by the leaf that was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Command path from the program name to the leaf, inclusive.
    pub path: Vec<String>,
    /// Tokens after the leaf name, owned by the leaf's argument parser.
    pub args: Vec<String>,
    /// Directory relative input and output paths are resolved against.
    pub working_dir: PathBuf,
}

impl Invocation {
    /// Space-separated command path, e.g. `oscal-cli ap validate`.
    pub fn display_path(&self) -> String {
        self.path.join(" ")
    }
}

/// Fallback option values, typically loaded from a configuration file.
///
/// Command-line flags always take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationDefaults {
    pub target_format: Option<DocumentFormat>,
    pub overwrite: bool,
    pub strict: bool,
}

/// Fully parsed options for one validate or convert operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub path: Vec<String>,
    pub working_dir: PathBuf,
    /// Input document, already resolved against `working_dir`.
    pub input: PathBuf,
    /// Report destination for validate, document destination for convert.
    pub output: Option<PathBuf>,
    /// Forced source format; detected from the input when `None`.
    pub source_format: Option<DocumentFormat>,
    pub target_format: Option<DocumentFormat>,
    pub overwrite: bool,
    pub strict: bool,
}

impl InvocationContext {
    /// Builds a context with only an input document set.
    pub fn new(invocation: &Invocation, input: impl AsRef<Path>) -> Self {
        Self {
            path: invocation.path.clone(),
            working_dir: invocation.working_dir.clone(),
            input: resolve_against(&invocation.working_dir, input.as_ref()),
            output: None,
            source_format: None,
            target_format: None,
            overwrite: false,
            strict: false,
        }
    }

    /// Resolves `path` against the invocation's working directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        resolve_against(&self.working_dir, path.as_ref())
    }
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
