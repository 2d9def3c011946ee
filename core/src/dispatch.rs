//! Root dispatcher: resolves a token sequence to one leaf and runs it.
//!
//! Resolution walks the tree one token at a time (`AwaitingToken` →
//! `Resolving` → `Executing` → `Done`). A failed lookup goes straight to
//! `Done` with the usage status; it is reported once and never retried.

use std::env;
use std::path::PathBuf;

use tracing::{debug, trace};

use crate::{
    CommandNode, DocumentEngine, ExitStatus, Invocation, LeafCommand, OperationDefaults,
    ParentCommand, ResolveError,
};

/// Tokens that request a parent's command listing.
const HELP_TOKENS: &[&str] = &["-h", "--help", "help"];

/// Where resolution stopped.
#[derive(Debug)]
pub enum Resolution<'a> {
    /// A leaf was reached; `invocation` carries its unconsumed tokens.
    Leaf {
        leaf: &'a LeafCommand,
        invocation: Invocation,
    },
    /// A help token was found where a child name was expected.
    Help {
        parent: &'a ParentCommand,
        path: Vec<String>,
    },
}

/// Owns nothing but borrows the immutable tree, the engine, and the
/// configured defaults for the lifetime of the process.
pub struct Dispatcher<'a> {
    root: &'a ParentCommand,
    engine: &'a dyn DocumentEngine,
    defaults: OperationDefaults,
    working_dir: PathBuf,
}

impl<'a> Dispatcher<'a> {
    pub fn new(root: &'a ParentCommand, engine: &'a dyn DocumentEngine) -> Self {
        Self {
            root,
            engine,
            defaults: OperationDefaults::default(),
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn with_defaults(mut self, defaults: OperationDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = working_dir.into();
        self
    }

    /// Walks `tokens` from the root down to a leaf or a help request.
    ///
    /// # Errors
    ///
    /// [`ResolveError::UnknownCommand`] when a token names no child at its
    /// depth, [`ResolveError::MissingCommand`] when tokens run out on a
    /// parent. Either error carries the full prefix walked so far and the
    /// child names at the failing depth.
    pub fn resolve(&self, tokens: &[String]) -> Result<Resolution<'a>, ResolveError> {
        let mut path = vec![self.root.name().to_string()];
        let mut parent = self.root;
        let mut remaining = tokens;

        trace!(state = "Resolving", tokens = ?tokens);
        loop {
            if remaining
                .first()
                .is_some_and(|t| HELP_TOKENS.contains(&t.as_str()))
            {
                return Ok(Resolution::Help { parent, path });
            }

            let (node, rest) = parent.resolve(remaining).map_err(|e| e.at_path(&path))?;
            path.push(node.name().to_string());
            remaining = rest;

            match node {
                CommandNode::Parent(next) => parent = next,
                CommandNode::Leaf(leaf) => {
                    debug!(path = %path.join(" "), "Resolved leaf");
                    return Ok(Resolution::Leaf {
                        leaf,
                        invocation: Invocation {
                            path,
                            args: remaining.to_vec(),
                            working_dir: self.working_dir.clone(),
                        },
                    });
                }
            }
        }
    }

    /// Resolves and executes one invocation, returning its exit status.
    pub fn dispatch(&self, tokens: &[String]) -> ExitStatus {
        trace!(state = "AwaitingToken");
        let status = match self.resolve(tokens) {
            Ok(Resolution::Leaf { leaf, invocation }) => {
                trace!(state = "Executing", path = %invocation.display_path());
                leaf.run(&invocation, self.engine, &self.defaults)
            }
            Ok(Resolution::Help { parent, path }) => {
                print!("{}", parent.usage(&path));
                ExitStatus::SUCCESS
            }
            Err(err) => {
                if let ResolveError::MissingCommand { path, .. } = &err {
                    if let Some(parent) = self.parent_at(&path[1..]) {
                        eprint!("{}", parent.usage(path));
                    }
                }
                eprintln!("error: {err}");
                ExitStatus::from(err.category())
            }
        };
        trace!(state = "Done", code = status.code());
        status
    }

    fn parent_at(&self, names: &[String]) -> Option<&'a ParentCommand> {
        let mut parent = self.root;
        for name in names {
            match parent.child(name)? {
                CommandNode::Parent(next) => parent = next,
                CommandNode::Leaf(_) => return None,
            }
        }
        Some(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::build_command_tree;
    use crate::testing::StubEngine;
    use crate::{DocumentType, OperationKind};

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_every_full_path_reaches_its_own_leaf() {
        let engine = StubEngine::default();
        let tree = build_command_tree("oscal-cli", &engine).unwrap();
        let dispatcher = Dispatcher::new(&tree, &engine);

        for ty in DocumentType::ALL {
            for kind in [OperationKind::Validate, OperationKind::Convert] {
                let input = tokens(&[ty.command_name(), kind.command_name(), "doc.json"]);
                match dispatcher.resolve(&input).unwrap() {
                    Resolution::Leaf { leaf, invocation } => {
                        assert_eq!(leaf.binding().document_type(), ty);
                        assert_eq!(leaf.binding().kind(), kind);
                        assert_eq!(invocation.args, ["doc.json"]);
                        assert_eq!(
                            invocation.path,
                            ["oscal-cli", ty.command_name(), kind.command_name()]
                        );
                    }
                    other => panic!("expected leaf, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_unknown_root_token_reports_root_children() {
        let engine = StubEngine::default();
        let tree = build_command_tree("oscal-cli", &engine).unwrap();
        let dispatcher = Dispatcher::new(&tree, &engine);

        let err = dispatcher.resolve(&tokens(&["bogus-command"])).unwrap_err();
        assert_eq!(err.depth(), 0);
        assert_eq!(err.candidates(), tree.child_names().as_slice());
        assert_eq!(dispatcher.dispatch(&tokens(&["bogus-command"])), ExitStatus::USAGE);
    }

    #[test]
    fn test_unknown_leaf_token_fails_at_depth_one() {
        let engine = StubEngine::default();
        let tree = build_command_tree("oscal-cli", &engine).unwrap();
        let dispatcher = Dispatcher::new(&tree, &engine);

        let err = dispatcher.resolve(&tokens(&["ap", "render", "x.json"])).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownCommand {
                path: tokens(&["oscal-cli", "ap"]),
                token: "render".to_string(),
                candidates: tokens(&["validate", "convert"]),
            }
        );
        assert_eq!(err.depth(), 1);
    }

    #[test]
    fn test_empty_and_partial_paths_are_usage_errors() {
        let engine = StubEngine::default();
        let tree = build_command_tree("oscal-cli", &engine).unwrap();
        let dispatcher = Dispatcher::new(&tree, &engine);

        assert!(matches!(
            dispatcher.resolve(&[]),
            Err(ResolveError::MissingCommand { .. })
        ));
        let err = dispatcher.resolve(&tokens(&["catalog"])).unwrap_err();
        assert_eq!(err.path(), ["oscal-cli", "catalog"]);
        assert_eq!(dispatcher.dispatch(&tokens(&["catalog"])), ExitStatus::USAGE);
        assert_eq!(dispatcher.dispatch(&[]), ExitStatus::USAGE);
    }

    #[test]
    fn test_help_token_at_parent() {
        let engine = StubEngine::default();
        let tree = build_command_tree("oscal-cli", &engine).unwrap();
        let dispatcher = Dispatcher::new(&tree, &engine);

        match dispatcher.resolve(&tokens(&["ssp", "--help"])).unwrap() {
            Resolution::Help { parent, path } => {
                assert_eq!(parent.name(), "ssp");
                assert_eq!(path, ["oscal-cli", "ssp"]);
            }
            other => panic!("expected help, got {other:?}"),
        }
        assert_eq!(dispatcher.dispatch(&tokens(&["help"])), ExitStatus::SUCCESS);
    }

    #[test]
    fn test_leaf_status_is_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        let engine = StubEngine::default();
        let tree = build_command_tree("oscal-cli", &engine).unwrap();
        let dispatcher = Dispatcher::new(&tree, &engine).with_working_dir(dir.path());

        assert_eq!(
            dispatcher.dispatch(&tokens(&["ap", "validate", "plan.json"])),
            ExitStatus::SUCCESS
        );
        // Missing FILE argument is reported by the leaf's parser.
        assert_eq!(
            dispatcher.dispatch(&tokens(&["ap", "validate"])),
            ExitStatus::USAGE
        );
    }
}
