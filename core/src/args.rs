//! Leaf-local argument parsing.
//!
//! Each leaf hands its unconsumed tokens to one of the clap definitions below
//! and receives an [`InvocationContext`]. Configuration defaults fill in
//! whatever the command line leaves out.

use std::path::PathBuf;

use clap::{Args, CommandFactory, FromArgMatches, Parser};

use crate::{DocumentFormat, Invocation, InvocationContext, OperationDefaults, OperationKind};

/// Arguments accepted by every `validate` leaf.
#[derive(Debug, Parser)]
struct ValidateArgs {
    /// Document to validate.
    #[arg(value_name = "FILE")]
    file: PathBuf,
    #[command(flatten)]
    source: SourceArgs,
    /// Also write the validation report as JSON to PATH.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Treat warnings as violations.
    #[arg(long)]
    strict: bool,
}

/// Arguments accepted by every `convert` leaf.
#[derive(Debug, Parser)]
struct ConvertArgs {
    /// Document to convert.
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// Destination file (default: standard output).
    #[arg(value_name = "DEST")]
    dest: Option<PathBuf>,
    #[command(flatten)]
    source: SourceArgs,
    /// Target format.
    #[arg(long, value_name = "FORMAT")]
    to: Option<DocumentFormat>,
    /// Replace DEST if it already exists.
    #[arg(long)]
    overwrite: bool,
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Source format, overriding detection from the file name and content.
    #[arg(long = "as", value_name = "FORMAT")]
    format: Option<DocumentFormat>,
}

/// Parses the leaf-local tokens of `invocation` for an operation of `kind`.
///
/// `about` becomes the leaf's help text. Help and version requests surface
/// as `clap::Error` values of kind `DisplayHelp`/`DisplayVersion`.
pub fn parse_context(
    kind: OperationKind,
    invocation: &Invocation,
    about: &str,
    defaults: &OperationDefaults,
) -> Result<InvocationContext, clap::Error> {
    let argv = std::iter::once(invocation.display_path()).chain(invocation.args.iter().cloned());

    match kind {
        OperationKind::Validate => {
            let matches = ValidateArgs::command()
                .bin_name(invocation.display_path())
                .about(about.to_string())
                .try_get_matches_from(argv)?;
            let args = ValidateArgs::from_arg_matches(&matches)?;

            let mut ctx = InvocationContext::new(invocation, &args.file);
            ctx.source_format = args.source.format;
            let output = args.output.map(|p| ctx.resolve(p));
            ctx.output = output;
            ctx.strict = args.strict || defaults.strict;
            Ok(ctx)
        }
        OperationKind::Convert => {
            let matches = ConvertArgs::command()
                .bin_name(invocation.display_path())
                .about(about.to_string())
                .try_get_matches_from(argv)?;
            let args = ConvertArgs::from_arg_matches(&matches)?;

            let mut ctx = InvocationContext::new(invocation, &args.file);
            ctx.source_format = args.source.format;
            let dest = args.dest.map(|p| ctx.resolve(p));
            ctx.output = dest;
            ctx.target_format = args.to.or(defaults.target_format);
            ctx.overwrite = args.overwrite || defaults.overwrite;
            Ok(ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(args: &[&str]) -> Invocation {
        Invocation {
            path: vec!["oscal-cli".into(), "catalog".into(), "convert".into()],
            args: args.iter().map(|s| s.to_string()).collect(),
            working_dir: PathBuf::from("/work"),
        }
    }

    #[test]
    fn test_verify_clap_definitions() {
        ValidateArgs::command().debug_assert();
        ConvertArgs::command().debug_assert();
    }

    #[test]
    fn test_convert_args() {
        let ctx = parse_context(
            OperationKind::Convert,
            &invocation(&["in.json", "out/c.yaml", "--to=yaml", "--overwrite"]),
            "Convert",
            &OperationDefaults::default(),
        )
        .unwrap();

        assert_eq!(ctx.input, PathBuf::from("/work/in.json"));
        assert_eq!(ctx.output, Some(PathBuf::from("/work/out/c.yaml")));
        assert_eq!(ctx.target_format, Some(DocumentFormat::Yaml));
        assert!(ctx.overwrite);
        assert_eq!(ctx.source_format, None);
    }

    #[test]
    fn test_flags_win_over_defaults() {
        let defaults = OperationDefaults {
            target_format: Some(DocumentFormat::Yaml),
            overwrite: false,
            strict: true,
        };
        let ctx = parse_context(
            OperationKind::Convert,
            &invocation(&["in.yml", "--to", "json", "--as", "yml"]),
            "Convert",
            &defaults,
        )
        .unwrap();
        assert_eq!(ctx.target_format, Some(DocumentFormat::Json));
        assert_eq!(ctx.source_format, Some(DocumentFormat::Yaml));

        let ctx = parse_context(
            OperationKind::Convert,
            &invocation(&["in.json"]),
            "Convert",
            &defaults,
        )
        .unwrap();
        assert_eq!(ctx.target_format, Some(DocumentFormat::Yaml));
    }

    #[test]
    fn test_validate_args_apply_strict_default() {
        let defaults = OperationDefaults {
            strict: true,
            ..OperationDefaults::default()
        };
        let ctx = parse_context(
            OperationKind::Validate,
            &invocation(&["plan.json", "-o", "/tmp/report.json"]),
            "Validate",
            &defaults,
        )
        .unwrap();
        assert!(ctx.strict);
        assert_eq!(ctx.output, Some(PathBuf::from("/tmp/report.json")));
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let err = parse_context(
            OperationKind::Validate,
            &invocation(&[]),
            "Validate",
            &OperationDefaults::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_help_is_reported_as_display_help() {
        let err = parse_context(
            OperationKind::Convert,
            &invocation(&["--help"]),
            "Convert the specified OSCAL Catalog to a different format",
            &OperationDefaults::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(err.to_string().contains("--overwrite"));
    }
}
