//! Source format detection.

use std::path::Path;

use oscal_cli_core::DocumentFormat;

/// Detects the format of `content` read from `path`.
///
/// The file extension wins; without a recognized one the content is sniffed.
pub fn detect(path: &Path, content: &str) -> DocumentFormat {
    from_path(path).unwrap_or_else(|| sniff(content))
}

/// The format named by the file extension, if any.
pub fn from_path(path: &Path) -> Option<DocumentFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(DocumentFormat::from_extension)
}

/// Guesses a format from the first significant character.
///
/// `<` means XML and `{` means JSON. Anything else is treated as YAML, which
/// is also a superset of most JSON that does not start with a brace.
pub fn sniff(content: &str) -> DocumentFormat {
    match content.trim_start_matches('\u{feff}').trim_start().chars().next() {
        Some('<') => DocumentFormat::Xml,
        Some('{') => DocumentFormat::Json,
        _ => DocumentFormat::Yaml,
    }
}
