//! Loading, typing and re-serializing OSCAL documents.
//!
//! Documents are held as a generic [`serde_json::Value`] tree so that
//! conversion preserves every property, including ones no rule knows about.

use std::fs;
use std::path::Path;

use oscal_cli_core::{DocumentFormat, DocumentType};
use serde_json::Value;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::format;

/// A parsed document with a recognized root property.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    document_type: DocumentType,
    source_format: DocumentFormat,
    value: Value,
}

impl Document {
    /// Reads and parses the file at `path`.
    ///
    /// `forced` overrides detection from the extension and content.
    pub fn load(path: &Path, forced: Option<DocumentFormat>) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| EngineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8(bytes).map_err(|e| EngineError::Parse {
            path: path.to_path_buf(),
            format: forced
                .or_else(|| format::from_path(path))
                .unwrap_or(DocumentFormat::Json),
            message: e.to_string(),
        })?;
        let format = forced.unwrap_or_else(|| format::detect(path, &content));
        debug!(path = %path.display(), %format, bytes = content.len(), "Loaded document");
        Self::parse(&content, format, path)
    }

    /// Parses `content` as `format`; `origin` is only used in error messages.
    pub fn parse(content: &str, format: DocumentFormat, origin: &Path) -> Result<Self> {
        let parse_error = |message: String| EngineError::Parse {
            path: origin.to_path_buf(),
            format,
            message,
        };
        let value: Value = match format {
            DocumentFormat::Json => {
                serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?
            }
            DocumentFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?
            }
            DocumentFormat::Xml => return Err(EngineError::UnsupportedFormat(format)),
        };

        let document_type = root_type(&value)?;
        debug!(%document_type, %format, "Parsed document root");
        Ok(Self {
            document_type,
            source_format: format,
            value,
        })
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn source_format(&self) -> DocumentFormat {
        self.source_format
    }

    /// Fails unless the root property names `expected`.
    pub fn expect_type(&self, expected: DocumentType) -> Result<()> {
        if self.document_type == expected {
            Ok(())
        } else {
            Err(EngineError::TypeMismatch {
                expected,
                found: self.document_type,
            })
        }
    }

    /// The value under the root property.
    pub fn body(&self) -> &Value {
        &self.value[self.document_type.root_key()]
    }

    /// Serializes the whole document, root property included.
    ///
    /// JSON is pretty printed. The result never ends with a newline.
    pub fn render(&self, target: DocumentFormat) -> Result<String> {
        let serialize_error = |message: String| EngineError::Serialize {
            format: target,
            message,
        };
        let rendered = match target {
            DocumentFormat::Json => serde_json::to_string_pretty(&self.value)
                .map_err(|e| serialize_error(e.to_string()))?,
            DocumentFormat::Yaml => {
                serde_yaml::to_string(&self.value).map_err(|e| serialize_error(e.to_string()))?
            }
            DocumentFormat::Xml => return Err(EngineError::UnsupportedFormat(target)),
        };
        Ok(rendered.trim_end().to_string())
    }
}

fn root_type(value: &Value) -> Result<DocumentType> {
    let Some(root) = value.as_object().filter(|map| map.len() == 1) else {
        return Err(EngineError::InvalidRoot);
    };
    let (key, _) = root.iter().next().ok_or(EngineError::InvalidRoot)?;
    DocumentType::from_root_key(key).ok_or_else(|| EngineError::UnknownRoot(key.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CATALOG_JSON: &str = r#"{
  "catalog": {
    "uuid": "74c8ba1e-5cd4-4ad1-bbfd-d888e2f6c724",
    "metadata": { "title": "Sample", "version": "1.0" },
    "groups": [{ "id": "ac", "title": "Access Control" }]
  }
}"#;

    fn parse(content: &str, format: DocumentFormat) -> Result<Document> {
        Document::parse(content, format, Path::new("test"))
    }

    #[test]
    fn test_parse_json_and_yaml_to_same_tree() {
        let from_json = parse(CATALOG_JSON, DocumentFormat::Json).unwrap();
        let yaml = from_json.render(DocumentFormat::Yaml).unwrap();
        let from_yaml = parse(&yaml, DocumentFormat::Yaml).unwrap();

        assert_eq!(from_yaml.document_type(), DocumentType::Catalog);
        assert_eq!(from_yaml.source_format(), DocumentFormat::Yaml);
        assert_eq!(from_yaml.body(), from_json.body());
    }

    #[test]
    fn test_render_json_preserves_key_order() {
        let doc = parse(CATALOG_JSON, DocumentFormat::Json).unwrap();
        let rendered = doc.render(DocumentFormat::Json).unwrap();
        let uuid = rendered.find("\"uuid\"").unwrap();
        let metadata = rendered.find("\"metadata\"").unwrap();
        let groups = rendered.find("\"groups\"").unwrap();
        assert!(uuid < metadata && metadata < groups);
        assert!(rendered.starts_with("{\n  \"catalog\""));
        assert!(!rendered.ends_with('\n'));
    }

    #[test]
    fn test_root_must_be_single_known_property() {
        assert!(matches!(
            parse("[]", DocumentFormat::Json),
            Err(EngineError::InvalidRoot)
        ));
        assert!(matches!(
            parse("{}", DocumentFormat::Json),
            Err(EngineError::InvalidRoot)
        ));
        assert!(matches!(
            parse("catalog: {}\nprofile: {}\n", DocumentFormat::Yaml),
            Err(EngineError::InvalidRoot)
        ));
        match parse("{\"mapping-collection\": {}}", DocumentFormat::Json) {
            Err(EngineError::UnknownRoot(key)) => assert_eq!(key, "mapping-collection"),
            other => panic!("expected unknown root, got {other:?}"),
        }
    }

    #[test]
    fn test_expect_type_reports_mismatch() {
        let doc = parse(CATALOG_JSON, DocumentFormat::Json).unwrap();
        assert!(doc.expect_type(DocumentType::Catalog).is_ok());
        assert!(matches!(
            doc.expect_type(DocumentType::AssessmentPlan),
            Err(EngineError::TypeMismatch {
                expected: DocumentType::AssessmentPlan,
                found: DocumentType::Catalog,
            })
        ));
    }

    #[test]
    fn test_malformed_input_is_parse_error() {
        let err = parse("{\"catalog\": ", DocumentFormat::Json).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Parse {
                format: DocumentFormat::Json,
                ..
            }
        ));
        let err = parse("catalog: [unclosed", DocumentFormat::Yaml).unwrap_err();
        assert!(matches!(err, EngineError::Parse { .. }));
    }

    #[test]
    fn test_xml_is_unsupported_both_ways() {
        assert!(matches!(
            parse("<catalog/>", DocumentFormat::Xml),
            Err(EngineError::UnsupportedFormat(DocumentFormat::Xml))
        ));
        let doc = parse(CATALOG_JSON, DocumentFormat::Json).unwrap();
        assert!(matches!(
            doc.render(DocumentFormat::Xml),
            Err(EngineError::UnsupportedFormat(DocumentFormat::Xml))
        ));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::load(&dir.path().join("absent.json"), None).unwrap_err();
        assert!(matches!(err, EngineError::Read { .. }));
    }

    #[test]
    fn test_load_non_utf8_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.json");
        fs::write(&path, b"{\"catalog\": {\"title\": \"caf\xe9\"}}").unwrap();

        let err = Document::load(&path, None).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Parse {
                format: DocumentFormat::Json,
                ..
            }
        ));

        let err = Document::load(&path, Some(DocumentFormat::Yaml)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Parse {
                format: DocumentFormat::Yaml,
                ..
            }
        ));
    }

    #[test]
    fn test_load_detects_format_from_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile");
        fs::write(&path, "profile:\n  imports:\n    - href: catalog.json\n").unwrap();

        let doc = Document::load(&path, None).unwrap();
        assert_eq!(doc.source_format(), DocumentFormat::Yaml);
        assert_eq!(doc.body(), &json!({"imports": [{"href": "catalog.json"}]}));
    }
}
