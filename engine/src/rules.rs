//! Model rules for each OSCAL document type.
//!
//! Rules run over the value under the root property and produce findings
//! located by JSON pointer. They never stop at the first problem.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::DateTime;
use oscal_cli_core::{DocumentType, Finding};
use regex::Regex;
use serde_json::{Map, Value};

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[45][0-9A-Fa-f]{3}-[89ABab][0-9A-Fa-f]{3}-[0-9A-Fa-f]{12}$",
    )
    .expect("static regex must compile")
});

static OSCAL_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:-[0-9A-Za-z.-]+)?$").expect("static regex must compile")
});

const COMMON_PROPERTIES: &[&str] = &["uuid", "metadata", "back-matter"];

/// Top-level properties each model allows besides [`COMMON_PROPERTIES`].
fn model_properties(document_type: DocumentType) -> &'static [&'static str] {
    match document_type {
        DocumentType::Catalog => &["params", "controls", "groups"],
        DocumentType::Profile => &["imports", "merge", "modify"],
        DocumentType::ComponentDefinition => {
            &["import-component-definitions", "components", "capabilities"]
        }
        DocumentType::SystemSecurityPlan => &[
            "import-profile",
            "system-characteristics",
            "system-implementation",
            "control-implementation",
        ],
        DocumentType::AssessmentPlan => &[
            "import-ssp",
            "local-definitions",
            "terms-and-conditions",
            "reviewed-controls",
            "assessment-subjects",
            "assessment-assets",
            "tasks",
        ],
        DocumentType::AssessmentResults => &["import-ap", "local-definitions", "results"],
        DocumentType::PlanOfActionAndMilestones => &[
            "import-ssp",
            "system-id",
            "local-definitions",
            "observations",
            "risks",
            "findings",
            "poam-items",
        ],
    }
}

/// Checks `body`, the value under the root property, against the rules of
/// `document_type`.
///
/// # Examples
///
/// ```
/// use oscal_cli_core::{DocumentType, Severity};
/// use oscal_cli_engine::rules::check;
/// use serde_json::json;
///
/// let findings = check(DocumentType::Profile, &json!({ "imports": [] }));
/// assert!(findings.iter().any(|f| f.location == "/profile/uuid"));
/// assert!(findings.iter().all(|f| f.severity == Severity::Error));
/// ```
pub fn check(document_type: DocumentType, body: &Value) -> Vec<Finding> {
    let base = format!("/{}", document_type.root_key());
    let mut findings = Vec::new();

    let Some(root) = body.as_object() else {
        findings.push(Finding::error(base, "document body must be an object"));
        return findings;
    };

    let mut ctx = Checker {
        findings: &mut findings,
    };
    ctx.common(root, &base, document_type);
    match document_type {
        DocumentType::Catalog => ctx.catalog(root, &base),
        DocumentType::Profile => ctx.profile(root, &base),
        DocumentType::ComponentDefinition => ctx.component_definition(root, &base),
        DocumentType::SystemSecurityPlan => ctx.system_security_plan(root, &base),
        DocumentType::AssessmentPlan => ctx.assessment_plan(root, &base),
        DocumentType::AssessmentResults => ctx.assessment_results(root, &base),
        DocumentType::PlanOfActionAndMilestones => ctx.poam(root, &base),
    }
    findings
}

/// Appends a JSON pointer segment, escaping `~` and `/`.
fn pointer(base: &str, segment: impl ToString) -> String {
    let segment = segment.to_string().replace('~', "~0").replace('/', "~1");
    format!("{base}/{segment}")
}

struct Checker<'f> {
    findings: &'f mut Vec<Finding>,
}

impl Checker<'_> {
    fn error(&mut self, location: String, message: impl Into<String>) {
        self.findings.push(Finding::error(location, message));
    }

    fn warning(&mut self, location: String, message: impl Into<String>) {
        self.findings.push(Finding::warning(location, message));
    }

    fn common(&mut self, root: &Map<String, Value>, base: &str, document_type: DocumentType) {
        self.uuid(root, base, "uuid");

        if let Some(metadata) = self.object(root, base, "metadata") {
            let at = pointer(base, "metadata");
            self.string(metadata, &at, "title");
            self.string(metadata, &at, "version");
            if let Some(version) = self.string(metadata, &at, "oscal-version") {
                self.oscal_version(version, pointer(&at, "oscal-version"));
            }
            self.date_time(metadata, &at, "last-modified");
        }

        let allowed = model_properties(document_type);
        for key in root.keys() {
            if !COMMON_PROPERTIES.contains(&key.as_str()) && !allowed.contains(&key.as_str()) {
                self.warning(
                    pointer(base, key),
                    format!(
                        "unrecognized property for an OSCAL {}",
                        document_type.display_name()
                    ),
                );
            }
        }
    }

    fn catalog(&mut self, root: &Map<String, Value>, base: &str) {
        let mut ids = HashSet::new();
        self.controls_and_groups(root, base, &mut ids);
    }

    fn controls_and_groups(
        &mut self,
        parent: &Map<String, Value>,
        at: &str,
        ids: &mut HashSet<String>,
    ) {
        for (location, group) in self.optional_items(parent, at, "groups") {
            self.string(group, &location, "title");
            self.controls_and_groups(group, &location, ids);
        }
        for (location, control) in self.optional_items(parent, at, "controls") {
            if let Some(id) = self.string(control, &location, "id") {
                if !ids.insert(id.to_string()) {
                    self.error(pointer(&location, "id"), format!("duplicate control id '{id}'"));
                }
            }
            self.string(control, &location, "title");
            self.controls_and_groups(control, &location, ids);
        }
    }

    fn profile(&mut self, root: &Map<String, Value>, base: &str) {
        for (location, import) in self.items(root, base, "imports") {
            self.string(import, &location, "href");
        }
    }

    fn component_definition(&mut self, root: &Map<String, Value>, base: &str) {
        for (location, component) in self.optional_items(root, base, "components") {
            self.uuid(component, &location, "uuid");
            self.string(component, &location, "type");
            self.string(component, &location, "title");
            self.string(component, &location, "description");
        }
    }

    fn system_security_plan(&mut self, root: &Map<String, Value>, base: &str) {
        self.import_href(root, base, "import-profile");
        if let Some(characteristics) = self.object(root, base, "system-characteristics") {
            self.string(
                characteristics,
                &pointer(base, "system-characteristics"),
                "system-name",
            );
        }
        self.object(root, base, "system-implementation");
        if let Some(implementation) = self.object(root, base, "control-implementation") {
            let at = pointer(base, "control-implementation");
            self.string(implementation, &at, "description");
            self.items(implementation, &at, "implemented-requirements");
        }
    }

    fn assessment_plan(&mut self, root: &Map<String, Value>, base: &str) {
        self.import_href(root, base, "import-ssp");
        if let Some(reviewed) = self.object(root, base, "reviewed-controls") {
            self.items(
                reviewed,
                &pointer(base, "reviewed-controls"),
                "control-selections",
            );
        }
    }

    fn assessment_results(&mut self, root: &Map<String, Value>, base: &str) {
        self.import_href(root, base, "import-ap");
        for (location, result) in self.items(root, base, "results") {
            self.uuid(result, &location, "uuid");
            self.string(result, &location, "title");
            self.string(result, &location, "description");
            self.date_time(result, &location, "start");
        }
    }

    fn poam(&mut self, root: &Map<String, Value>, base: &str) {
        if !root.contains_key("import-ssp") && !root.contains_key("system-id") {
            self.warning(
                base.to_string(),
                "neither 'import-ssp' nor 'system-id' is present",
            );
        }
        if root.contains_key("import-ssp") {
            self.import_href(root, base, "import-ssp");
        }
        for (location, item) in self.optional_items(root, base, "poam-items") {
            self.uuid(item, &location, "uuid");
            self.string(item, &location, "title");
            self.string(item, &location, "description");
        }
        if !root.contains_key("poam-items") {
            self.error(
                pointer(base, "poam-items"),
                "missing required property 'poam-items'",
            );
        }
    }

    fn import_href(&mut self, root: &Map<String, Value>, base: &str, key: &str) {
        if let Some(import) = self.object(root, base, key) {
            self.string(import, &pointer(base, key), "href");
        }
    }

    /// Required non-empty string property.
    fn string<'v>(
        &mut self,
        object: &'v Map<String, Value>,
        at: &str,
        key: &str,
    ) -> Option<&'v str> {
        match object.get(key) {
            None => {
                self.error(pointer(at, key), format!("missing required property '{key}'"));
                None
            }
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            Some(_) => {
                self.error(pointer(at, key), "must be a non-empty string");
                None
            }
        }
    }

    /// Required object property.
    fn object<'v>(
        &mut self,
        object: &'v Map<String, Value>,
        at: &str,
        key: &str,
    ) -> Option<&'v Map<String, Value>> {
        match object.get(key) {
            None => {
                self.error(pointer(at, key), format!("missing required property '{key}'"));
                None
            }
            Some(Value::Object(map)) => Some(map),
            Some(_) => {
                self.error(pointer(at, key), "must be an object");
                None
            }
        }
    }

    /// Required non-empty array of objects, returned with their locations.
    fn items<'v>(
        &mut self,
        object: &'v Map<String, Value>,
        at: &str,
        key: &str,
    ) -> Vec<(String, &'v Map<String, Value>)> {
        if !object.contains_key(key) {
            self.error(pointer(at, key), format!("missing required property '{key}'"));
            return Vec::new();
        }
        let items = self.optional_items(object, at, key);
        if matches!(object.get(key), Some(Value::Array(a)) if a.is_empty()) {
            self.error(pointer(at, key), "must contain at least one entry");
        }
        items
    }

    /// Optional array of objects; non-object entries are reported.
    fn optional_items<'v>(
        &mut self,
        object: &'v Map<String, Value>,
        at: &str,
        key: &str,
    ) -> Vec<(String, &'v Map<String, Value>)> {
        let location = pointer(at, key);
        let mut out = Vec::new();
        match object.get(key) {
            None => {}
            Some(Value::Array(entries)) => {
                for (index, entry) in entries.iter().enumerate() {
                    let entry_at = pointer(&location, index);
                    match entry.as_object() {
                        Some(map) => out.push((entry_at, map)),
                        None => self.error(entry_at, "must be an object"),
                    }
                }
            }
            Some(_) => self.error(location, "must be an array"),
        }
        out
    }

    fn uuid(&mut self, object: &Map<String, Value>, at: &str, key: &str) {
        if let Some(value) = self.string(object, at, key) {
            if !UUID_RE.is_match(value) {
                self.error(
                    pointer(at, key),
                    format!("'{value}' is not a version 4 or 5 UUID"),
                );
            }
        }
    }

    fn date_time(&mut self, object: &Map<String, Value>, at: &str, key: &str) {
        if let Some(value) = self.string(object, at, key) {
            if DateTime::parse_from_rfc3339(value).is_err() {
                self.error(
                    pointer(at, key),
                    format!("'{value}' is not a date-time with a timezone"),
                );
            }
        }
    }

    fn oscal_version(&mut self, version: &str, location: String) {
        match OSCAL_VERSION_RE.captures(version) {
            None => self.error(
                location,
                format!("'{version}' is not a major.minor.patch version"),
            ),
            Some(caps) if &caps[1] != "1" => self.warning(
                location,
                format!("OSCAL version '{version}' is not a 1.x release"),
            ),
            Some(_) => {}
        }
    }
}
