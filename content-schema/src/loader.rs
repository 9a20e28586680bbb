//! Reference loader: applies a [`SourceConfig`] to documents whose fields have
//! already been extracted.
//!
//! Discovery and front-matter parsing happen elsewhere; the loader receives a
//! path relative to the content root plus a JSON field map, decides the
//! document type, checks the fields against it and produces a
//! [`ContentRecord`]. Violations abort the load or become warnings according
//! to the source's [`Strictness`](crate::Strictness).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::document_type::DocumentTypeSpec;
use crate::error::DocumentError;
use crate::field::FieldKind;
use crate::pattern::normalize_path;
use crate::report::LoadReport;
use crate::source::{Policy, SourceConfig};

/// A document as handed over by the content-loading collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawDocument {
    /// Path relative to the content root.
    pub path: String,
    /// Extracted front matter or JSON body.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RawDocument {
    #[must_use]
    pub fn new(path: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            path: path.into(),
            fields,
        }
    }
}

/// How the source of a record was written.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Markdown,
    Mdx,
    Data,
}

impl ContentType {
    #[must_use]
    pub fn for_path(path: &str) -> Self {
        let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
        match file.rsplit_once('.').map(|(_, ext)| ext) {
            Some("md" | "markdown") => Self::Markdown,
            Some("mdx") => Self::Mdx,
            _ => Self::Data,
        }
    }
}

/// A typed content record for downstream consumers.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub source_file_path: String,
    pub flattened_path: String,
    pub content_type: ContentType,
    pub fields: Map<String, Value>,
}

/// Result of loading one document.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(ContentRecord),
    /// Matched a marker type; nothing to load.
    Ignored { type_name: String },
    /// Outside the include globs, or unknown under a lenient policy.
    Skipped,
}

/// Path without its extension and without a trailing `index` segment.
#[must_use]
pub fn flattened_path(path: &str) -> String {
    let normalized = normalize_path(path);
    let (dir, file) = match normalized.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, normalized.as_str()),
    };
    let stem = match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    };
    match (dir, stem) {
        (None, "index") => String::new(),
        (Some(dir), "index") => dir.to_owned(),
        (None, stem) => stem.to_owned(),
        (Some(dir), stem) => format!("{dir}/{stem}"),
    }
}

/// Coerce a value to a declared kind, or `None` if it cannot be.
fn coerce(kind: FieldKind, value: &Value) -> Option<Value> {
    match kind {
        FieldKind::String => scalar_to_string(value).map(Value::String),
        FieldKind::ListOfString => match value {
            Value::Array(items) => items
                .iter()
                .map(|item| scalar_to_string(item).map(Value::String))
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            scalar => scalar_to_string(scalar).map(|s| Value::Array(vec![Value::String(s)])),
        },
        FieldKind::ListOfJson => match value {
            Value::Array(_) => Some(value.clone()),
            _ => None,
        },
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Applies a [`SourceConfig`] to extracted documents.
#[derive(Debug, Clone, Copy)]
pub struct ContentLoader<'a> {
    source: &'a SourceConfig,
}

impl<'a> ContentLoader<'a> {
    #[must_use]
    pub fn new(source: &'a SourceConfig) -> Self {
        Self { source }
    }

    #[must_use]
    pub fn source(&self) -> &'a SourceConfig {
        self.source
    }

    /// Load a single document.
    ///
    /// Downgraded violations are appended to `warnings`.
    ///
    /// # Errors
    ///
    /// Returns the first [`DocumentError`] whose policy is [`Policy::Fail`].
    pub fn load_document(
        &self,
        doc: &RawDocument,
        warnings: &mut Vec<DocumentError>,
    ) -> Result<LoadOutcome, DocumentError> {
        let path = normalize_path(&doc.path);

        if !self.source.is_included(&path) {
            debug!(path = %path, "outside content include globs, skipping");
            return Ok(LoadOutcome::Skipped);
        }

        let strictness = self.source.strictness();
        let Some(doc_type) = self.source.classify(&path) else {
            apply_policy(
                strictness.on_unknown_documents,
                DocumentError::unknown_document(&path),
                warnings,
            )?;
            return Ok(LoadOutcome::Skipped);
        };

        if doc_type.is_marker() {
            return Ok(LoadOutcome::Ignored {
                type_name: doc_type.name().to_owned(),
            });
        }

        let fields = self.check_fields(&path, doc_type, &doc.fields, warnings)?;

        Ok(LoadOutcome::Loaded(ContentRecord {
            id: path.clone(),
            type_name: doc_type.name().to_owned(),
            flattened_path: flattened_path(&path),
            content_type: ContentType::for_path(&path),
            source_file_path: path,
            fields,
        }))
    }

    fn check_fields(
        &self,
        path: &str,
        doc_type: &DocumentTypeSpec,
        raw: &Map<String, Value>,
        warnings: &mut Vec<DocumentError>,
    ) -> Result<Map<String, Value>, DocumentError> {
        let strictness = self.source.strictness();
        let type_name = doc_type.name();
        let mut fields = Map::new();

        for spec in doc_type.fields() {
            match raw.get(&spec.name).filter(|v| !v.is_null()) {
                None if spec.required => apply_policy(
                    strictness.on_missing_or_incompatible_data,
                    DocumentError::missing_field(path, type_name, &spec.name),
                    warnings,
                )?,
                None => {}
                Some(value) => match coerce(spec.kind, value) {
                    Some(coerced) => {
                        fields.insert(spec.name.clone(), coerced);
                    }
                    None => apply_policy(
                        strictness.on_missing_or_incompatible_data,
                        DocumentError::incompatible_field(
                            path,
                            type_name,
                            &spec.name,
                            &spec.kind.to_string(),
                        ),
                        warnings,
                    )?,
                },
            }
        }

        for (name, value) in raw {
            if doc_type.fields().contains(name) {
                continue;
            }
            apply_policy(
                strictness.on_extra_field_data,
                DocumentError::extra_field(path, type_name, name),
                warnings,
            )?;
            fields.insert(name.clone(), value.clone());
        }

        Ok(fields)
    }

    /// Load every document, stopping at the first hard failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`DocumentError`] whose policy is [`Policy::Fail`];
    /// no partial report is produced in that case.
    pub fn load_all<'d, I>(&self, docs: I) -> Result<LoadReport, DocumentError>
    where
        I: IntoIterator<Item = &'d RawDocument>,
    {
        let mut report = LoadReport::default();

        for doc in docs {
            match self.load_document(doc, &mut report.warnings)? {
                LoadOutcome::Loaded(record) => report.records.push(record),
                LoadOutcome::Ignored { .. } => report.ignored += 1,
                LoadOutcome::Skipped => report.skipped.push(normalize_path(&doc.path)),
            }
        }

        report.ok = report.warnings.is_empty();
        info!(
            loaded = report.records.len(),
            ignored = report.ignored,
            skipped = report.skipped.len(),
            warnings = report.warnings.len(),
            "content load finished"
        );
        Ok(report)
    }
}

/// Abort on [`Policy::Fail`], otherwise record a warning.
fn apply_policy(
    policy: Policy,
    err: DocumentError,
    warnings: &mut Vec<DocumentError>,
) -> Result<(), DocumentError> {
    match policy {
        Policy::Fail => Err(err),
        Policy::SkipWarn => {
            warn!(file = %err.file, kind = %err.kind, "{}", err.message);
            warnings.push(err);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_string() {
        assert_eq!(coerce(FieldKind::String, &json!("a")), Some(json!("a")));
        assert_eq!(coerce(FieldKind::String, &json!(3)), Some(json!("3")));
        assert_eq!(coerce(FieldKind::String, &json!(true)), Some(json!("true")));
        assert_eq!(coerce(FieldKind::String, &json!(["a"])), None);
        assert_eq!(coerce(FieldKind::String, &json!({"a": 1})), None);
    }

    #[test]
    fn test_coerce_list_of_string() {
        assert_eq!(
            coerce(FieldKind::ListOfString, &json!(["a", 2])),
            Some(json!(["a", "2"]))
        );
        assert_eq!(
            coerce(FieldKind::ListOfString, &json!("solo")),
            Some(json!(["solo"]))
        );
        assert_eq!(coerce(FieldKind::ListOfString, &json!([{"a": 1}])), None);
        assert_eq!(coerce(FieldKind::ListOfString, &json!({"a": 1})), None);
    }

    #[test]
    fn test_coerce_list_of_json() {
        let value = json!([{"title": "Intro"}, 3, "x"]);
        assert_eq!(coerce(FieldKind::ListOfJson, &value), Some(value.clone()));
        assert_eq!(coerce(FieldKind::ListOfJson, &json!({"a": 1})), None);
    }

    #[test]
    fn test_flattened_path() {
        assert_eq!(flattened_path("developers/guides/x/y.md"), "developers/guides/x/y");
        assert_eq!(flattened_path("developers/guides/x/index.md"), "developers/guides/x");
        assert_eq!(flattened_path("index.md"), "");
        assert_eq!(flattened_path("./docs/a.b.md"), "docs/a.b");
        assert_eq!(flattened_path("docs/.hidden"), "docs/.hidden");
        assert_eq!(flattened_path("v1.2/notes"), "v1.2/notes");
    }

    #[test]
    fn test_content_type_for_path() {
        assert_eq!(ContentType::for_path("a/b.md"), ContentType::Markdown);
        assert_eq!(ContentType::for_path("a/b.mdx"), ContentType::Mdx);
        assert_eq!(ContentType::for_path("a/metadata.json"), ContentType::Data);
    }
}
