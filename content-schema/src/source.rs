//! Source configuration: which directories are scanned, which document types
//! exist, and how strictly violations are treated.
//!
//! A [`SourceConfig`] is built once by [`build_source`] and only ever shared
//! by reference afterwards.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::document_type::{DocumentTypeDecl, DocumentTypeSpec, define_document_type};
use crate::error::SchemaError;
use crate::pattern::PathPattern;

/// Failure policy for one category of violation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// Abort the load.
    #[default]
    Fail,
    /// Log a warning and continue with best effort.
    #[serde(alias = "skip", alias = "skip-ignore", alias = "warn", alias = "ignore")]
    SkipWarn,
}

impl Policy {
    #[must_use]
    pub fn is_fail(self) -> bool {
        self == Self::Fail
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => f.write_str("fail"),
            Self::SkipWarn => f.write_str("skip-warn"),
        }
    }
}

/// The three independent strictness flags. All default to [`Policy::Fail`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Strictness {
    #[serde(default)]
    pub on_unknown_documents: Policy,
    #[serde(default)]
    pub on_missing_or_incompatible_data: Policy,
    #[serde(default)]
    pub on_extra_field_data: Policy,
}

impl Strictness {
    /// Every violation aborts the load.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Every violation is downgraded to a warning.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            on_unknown_documents: Policy::SkipWarn,
            on_missing_or_incompatible_data: Policy::SkipWarn,
            on_extra_field_data: Policy::SkipWarn,
        }
    }
}

fn default_content_root() -> PathBuf {
    PathBuf::from(".")
}

/// An unchecked source declaration.
///
/// Deserializes from the content tooling's configuration keys
/// (`contentDirPath`, `contentDirInclude`, `documentTypes`,
/// `onUnknownDocuments`, `onMissingOrIncompatibleData`, `onExtraFieldData`).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct SourceDecl {
    #[serde(rename = "contentDirPath", default = "default_content_root")]
    pub content_root: PathBuf,
    #[serde(rename = "contentDirInclude", default)]
    pub include_globs: Vec<String>,
    #[serde(rename = "documentTypes", default)]
    pub document_types: Vec<DocumentTypeDecl>,
    #[serde(flatten)]
    pub strictness: Strictness,
    /// Top-level keys nobody recognised; [`build_source`] rejects them.
    #[serde(flatten)]
    pub unknown_keys: BTreeMap<String, Value>,
}

impl Default for SourceDecl {
    fn default() -> Self {
        Self {
            content_root: default_content_root(),
            include_globs: Vec::new(),
            document_types: Vec::new(),
            strictness: Strictness::default(),
            unknown_keys: BTreeMap::new(),
        }
    }
}

impl SourceDecl {
    #[must_use]
    pub fn new(content_root: impl Into<PathBuf>) -> Self {
        Self {
            content_root: content_root.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn include(mut self, glob: impl Into<String>) -> Self {
        self.include_globs.push(glob.into());
        self
    }

    #[must_use]
    pub fn document_type(mut self, decl: DocumentTypeDecl) -> Self {
        self.document_types.push(decl);
        self
    }

    #[must_use]
    pub fn strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Parse a JSON declaration.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Declaration`] if the JSON is malformed or uses
    /// an unknown strictness value.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json).map_err(|e| SchemaError::declaration(e.to_string()))
    }

    /// Read and parse a JSON declaration file.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Declaration`] if the file cannot be read or
    /// parsed.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            SchemaError::declaration(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }
}

/// The immutable, process-wide source configuration consumed by the loader.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    content_root: PathBuf,
    include_globs: Vec<PathPattern>,
    document_types: Vec<DocumentTypeSpec>,
    strictness: Strictness,
}

impl SourceConfig {
    #[must_use]
    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    #[must_use]
    pub fn include_globs(&self) -> &[PathPattern] {
        &self.include_globs
    }

    /// Document types in declaration order.
    #[must_use]
    pub fn document_types(&self) -> &[DocumentTypeSpec] {
        &self.document_types
    }

    #[must_use]
    pub fn document_type(&self, name: &str) -> Option<&DocumentTypeSpec> {
        self.document_types.iter().find(|t| t.name() == name)
    }

    #[must_use]
    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Whether a path (relative to the content root) lies under any include
    /// glob. Include globs may name a directory or match the file itself.
    #[must_use]
    pub fn is_included(&self, path: &str) -> bool {
        self.include_globs
            .iter()
            .any(|glob| glob.matches_path_or_ancestor(path))
    }

    /// The first document type, in declaration order, whose pattern matches.
    #[must_use]
    pub fn classify(&self, path: &str) -> Option<&DocumentTypeSpec> {
        let matched = self.document_types.iter().find(|t| t.matches(path));
        debug!(
            path,
            document_type = matched.map(DocumentTypeSpec::name),
            "classified document"
        );
        matched
    }
}

/// Check a source declaration and build the immutable configuration.
///
/// # Errors
///
/// Returns a [`SchemaError`] if the declaration carries unrecognised keys,
/// there are no include globs, an include glob
/// does not compile, there are no document types, two types share a name, or
/// any document type is itself invalid.
pub fn build_source(decl: SourceDecl) -> Result<SourceConfig, SchemaError> {
    let SourceDecl {
        content_root,
        include_globs,
        document_types: type_decls,
        strictness,
        unknown_keys,
    } = decl;

    if !unknown_keys.is_empty() {
        let keys: Vec<&str> = unknown_keys.keys().map(String::as_str).collect();
        return Err(SchemaError::declaration(format!(
            "unknown keys in source declaration: {}",
            keys.join(", ")
        )));
    }

    if include_globs.is_empty() {
        return Err(SchemaError::NoIncludeGlobs);
    }
    let include_globs = include_globs
        .iter()
        .map(String::as_str)
        .map(PathPattern::new)
        .collect::<Result<Vec<_>, _>>()?;

    if type_decls.is_empty() {
        return Err(SchemaError::NoDocumentTypes);
    }
    let mut names = HashSet::with_capacity(type_decls.len());
    let mut document_types = Vec::with_capacity(type_decls.len());
    for type_decl in type_decls {
        let spec = define_document_type(type_decl)?;
        if !names.insert(spec.name().to_owned()) {
            return Err(SchemaError::DuplicateType {
                type_name: spec.name().to_owned(),
            });
        }
        document_types.push(spec);
    }

    debug!(
        content_root = %content_root.display(),
        include_globs = include_globs.len(),
        document_types = document_types.len(),
        "built content source"
    );

    Ok(SourceConfig {
        content_root,
        include_globs,
        document_types,
        strictness,
    })
}
