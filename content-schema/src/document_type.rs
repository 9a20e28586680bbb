//! Document type declarations.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::field::{FieldDecl, FieldDefs, FieldKind, FieldSpec, deserialize_field_list};
use crate::pattern::PathPattern;

/// An unchecked document type declaration.
///
/// Deserializes from the content tooling's form:
///
/// ```json
/// {
///   "name": "CourseLesson",
///   "filePathPattern": "developers/courses/**/content/*.md",
///   "fields": { "title": { "type": "string", "required": true } }
/// }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[non_exhaustive]
pub struct DocumentTypeDecl {
    pub name: String,
    pub file_path_pattern: String,
    #[serde(default, deserialize_with = "deserialize_field_list")]
    pub fields: Vec<FieldDecl>,
}

impl DocumentTypeDecl {
    #[must_use]
    pub fn new(name: impl Into<String>, file_path_pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_path_pattern: file_path_pattern.into(),
            fields: Vec::new(),
        }
    }

    /// Append every field of a field set.
    #[must_use]
    pub fn with_fields(mut self, defs: &FieldDefs) -> Self {
        self.fields.extend(defs.iter().cloned().map(FieldDecl::from));
        self
    }

    /// Append a single field. Repeating a name is caught by
    /// [`define_document_type`].
    #[must_use]
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field.into());
        self
    }
}

/// A validated, immutable document type.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeSpec {
    name: String,
    file_path_pattern: PathPattern,
    fields: FieldDefs,
}

impl DocumentTypeSpec {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn file_path_pattern(&self) -> &PathPattern {
        &self.file_path_pattern
    }

    #[must_use]
    pub fn fields(&self) -> &FieldDefs {
        &self.fields
    }

    /// A type without fields only exempts matching paths from the unknown
    /// document check.
    #[must_use]
    pub fn is_marker(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.file_path_pattern.matches(path)
    }
}

/// Check a declaration and build its immutable descriptor.
///
/// # Errors
///
/// Returns a [`SchemaError`] if the name or pattern is empty, the pattern
/// does not compile, a field name is empty or repeated, or a field kind is
/// not recognized.
pub fn define_document_type(decl: DocumentTypeDecl) -> Result<DocumentTypeSpec, SchemaError> {
    let DocumentTypeDecl {
        name,
        file_path_pattern,
        fields: field_decls,
    } = decl;

    if name.trim().is_empty() {
        return Err(SchemaError::EmptyTypeName);
    }
    if file_path_pattern.trim().is_empty() {
        return Err(SchemaError::EmptyPattern { type_name: name });
    }
    let pattern = PathPattern::new(&file_path_pattern)?;

    let mut seen = HashSet::with_capacity(field_decls.len());
    let mut fields = FieldDefs::new();
    for field in field_decls {
        if field.name.trim().is_empty() {
            return Err(SchemaError::EmptyFieldName { type_name: name });
        }
        if !seen.insert(field.name.clone()) {
            return Err(SchemaError::DuplicateField {
                type_name: name,
                field: field.name,
            });
        }
        let Some(kind) = FieldKind::resolve(&field.kind) else {
            return Err(SchemaError::UnknownFieldKind {
                type_name: name,
                field: field.name,
                kind: field.kind.to_string(),
            });
        };
        fields.insert(FieldSpec {
            name: field.name,
            kind,
            description: field.description,
            required: field.required,
        });
    }

    Ok(DocumentTypeSpec {
        name,
        file_path_pattern: pattern,
        fields,
    })
}
