//! Error types for schema construction and document validation.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors raised while building document types or the source configuration.
///
/// These always indicate a mistake in the declarations themselves and are
/// raised by the single construction call, never during per-file work.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    /// A document type was declared without a name.
    #[error("document type name must not be empty")]
    EmptyTypeName,

    /// A field was declared without a name.
    #[error("document type '{type_name}': field name must not be empty")]
    EmptyFieldName {
        /// The owning document type.
        type_name: String,
    },

    /// A document type was declared without a file path pattern.
    #[error("document type '{type_name}': file path pattern must not be empty")]
    EmptyPattern {
        /// The owning document type.
        type_name: String,
    },

    /// A glob pattern could not be compiled.
    #[error("invalid pattern '{pattern}': {cause}")]
    InvalidPattern {
        /// The raw pattern text.
        pattern: String,
        /// Human-readable description of the problem.
        cause: String,
    },

    /// The same field name appears twice in one document type.
    #[error("document type '{type_name}': duplicate field '{field}'")]
    DuplicateField {
        /// The owning document type.
        type_name: String,
        /// The repeated field name.
        field: String,
    },

    /// The same document type name appears twice in one source.
    #[error("duplicate document type '{type_name}'")]
    DuplicateType {
        /// The repeated type name.
        type_name: String,
    },

    /// A field kind declaration is not one of the supported kinds.
    #[error("document type '{type_name}': field '{field}' has unrecognized kind '{kind}'")]
    UnknownFieldKind {
        /// The owning document type.
        type_name: String,
        /// The field carrying the bad kind.
        field: String,
        /// The kind as written in the declaration.
        kind: String,
    },

    /// The source has no include globs.
    #[error("content include globs must not be empty")]
    NoIncludeGlobs,

    /// The source declares no document types.
    #[error("source must declare at least one document type")]
    NoDocumentTypes,

    /// A declaration could not be read or parsed, or has unrecognised keys.
    #[error("invalid source declaration: {message}")]
    Declaration {
        /// Human-readable description of the problem.
        message: String,
    },
}

impl SchemaError {
    /// Create a declaration error from any displayable message.
    pub fn declaration(msg: impl Into<String>) -> Self {
        Self::Declaration {
            message: msg.into(),
        }
    }
}

/// Category of a per-document violation.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum DocumentErrorKind {
    /// The path matches none of the declared file path patterns.
    UnknownDocument,
    /// A required field is absent or a value cannot be coerced to its kind.
    MissingOrIncompatibleData,
    /// The document carries a field its type does not declare.
    ExtraFieldData,
}

impl fmt::Display for DocumentErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDocument => f.write_str("unknown document"),
            Self::MissingOrIncompatibleData => f.write_str("missing or incompatible data"),
            Self::ExtraFieldData => f.write_str("extra field data"),
        }
    }
}

/// A schema violation found in a single document.
///
/// Whether it aborts the load or is downgraded to a warning depends on the
/// strictness policy for its [`DocumentErrorKind`].
#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[error("{file}: [{kind}] {message}")]
#[non_exhaustive]
pub struct DocumentError {
    /// Normalized path of the document, relative to the content root.
    pub file: String,
    /// The violation category.
    pub kind: DocumentErrorKind,
    /// The offending field, if the violation concerns one.
    pub field: Option<String>,
    /// The matched document type, if any.
    pub type_name: Option<String>,
    /// Human-readable description of the violation.
    pub message: String,
}

impl DocumentError {
    /// A path that matched no declared document type.
    #[must_use]
    pub fn unknown_document(file: &str) -> Self {
        Self {
            file: file.to_owned(),
            kind: DocumentErrorKind::UnknownDocument,
            field: None,
            type_name: None,
            message: "path matches no declared document type".to_owned(),
        }
    }

    /// A required field that is absent.
    #[must_use]
    pub fn missing_field(file: &str, type_name: &str, field: &str) -> Self {
        Self {
            file: file.to_owned(),
            kind: DocumentErrorKind::MissingOrIncompatibleData,
            field: Some(field.to_owned()),
            type_name: Some(type_name.to_owned()),
            message: format!("required field '{field}' of {type_name} is missing"),
        }
    }

    /// A value that cannot be coerced to its declared kind.
    #[must_use]
    pub fn incompatible_field(file: &str, type_name: &str, field: &str, expected: &str) -> Self {
        Self {
            file: file.to_owned(),
            kind: DocumentErrorKind::MissingOrIncompatibleData,
            field: Some(field.to_owned()),
            type_name: Some(type_name.to_owned()),
            message: format!("field '{field}' of {type_name} is not a valid {expected}"),
        }
    }

    /// A field not declared by the document type.
    #[must_use]
    pub fn extra_field(file: &str, type_name: &str, field: &str) -> Self {
        Self {
            file: file.to_owned(),
            kind: DocumentErrorKind::ExtraFieldData,
            field: Some(field.to_owned()),
            type_name: Some(type_name.to_owned()),
            message: format!("field '{field}' is not declared by {type_name}"),
        }
    }
}
