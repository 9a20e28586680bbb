//! # content-schema
//!
//! Document type registry for a documentation content pipeline.
//!
//! The crate declares which kinds of documents exist, which fields each must
//! or may carry, and which directories are scanned. All declarations are
//! checked once by [`build_source`]; the resulting [`SourceConfig`] is
//! immutable and shared by reference with whatever loads the content.
//!
//! Discovery and front-matter extraction are not part of this crate. The
//! [`ContentLoader`] works on documents whose fields were already extracted.
//!
//! ## Quick Start
//!
//! ```rust
//! use content_schema::{ContentLoader, LoadOutcome, RawDocument, developer_content_source};
//! use serde_json::json;
//!
//! let source = developer_content_source().unwrap();
//! let loader = ContentLoader::new(&source);
//!
//! let fields = json!({ "title": "Getting started" });
//! let doc = RawDocument::new(
//!     "developers/guides/intro/getting-started.md",
//!     fields.as_object().cloned().unwrap_or_default(),
//! );
//!
//! let mut warnings = Vec::new();
//! let outcome = loader.load_document(&doc, &mut warnings).unwrap();
//! assert!(matches!(outcome, LoadOutcome::Loaded(ref r) if r.type_name == "DeveloperGuide"));
//! ```

pub mod builtin;
mod document_type;
mod error;
mod field;
mod loader;
pub mod output;
mod pattern;
mod report;
mod source;

pub use builtin::{developer_content_decl, developer_content_source};
pub use document_type::{DocumentTypeDecl, DocumentTypeSpec, define_document_type};
pub use error::{DocumentError, DocumentErrorKind, SchemaError};
pub use field::{FieldDecl, FieldDefs, FieldKind, FieldSpec, KindDecl, compose_fields};
pub use loader::{ContentLoader, ContentRecord, ContentType, LoadOutcome, RawDocument, flattened_path};
pub use pattern::{PathPattern, normalize_path};
pub use report::LoadReport;
pub use source::{Policy, SourceConfig, SourceDecl, Strictness, build_source};
