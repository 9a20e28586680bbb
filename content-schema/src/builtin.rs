//! Document types of the developer documentation site.
//!
//! `IgnoredDoc` is declared first so README files are exempted before any
//! other pattern can claim them.

use crate::document_type::DocumentTypeDecl;
use crate::error::SchemaError;
use crate::field::{FieldDefs, FieldSpec, compose_fields};
use crate::source::{SourceConfig, SourceDecl, Strictness, build_source};

pub const IGNORED_DOC: &str = "IgnoredDoc";
pub const DEVELOPER_GUIDE: &str = "DeveloperGuide";
pub const COURSE_METADATA: &str = "CourseMetadata";
pub const COURSE_LESSON: &str = "CourseLesson";

/// Directories scanned for content, relative to the content root.
pub const CONTENT_INCLUDE: &[&str] = &[
    "docs/**",
    "developers/guides/**",
    "developers/courses/**",
    "developers/resources/**",
];

/// Standard content record fields shared by every non-marker type.
#[must_use]
pub fn basic_content_fields() -> FieldDefs {
    FieldDefs::new()
        .with(
            FieldSpec::string("title")
                .describe("The primary title of the post")
                .required(),
        )
        .with(
            FieldSpec::string("description")
                .describe("Brief description of the content (also used in the SEO metadata)"),
        )
        .with(FieldSpec::list_of_string("keywords").describe("List of keywords for the content"))
        .with(FieldSpec::string("canonical").describe("Canonical url of the content"))
        .with(
            FieldSpec::string("image")
                .describe("The primary image of the content (also used in the SEO metadata)"),
        )
}

/// README files anywhere in the tree.
#[must_use]
pub fn ignored_doc() -> DocumentTypeDecl {
    DocumentTypeDecl::new(IGNORED_DOC, "**/+(README|readme).md")
}

#[must_use]
pub fn developer_guide() -> DocumentTypeDecl {
    DocumentTypeDecl::new(DEVELOPER_GUIDE, "developers/guides/**/*.md")
        .with_fields(&basic_content_fields())
}

/// The `metadata.json` file of a course.
#[must_use]
pub fn course_metadata() -> DocumentTypeDecl {
    let extra = FieldDefs::new().with(FieldSpec::list_of_json("structure"));
    DocumentTypeDecl::new(COURSE_METADATA, "developers/courses/**/metadata.json")
        .with_fields(&compose_fields(&[&basic_content_fields(), &extra]))
}

/// A single lesson under a course's `content/` directory.
#[must_use]
pub fn course_lesson() -> DocumentTypeDecl {
    let extra = FieldDefs::new().with(
        FieldSpec::list_of_string("objectives").describe("List of objectives for the Course Lesson"),
    );
    DocumentTypeDecl::new(COURSE_LESSON, "developers/courses/**/content/*.md")
        .with_fields(&compose_fields(&[&basic_content_fields(), &extra]))
}

/// The full developer content declaration, before validation.
#[must_use]
pub fn developer_content_decl() -> SourceDecl {
    let decl = CONTENT_INCLUDE
        .iter()
        .fold(SourceDecl::new("."), |decl, glob| decl.include(*glob));
    decl.document_type(ignored_doc())
        .document_type(developer_guide())
        .document_type(course_metadata())
        .document_type(course_lesson())
        .strictness(Strictness::strict())
}

/// Build the developer content source.
///
/// # Errors
///
/// Returns a [`SchemaError`] only if the built-in declarations are broken.
pub fn developer_content_source() -> Result<SourceConfig, SchemaError> {
    build_source(developer_content_decl())
}
