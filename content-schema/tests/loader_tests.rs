//! Integration tests for `ContentLoader` strictness handling.

use content_schema::builtin::{COURSE_LESSON, COURSE_METADATA, DEVELOPER_GUIDE};
use content_schema::{
    ContentLoader, ContentType, DocumentError, DocumentErrorKind, LoadOutcome, Policy, RawDocument,
    SourceConfig, Strictness, build_source, developer_content_decl, developer_content_source,
};
use serde_json::{Value, json};

fn doc(path: &str, fields: &Value) -> RawDocument {
    RawDocument::new(path, fields.as_object().cloned().unwrap())
}

fn source_with(strictness: Strictness) -> SourceConfig {
    build_source(developer_content_decl().strictness(strictness)).unwrap()
}

fn load(source: &SourceConfig, doc: &RawDocument) -> (Result<LoadOutcome, DocumentError>, usize) {
    let mut warnings = Vec::new();
    let outcome = ContentLoader::new(source).load_document(doc, &mut warnings);
    (outcome, warnings.len())
}

#[test]
fn test_guide_loads_into_record() {
    let source = developer_content_source().unwrap();
    let guide = doc(
        "developers/guides/rpc/intro.md",
        &json!({
            "title": "RPC basics",
            "keywords": ["rpc", "json"],
            "description": "Calling the API"
        }),
    );

    let (outcome, warnings) = load(&source, &guide);
    let LoadOutcome::Loaded(record) = outcome.unwrap() else {
        panic!("expected a loaded record");
    };
    assert_eq!(warnings, 0);
    assert_eq!(record.type_name, DEVELOPER_GUIDE);
    assert_eq!(record.id, "developers/guides/rpc/intro.md");
    assert_eq!(record.flattened_path, "developers/guides/rpc/intro");
    assert_eq!(record.content_type, ContentType::Markdown);
    assert_eq!(record.fields["keywords"], json!(["rpc", "json"]));
}

#[test]
fn test_unknown_document_fails_when_strict() {
    let source = build_source(developer_content_decl().include("developers/other/**")).unwrap();
    let (outcome, _) = load(&source, &doc("developers/other/notes.md", &json!({"title": "x"})));
    let err = outcome.unwrap_err();
    assert_eq!(err.kind, DocumentErrorKind::UnknownDocument);
    assert_eq!(err.file, "developers/other/notes.md");
}

#[test]
fn test_unknown_document_skipped_when_lenient() {
    let source = build_source(
        developer_content_decl()
            .include("developers/other/**")
            .strictness(Strictness {
                on_unknown_documents: Policy::SkipWarn,
                ..Strictness::strict()
            }),
    )
    .unwrap();

    let (outcome, warnings) = load(&source, &doc("developers/other/notes.md", &json!({})));
    assert_eq!(outcome.unwrap(), LoadOutcome::Skipped);
    assert_eq!(warnings, 1);
}

#[test]
fn test_paths_outside_include_globs_are_skipped_silently() {
    let source = developer_content_source().unwrap();
    let (outcome, warnings) = load(&source, &doc("src/notes.md", &json!({})));
    assert_eq!(outcome.unwrap(), LoadOutcome::Skipped);
    assert_eq!(warnings, 0);
}

#[test]
fn test_readme_is_ignored_without_field_checks() {
    let source = developer_content_source().unwrap();
    let (outcome, warnings) = load(
        &source,
        &doc("developers/guides/README.md", &json!({"anything": 1})),
    );
    assert!(matches!(outcome.unwrap(), LoadOutcome::Ignored { .. }));
    assert_eq!(warnings, 0);
}

#[test]
fn test_missing_title_fails_when_strict() {
    let source = developer_content_source().unwrap();
    let (outcome, _) = load(
        &source,
        &doc("developers/guides/x/y.md", &json!({"description": "no title"})),
    );
    let err = outcome.unwrap_err();
    assert_eq!(err.kind, DocumentErrorKind::MissingOrIncompatibleData);
    assert_eq!(err.field.as_deref(), Some("title"));
    assert_eq!(err.type_name.as_deref(), Some(DEVELOPER_GUIDE));
}

#[test]
fn test_missing_title_loads_when_lenient() {
    let source = source_with(Strictness {
        on_missing_or_incompatible_data: Policy::SkipWarn,
        ..Strictness::strict()
    });
    let (outcome, warnings) = load(
        &source,
        &doc("developers/guides/x/y.md", &json!({"description": "no title"})),
    );
    let LoadOutcome::Loaded(record) = outcome.unwrap() else {
        panic!("expected a loaded record");
    };
    assert!(!record.fields.contains_key("title"));
    assert_eq!(record.fields["description"], "no title");
    assert_eq!(warnings, 1);
}

#[test]
fn test_null_counts_as_missing() {
    let source = developer_content_source().unwrap();
    let (outcome, _) = load(&source, &doc("developers/guides/x/y.md", &json!({"title": null})));
    assert_eq!(
        outcome.unwrap_err().kind,
        DocumentErrorKind::MissingOrIncompatibleData
    );
}

#[test]
fn test_incompatible_value() {
    let strict = developer_content_source().unwrap();
    let bad = doc(
        "developers/courses/c1/metadata.json",
        &json!({"title": "Course", "structure": {"not": "a list"}}),
    );
    let (outcome, _) = load(&strict, &bad);
    let err = outcome.unwrap_err();
    assert_eq!(err.kind, DocumentErrorKind::MissingOrIncompatibleData);
    assert_eq!(err.field.as_deref(), Some("structure"));

    let lenient = source_with(Strictness::lenient());
    let (outcome, warnings) = load(&lenient, &bad);
    let LoadOutcome::Loaded(record) = outcome.unwrap() else {
        panic!("expected a loaded record");
    };
    assert_eq!(record.type_name, COURSE_METADATA);
    assert_eq!(record.content_type, ContentType::Data);
    assert!(!record.fields.contains_key("structure"));
    assert_eq!(warnings, 1);
}

#[test]
fn test_coercible_values_are_accepted() {
    let source = developer_content_source().unwrap();
    let (outcome, warnings) = load(
        &source,
        &doc(
            "developers/courses/c1/content/lesson1.md",
            &json!({"title": 101, "objectives": "Write a program"}),
        ),
    );
    let LoadOutcome::Loaded(record) = outcome.unwrap() else {
        panic!("expected a loaded record");
    };
    assert_eq!(warnings, 0);
    assert_eq!(record.fields["title"], "101");
    assert_eq!(record.fields["objectives"], json!(["Write a program"]));
}

#[test]
fn test_extra_field_fails_when_strict() {
    let source = developer_content_source().unwrap();
    let (outcome, _) = load(
        &source,
        &doc(
            "developers/courses/c1/content/lesson1.md",
            &json!({"title": "Lesson 1", "author": "someone"}),
        ),
    );
    let err = outcome.unwrap_err();
    assert_eq!(err.kind, DocumentErrorKind::ExtraFieldData);
    assert_eq!(err.field.as_deref(), Some("author"));
    assert_eq!(err.type_name.as_deref(), Some(COURSE_LESSON));
}

#[test]
fn test_extra_field_kept_when_lenient() {
    let source = source_with(Strictness {
        on_extra_field_data: Policy::SkipWarn,
        ..Strictness::strict()
    });
    let (outcome, warnings) = load(
        &source,
        &doc(
            "developers/courses/c1/content/lesson1.md",
            &json!({"title": "Lesson 1", "author": "someone"}),
        ),
    );
    let LoadOutcome::Loaded(record) = outcome.unwrap() else {
        panic!("expected a loaded record");
    };
    assert_eq!(record.fields["author"], "someone");
    assert_eq!(warnings, 1);
}

#[test]
fn test_load_all_stops_at_first_failure() {
    let source = developer_content_source().unwrap();
    let docs = vec![
        doc("developers/guides/a.md", &json!({"title": "A"})),
        doc("developers/guides/b.md", &json!({})),
        doc("developers/guides/c.md", &json!({"title": "C"})),
    ];

    let err = ContentLoader::new(&source).load_all(&docs).unwrap_err();
    assert_eq!(err.file, "developers/guides/b.md");
}

#[test]
fn test_load_all_report() {
    let source = source_with(Strictness::lenient());
    let docs = vec![
        doc("developers/guides/a.md", &json!({"title": "A"})),
        doc("developers/guides/README.md", &json!({})),
        doc("developers/resources/links.md", &json!({"title": "Links"})),
        doc("target/debug/out.md", &json!({})),
        doc("developers/courses/c1/content/l1.md", &json!({"title": "L1", "author": "x"})),
    ];

    let report = ContentLoader::new(&source).load_all(&docs).unwrap();
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.ignored, 1);
    assert_eq!(
        report.skipped,
        ["developers/resources/links.md", "target/debug/out.md"]
    );
    assert_eq!(report.warnings_count(), 2);
    assert_eq!(report.documents_seen(), 5);
    assert!(!report.ok);
    assert_eq!(report.records_of(COURSE_LESSON).count(), 1);

    let mut buf = Vec::new();
    content_schema::output::write_json(&report, &mut buf).unwrap();
    let json: Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(json["records"][0]["type"], DEVELOPER_GUIDE);
    assert_eq!(json["records"][0]["flattenedPath"], "developers/guides/a");
    assert_eq!(json["warnings"][0]["kind"], "unknown_document");
    assert_eq!(json["ok"], false);
}

#[test]
fn test_load_all_clean_run_is_ok() {
    let source = developer_content_source().unwrap();
    let docs = vec![
        doc("developers/guides/a.md", &json!({"title": "A"})),
        doc(
            "developers/courses/c1/metadata.json",
            &json!({"title": "Course", "structure": [{"lesson": "l1"}]}),
        ),
    ];
    let report = ContentLoader::new(&source).load_all(&docs).unwrap();
    assert!(report.ok);
    assert_eq!(report.records.len(), 2);
}
