//! Shared output formatting for load reports and the registry view.
//!
//! Provides JSON and plain-text formatters. Color/terminal formatting is
//! left to callers.

use std::io::Write;

use serde_json::json;

use crate::error::DocumentError;
use crate::report::LoadReport;
use crate::source::SourceConfig;

/// Format a `LoadReport` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &LoadReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a hard failure that aborted a load as JSON:
/// `{ "ok": false, "error": { ... } }`.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json_failure(error: &DocumentError, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&json!({ "ok": false, "error": error }))?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a `LoadReport` as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &LoadReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer, "  CONTENT SCHEMA CHECK")?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer)?;
    writeln!(writer, "  Documents seen:  {}", report.documents_seen())?;
    writeln!(writer, "  Loaded:          {}", report.records.len())?;
    writeln!(writer, "  Ignored:         {}", report.ignored)?;
    writeln!(writer, "  Skipped:         {}", report.skipped.len())?;
    writeln!(writer, "  Warnings:        {}", report.warnings_count())?;
    writeln!(writer)?;

    if !report.records.is_empty() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  RECORDS")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for record in &report.records {
            writeln!(writer, "{} -> {}", record.source_file_path, record.type_name)?;
        }
        writeln!(writer)?;
    }

    if !report.warnings.is_empty() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  WARNINGS")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for warning in &report.warnings {
            writeln!(writer, "{warning}")?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "{}", "=".repeat(80))?;
    if report.ok {
        writeln!(
            writer,
            "\u{2713} All {} documents conform to their schema",
            report.records.len()
        )?;
    } else {
        writeln!(
            writer,
            "\u{26a0} {} violation(s) tolerated by lenient strictness settings",
            report.warnings_count()
        )?;
    }
    writeln!(writer, "{}", "=".repeat(80))?;

    Ok(())
}

/// Format the registry as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_registry_json(source: &SourceConfig, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(source)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format the registry as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_registry_human(source: &SourceConfig, writer: &mut dyn Write) -> anyhow::Result<()> {
    let strictness = source.strictness();

    writeln!(writer, "Content root: {}", source.content_root().display())?;
    writeln!(writer, "Include:")?;
    for glob in source.include_globs() {
        writeln!(writer, "  {glob}")?;
    }
    writeln!(writer, "Strictness:")?;
    writeln!(writer, "  onUnknownDocuments:          {}", strictness.on_unknown_documents)?;
    writeln!(
        writer,
        "  onMissingOrIncompatibleData: {}",
        strictness.on_missing_or_incompatible_data
    )?;
    writeln!(writer, "  onExtraFieldData:            {}", strictness.on_extra_field_data)?;

    for doc_type in source.document_types() {
        writeln!(writer)?;
        writeln!(writer, "{} ({})", doc_type.name(), doc_type.file_path_pattern())?;
        if doc_type.is_marker() {
            writeln!(writer, "  (no fields, matching files are ignored)")?;
            continue;
        }
        for field in doc_type.fields() {
            let marker = if field.required { "*" } else { " " };
            write!(writer, "  {marker} {:<12} {}", field.name, field.kind)?;
            if let Some(description) = &field.description {
                write!(writer, "  {description}")?;
            }
            writeln!(writer)?;
        }
    }

    Ok(())
}
