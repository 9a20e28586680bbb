//! CLI definitions, tracing setup and command dispatch.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use content_schema::{
    ContentLoader, RawDocument, SourceConfig, SourceDecl, build_source, developer_content_source,
    normalize_path, output,
};

/// Inspect and check documentation content schemas.
#[derive(Parser)]
#[command(
    name = "content-schema",
    version,
    about = "Inspect the content schema registry and check extracted documents against it.",
    long_about = None,
)]
pub struct Cli {
    /// JSON source declaration; defaults to the built-in developer content source.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Report output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the document types, include globs and strictness settings.
    Describe {
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
    /// Print the document type each path resolves to.
    Classify {
        /// Paths relative to the content root.
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Check a JSON array of extracted `{ "path", "fields" }` documents.
    Check {
        /// File holding the extracted documents.
        records: PathBuf,

        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "content_schema=warn",
        1 => "content_schema=info",
        _ => "content_schema=debug",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(io::stderr)
                .init();
        }
    }
}

fn load_source(config: Option<&Path>) -> Result<SourceConfig> {
    let source = match config {
        Some(path) => {
            info!(path = %path.display(), "loading source declaration");
            build_source(SourceDecl::from_path(path)?)?
        }
        None => developer_content_source()?,
    };
    Ok(source)
}

/// Run the CLI. Returns `Ok(false)` when the check itself failed.
pub fn run() -> Result<bool> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let source = load_source(cli.config.as_deref())?;
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Command::Describe { format } => {
            match format {
                OutputFormat::Human => output::write_registry_human(&source, &mut stdout)?,
                OutputFormat::Json => output::write_registry_json(&source, &mut stdout)?,
            }
            Ok(true)
        }
        Command::Classify { paths } => classify(&source, paths, &mut stdout),
        Command::Check { records, format } => check(&source, records, *format, &mut stdout),
    }
}

fn classify(source: &SourceConfig, paths: &[String], writer: &mut dyn Write) -> Result<bool> {
    let strict = source.strictness().on_unknown_documents.is_fail();
    let mut ok = true;

    for path in paths {
        let normalized = normalize_path(path);
        if !source.is_included(&normalized) {
            writeln!(writer, "{normalized}: not included")?;
            continue;
        }
        if let Some(doc_type) = source.classify(&normalized) {
            writeln!(writer, "{normalized}: {}", doc_type.name())?;
        } else {
            writeln!(writer, "{normalized}: unknown document")?;
            ok &= !strict;
        }
    }

    Ok(ok)
}

fn check(
    source: &SourceConfig,
    records: &Path,
    format: OutputFormat,
    writer: &mut dyn Write,
) -> Result<bool> {
    let json = fs::read_to_string(records)
        .with_context(|| format!("Failed to read {}", records.display()))?;
    let docs: Vec<RawDocument> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse {}", records.display()))?;

    let report = match ContentLoader::new(source).load_all(&docs) {
        Ok(report) => report,
        Err(err) => {
            match format {
                OutputFormat::Human => writeln!(writer, "\u{2717} {err}")?,
                OutputFormat::Json => output::write_json_failure(&err, writer)?,
            }
            return Ok(false);
        }
    };

    match format {
        OutputFormat::Human => output::write_human(&report, writer)?,
        OutputFormat::Json => output::write_json(&report, writer)?,
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_schema::{Policy, Strictness, developer_content_decl};
    use serde_json::Value;
    use tempfile::TempDir;

    fn source_with_other_docs(on_unknown_documents: Policy) -> SourceConfig {
        build_source(
            developer_content_decl()
                .include("developers/other/**")
                .strictness(Strictness {
                    on_unknown_documents,
                    ..Strictness::strict()
                }),
        )
        .unwrap()
    }

    fn run_classify(source: &SourceConfig, paths: &[&str]) -> (bool, String) {
        let paths: Vec<String> = paths.iter().map(ToString::to_string).collect();
        let mut buf = Vec::new();
        let ok = classify(source, &paths, &mut buf).unwrap();
        (ok, String::from_utf8(buf).unwrap())
    }

    fn run_check(source: &SourceConfig, records: &str, format: OutputFormat) -> (bool, String) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("documents.json");
        fs::write(&path, records).unwrap();
        let mut buf = Vec::new();
        let ok = check(source, &path, format, &mut buf).unwrap();
        (ok, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_classify_prints_types() {
        let source = developer_content_source().unwrap();
        let (ok, out) = run_classify(
            &source,
            &["./developers/guides/x/y.md", "developers/guides/README.md"],
        );
        assert!(ok);
        assert_eq!(
            out,
            "developers/guides/x/y.md: DeveloperGuide\ndevelopers/guides/README.md: IgnoredDoc\n"
        );
    }

    #[test]
    fn test_classify_not_included_is_not_a_failure() {
        let source = developer_content_source().unwrap();
        let (ok, out) = run_classify(&source, &["src/main.rs"]);
        assert!(ok);
        assert_eq!(out, "src/main.rs: not included\n");
    }

    #[test]
    fn test_classify_unknown_fails_only_when_strict() {
        let strict = source_with_other_docs(Policy::Fail);
        let (ok, out) = run_classify(&strict, &["developers/other/notes.md", "developers/guides/a.md"]);
        assert!(!ok);
        assert!(out.contains("developers/other/notes.md: unknown document"));
        assert!(out.contains("developers/guides/a.md: DeveloperGuide"));

        let lenient = source_with_other_docs(Policy::SkipWarn);
        let (ok, out) = run_classify(&lenient, &["developers/other/notes.md"]);
        assert!(ok);
        assert!(out.contains("unknown document"));
    }

    #[test]
    fn test_check_hard_failure_returns_false() {
        let source = developer_content_source().unwrap();
        let records = r#"[{ "path": "developers/guides/a.md", "fields": {} }]"#;

        let (ok, out) = run_check(&source, records, OutputFormat::Human);
        assert!(!ok);
        assert!(out.starts_with("\u{2717} developers/guides/a.md"), "got: {out}");

        let (ok, out) = run_check(&source, records, OutputFormat::Json);
        assert!(!ok);
        let json: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["kind"], "missing_or_incompatible_data");
        assert_eq!(json["error"]["field"], "title");
    }

    #[test]
    fn test_check_clean_run() {
        let source = developer_content_source().unwrap();
        let records = r#"[{ "path": "developers/guides/a.md", "fields": { "title": "A" } }]"#;

        let (ok, out) = run_check(&source, records, OutputFormat::Json);
        assert!(ok);
        let json: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["records"][0]["type"], "DeveloperGuide");
    }

    #[test]
    fn test_check_unreadable_records_is_an_error() {
        let source = developer_content_source().unwrap();
        let tmp = TempDir::new().unwrap();
        let mut buf = Vec::new();
        let err = check(
            &source,
            &tmp.path().join("absent.json"),
            OutputFormat::Human,
            &mut buf,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read"), "got: {err}");
    }
}
