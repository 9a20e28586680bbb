//! Load report types.

use serde::Serialize;

use crate::error::DocumentError;
use crate::loader::ContentRecord;

/// Result of a successful load run.
///
/// A hard failure never produces a report; `warnings` only ever holds
/// violations whose policy was lenient.
#[derive(Debug, Clone, Default, Serialize)]
#[non_exhaustive]
pub struct LoadReport {
    /// Typed records, in input order.
    pub records: Vec<ContentRecord>,
    /// Number of documents that matched a marker type.
    pub ignored: usize,
    /// Paths outside the include globs, or unknown under a lenient policy.
    pub skipped: Vec<String>,
    /// Violations downgraded to warnings.
    pub warnings: Vec<DocumentError>,
    /// Whether the run finished without any warning.
    pub ok: bool,
}

impl LoadReport {
    /// Total number of documents seen (loaded + ignored + skipped).
    #[must_use]
    pub fn documents_seen(&self) -> usize {
        self.records.len() + self.ignored + self.skipped.len()
    }

    /// Number of downgraded violations.
    #[must_use]
    pub fn warnings_count(&self) -> usize {
        self.warnings.len()
    }

    /// Records of one document type.
    pub fn records_of<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a ContentRecord> {
        self.records.iter().filter(move |r| r.type_name == type_name)
    }
}
