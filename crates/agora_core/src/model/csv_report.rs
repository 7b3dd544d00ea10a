//! Bulk-import report model and its browser-facing JSON envelope.
//!
//! # Responsibility
//! - Collect per-row errors and warnings produced by one CSV import.
//! - Serialize the outcome into the `{HasErrors, HasWarnings, Warnings, Errors}`
//!   envelope returned by the import actions.
//!
//! # Invariants
//! - A report is created fresh per import and reflects only that import.
//! - Entries keep insertion order.

use serde::Serialize;

/// Category of an import error or warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CsvErrorWarningType {
    /// Upload missing, empty, or without any lines.
    BadDataFormat,
    /// A required column is absent or blank.
    MissingKeyOrValue,
    /// Referenced item (for example a culture) is unknown.
    DoesNotExist,
    /// Row duplicates a stored item or an earlier row.
    AlreadyExists,
    /// Row value cannot be interpreted.
    ItemBad,
    /// Import created a resource key that other languages lack.
    NewKeyCreated,
    /// Import aborted; nothing from the file was kept.
    GeneralError,
}

/// One report entry. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvErrorWarning {
    pub kind: CsvErrorWarningType,
    pub message: String,
}

/// Errors and warnings gathered during one import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvReport {
    errors: Vec<CsvErrorWarning>,
    warnings: Vec<CsvErrorWarning>,
}

impl CsvReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report holding a single error.
    pub fn with_error(kind: CsvErrorWarningType, message: impl Into<String>) -> Self {
        let mut report = Self::new();
        report.add_error(kind, message);
        report
    }

    pub fn add_error(&mut self, kind: CsvErrorWarningType, message: impl Into<String>) {
        self.errors.push(CsvErrorWarning {
            kind,
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, kind: CsvErrorWarningType, message: impl Into<String>) {
        self.warnings.push(CsvErrorWarning {
            kind,
            message: message.into(),
        });
    }

    pub fn errors(&self) -> &[CsvErrorWarning] {
        &self.errors
    }

    pub fn warnings(&self) -> &[CsvErrorWarning] {
        &self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Builds the JSON envelope returned to the browser.
    pub fn to_envelope(&self) -> CsvReportEnvelope {
        CsvReportEnvelope {
            has_errors: self.has_errors(),
            has_warnings: self.has_warnings(),
            warnings: serialize_messages(&self.warnings),
            errors: serialize_messages(&self.errors),
        }
    }
}

/// Import response body.
///
/// `warnings` and `errors` hold JSON-encoded arrays of message strings, so
/// the envelope keeps the exact shape existing admin pages decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CsvReportEnvelope {
    pub has_errors: bool,
    pub has_warnings: bool,
    pub warnings: String,
    pub errors: String,
}

fn serialize_messages(entries: &[CsvErrorWarning]) -> String {
    let messages: Vec<&str> = entries.iter().map(|entry| entry.message.as_str()).collect();
    // A list of plain strings always serializes.
    serde_json::to_string(&messages).unwrap_or_else(|_| "[]".to_string())
}
