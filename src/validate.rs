//! Output schema validation.
//!
//! Checks a JSON value against the outline schema:
//! `{"title": string, "outline": [{"level": "H1".."H6", "text": string, "page": integer}]}`.
//! Every problem is collected instead of stopping at the first one.

use std::fmt;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::HeadingLevel;

/// One schema complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Location, e.g. `outline[2].level`
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// All schema complaints for one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Whether the value conforms to the schema.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
        });
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "valid");
        }
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

/// Validate a JSON value against the outline schema.
pub fn validate_value(value: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(root) = value.as_object() else {
        report.push("$", "expected an object");
        return report;
    };

    match root.get("title") {
        None => report.push("title", "missing required field"),
        Some(Value::String(_)) => {}
        Some(_) => report.push("title", "expected a string"),
    }

    match root.get("outline") {
        None => report.push("outline", "missing required field"),
        Some(Value::Array(entries)) => {
            for (i, entry) in entries.iter().enumerate() {
                validate_entry(entry, &format!("outline[{}]", i), &mut report);
            }
        }
        Some(_) => report.push("outline", "expected an array"),
    }

    report
}

fn validate_entry(entry: &Value, path: &str, report: &mut ValidationReport) {
    let Some(fields) = entry.as_object() else {
        report.push(path, "expected an object");
        return;
    };

    let field_path = |name: &str| format!("{}.{}", path, name);

    match fields.get("level") {
        None => report.push(field_path("level"), "missing required field"),
        Some(Value::String(level)) => {
            if !level.starts_with('H') {
                report.push(field_path("level"), format!("'{}' does not start with 'H'", level));
            } else if level.parse::<HeadingLevel>().is_err() {
                report.push(field_path("level"), format!("'{}' is not one of H1-H6", level));
            }
        }
        Some(_) => report.push(field_path("level"), "expected a string"),
    }

    match fields.get("text") {
        None => report.push(field_path("text"), "missing required field"),
        Some(Value::String(_)) => {}
        Some(_) => report.push(field_path("text"), "expected a string"),
    }

    match fields.get("page") {
        None => report.push(field_path("page"), "missing required field"),
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => {}
        Some(_) => report.push(field_path("page"), "expected an integer"),
    }
}

/// Parse JSON text and validate it.
pub fn validate_json(json: &str) -> Result<ValidationReport> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| Error::Other(format!("Invalid JSON: {}", e)))?;
    Ok(validate_value(&value))
}
