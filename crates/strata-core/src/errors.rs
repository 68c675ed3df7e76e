//! Error surface for strata: one enum of failure families, one payload type.
//!
//! Callers match on the family and then on [`ErrorInfo::code`], which is a
//! stable kebab-case string such as `negative-depth` or `table-shape-mismatch`.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What went wrong, where, and what to try instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Kebab-case identifier of the failure, stable across releases.
    pub code: String,
    /// Description of the offending input.
    pub message: String,
    /// Offending layer, column, depth, line number and similar locators.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Suggested fix, when one is obvious.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with no locators and no hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records a locator; a repeated key keeps the last value.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Attaches a suggested fix.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Every failure a strata crate reports, grouped by the input it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum StrataError {
    /// Invalid layers, out-of-range layer indices, depths above the surface.
    #[error("model: {0}")]
    Model(ErrorInfo),
    /// Misaligned sequences or tables, bad `nbest`/`nmodels`, bad slices.
    #[error("ensemble: {0}")]
    Ensemble(ErrorInfo),
    /// Unusable sampling setup: grid step, depth range, grid size, worker pool.
    #[error("grid: {0}")]
    Grid(ErrorInfo),
    /// Report text that does not follow the layered-model grammar.
    #[error("parse: {0}")]
    Parse(ErrorInfo),
    /// JSON, YAML and file I/O failures.
    #[error("serde: {0}")]
    Serde(ErrorInfo),
}

// Renders as `code: message [key=value, ...] (hint: ...)`.
impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        let mut entries = self.context.iter();
        if let Some((key, value)) = entries.next() {
            write!(f, " [{key}={value}")?;
            for (key, value) in entries {
                write!(f, ", {key}={value}")?;
            }
            f.write_str("]")?;
        }
        match &self.hint {
            Some(hint) => write!(f, " (hint: {hint})"),
            None => Ok(()),
        }
    }
}

impl StrataError {
    /// Payload shared by every family.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            StrataError::Model(info)
            | StrataError::Ensemble(info)
            | StrataError::Grid(info)
            | StrataError::Parse(info)
            | StrataError::Serde(info) => info,
        }
    }

    /// Shorthand for `self.info().code`.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}
