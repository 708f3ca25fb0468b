//! Non-fatal problems found while rendering.
//!
//! Rendering never fails on inconsistent spanners: the offending element is
//! dropped or left as is, and a [Diagnostic] is collected instead.

use std::fmt::Display;

use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Info,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// More slurs open at once than numbers available.
    SlurOverflow,
    SlurStopWithoutStart,
    DashedLineStopWithoutStart,
    /// Dashed line started again while still open.
    DashedLineRestarted,
    /// Dashed line still open at the end of the part.
    DashedLineUnclosed,
}
impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        Severity::Warning
    }
}

/// Problem located by part index and measure number (both from 1).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub part: usize,
    pub measure: usize,
    pub kind: DiagnosticKind,
    pub message: String,
}
impl Diagnostic {
    pub fn new(
        part: usize,
        measure: usize,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            part,
            measure,
            kind,
            message: message.into(),
        }
    }
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}
impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "part {}, measure {}: {}",
            self.part, self.measure, self.message
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    marks: Vec<Diagnostic>,
}
impl Diagnostics {
    pub fn new() -> Self {
        Self { marks: Vec::new() }
    }

    /// Collect and log the diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.marks.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.marks.extend(other.marks);
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.marks.iter()
    }
    pub fn of_kind(
        &self,
        kind: DiagnosticKind,
    ) -> impl Iterator<Item = &Diagnostic> {
        self.marks.iter().filter(move |mark| mark.kind == kind)
    }
}
impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;
    fn into_iter(self) -> Self::IntoIter {
        self.marks.into_iter()
    }
}
