use serde::{Deserialize, Serialize};
use std::fmt;

/// What a diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Pattern left untouched because it is too complex to rewrite safely
    Unsupported,

    /// A guess was made and should be reviewed
    Heuristic,

    /// Follow-up the rewrite may require elsewhere (includes, initializers)
    Advisory,

    /// Old-library references remain after all passes
    Residual,
}

/// A line-tagged (or file-level) message produced while rewriting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Line index (0-based); `None` for file-level notes
    pub line: Option<usize>,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line + 1, self.message),
            None => write!(f, "note: {}", self.message),
        }
    }
}

/// Append-only sink for the diagnostics of one file
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic attached to a line
    pub fn line(&mut self, line: usize, kind: DiagnosticKind, message: impl Into<String>) {
        self.push(Diagnostic {
            line: Some(line),
            kind,
            message: message.into(),
        });
    }

    /// Record a file-level diagnostic
    pub fn note(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.push(Diagnostic {
            line: None,
            kind,
            message: message.into(),
        });
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        log::debug!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
