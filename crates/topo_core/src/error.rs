//! Diagnostics and error types for the Topo front end.

use std::fmt;

use thiserror::Error;

/// Which stage of the front end produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Produced while scanning (unknown character, unterminated string, …).
    Lexical,
    /// Produced while parsing (missing token, incomplete expression, …).
    Syntax,
}

/// A single structured diagnostic, decoupled from any output medium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Stage that produced the diagnostic.
    pub severity: Severity,
    /// 1-based source line of the offending position.
    pub line: u32,
    /// 1-based source column of the offending position.
    pub column: u32,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Create a scanning-stage diagnostic.
    pub fn lexical(line: u32, column: u32, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Lexical,
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parsing-stage diagnostic.
    pub fn syntax(line: u32, column: u32, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Syntax,
            line,
            column,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self.severity {
            Severity::Lexical => "Lexical error",
            Severity::Syntax => "Parse error",
        };
        write!(f, "{} [{}:{}]: {}", stage, self.line, self.column, self.message)
    }
}

/// A failed parse: the opaque caller-supplied label plus every diagnostic
/// recorded during the run, ordered by source position (lexical before
/// syntax when both land on the same position).
///
/// A failure never carries a tree; everything the parse built has already
/// been released by the time the caller sees this value.
#[derive(Debug, Clone, Error)]
#[error("{label}: parsing failed with {n} error(s)", n = .diagnostics.len())]
pub struct ParseFailure {
    /// The diagnostic label handed to [`parse`](crate::parser::parse),
    /// e.g. a file name or `"<command-line>"`.
    pub label: String,
    /// All diagnostics recorded during the run. Never empty.
    pub diagnostics: Vec<Diagnostic>,
}

/// Convenient `Result` alias for fallible front-end operations.
pub type TopoResult<T> = Result<T, ParseFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::lexical(3, 7, "Unclosed string");
        assert_eq!(d.to_string(), "Lexical error [3:7]: Unclosed string");

        let d = Diagnostic::syntax(1, 1, "Expected expression");
        assert_eq!(d.to_string(), "Parse error [1:1]: Expected expression");
    }

    #[test]
    fn test_failure_display() {
        let failure = ParseFailure {
            label: "demo.topo".to_string(),
            diagnostics: vec![
                Diagnostic::lexical(1, 5, "Unknown character: '@' (0x40)"),
                Diagnostic::syntax(2, 1, "Expected statement"),
            ],
        };
        assert_eq!(
            failure.to_string(),
            "demo.topo: parsing failed with 2 error(s)"
        );
    }

    #[test]
    fn test_severity_ordering() {
        // Lexical sorts before Syntax so that position-tied diagnostics keep
        // their emission order when sorted.
        assert!(Severity::Lexical < Severity::Syntax);
    }
}
