//! Error types for query lexing and parsing.

use std::{error::Error, fmt};

use thiserror::Error as ThisError;

/// Lexical error: the input could not be split into tokens.
///
/// The only lexical failure the grammar leaves open is an unterminated
/// quoted string; everything else falls into the unquoted-word rule.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("{message} at byte {position}")]
pub struct LexError {
    /// Error message.
    pub message: String,
    /// Byte position in input where the offending token started.
    pub position: usize,
    /// The original input string.
    pub input: String,
}

impl LexError {
    /// Creates a new lexical error.
    pub fn new(message: impl Into<String>, position: usize, input: &str) -> Self {
        Self {
            message: message.into(),
            position,
            input: input.to_string(),
        }
    }
}

/// Syntax error: the token stream does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("{message}")]
pub struct SyntaxError {
    /// Error message.
    pub message: String,
    /// Byte position of the offending token, or `None` at end of input.
    pub position: Option<usize>,
}

impl SyntaxError {
    /// Creates a new syntax error.
    pub fn new(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// A unified error type for query parsing.
///
/// Carries the original query string so the Display impl can point a caret
/// at the offending position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// The original query string.
    pub query: String,
}

/// The specific kind of query error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Tokenization failed.
    Lex {
        /// Error message.
        message: String,
        /// Byte position in input.
        position: usize,
    },
    /// The token stream does not match the grammar.
    Syntax {
        /// Error message.
        message: String,
        /// Byte position of the offending token (`None` at end of input).
        position: Option<usize>,
    },
}

impl QueryError {
    /// Wraps a syntax error together with the query it came from.
    pub(crate) fn syntax(err: SyntaxError, query: &str) -> Self {
        Self {
            kind: QueryErrorKind::Syntax {
                message: err.message,
                position: err.position,
            },
            query: query.to_string(),
        }
    }

    /// Returns the error message without context.
    pub fn message(&self) -> &str {
        match &self.kind {
            QueryErrorKind::Lex { message, .. } | QueryErrorKind::Syntax { message, .. } => message,
        }
    }

    /// Returns the byte position of the error, when known.
    pub fn position(&self) -> Option<usize> {
        match &self.kind {
            QueryErrorKind::Lex { position, .. } => Some(*position),
            QueryErrorKind::Syntax { position, .. } => *position,
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        let message = self.message();
        if message.contains("unterminated quote") {
            Some("Add a closing quote (\") to complete the phrase")
        } else if message.contains("closing parenthesis") {
            Some("Balance the parentheses; every ( needs a matching )")
        } else if message.contains("'AND'") || message.contains("'OR'") {
            Some("AND and OR need expressions on both sides, e.g., 'red OR blue'")
        } else if message.contains("expected a word or quoted phrase") {
            Some("A field needs a value after the colon, e.g., 'color:red'")
        } else if message.contains("field name") {
            Some("A colon must follow a field name, e.g., 'color:red'")
        } else {
            None
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "query syntax error: {}", self.message())?;
        writeln!(f, "  {}", self.query)?;

        if let Some(pos) = self.position() {
            // The caret is aligned by character count, not byte count.
            let clamped = pos.min(self.query.len());
            let offset = self.query[..clamped].chars().count();
            writeln!(f, "  {}^", " ".repeat(offset))?;
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {suggestion}")?;
        }

        Ok(())
    }
}

impl Error for QueryError {}

impl From<LexError> for QueryError {
    fn from(err: LexError) -> Self {
        Self {
            kind: QueryErrorKind::Lex {
                message: err.message,
                position: err.position,
            },
            query: err.input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display_has_caret_and_hint() {
        let err = QueryError::from(LexError::new("unterminated quote", 4, "red \"shoes"));
        let display = err.to_string();
        assert!(display.contains("unterminated quote"));
        assert!(display.contains("red \"shoes"));
        assert!(display.contains("    ^"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn syntax_error_display_without_position() {
        let err = QueryError::syntax(
            SyntaxError::new("unexpected end of query", None),
            "color:",
        );
        let display = err.to_string();
        assert!(display.contains("unexpected end of query"));
        assert!(display.contains("color:"));
        assert!(!display.contains('^'));
    }

    #[test]
    fn caret_counts_characters_not_bytes() {
        let err = QueryError::syntax(
            // "größe" is seven bytes; the caret lands after five characters.
            SyntaxError::new("unexpected ')'", Some(7)),
            "größe)",
        );
        let display = err.to_string();
        assert!(display.contains("\n       ^"), "got: {display}");
    }

    #[test]
    fn operator_error_suggestion() {
        let err = QueryError::syntax(
            SyntaxError::new("unexpected 'OR' (needs an expression before it)", Some(0)),
            "OR red",
        );
        assert!(err.suggestion().unwrap().contains("both sides"));
    }

    #[test]
    fn message_extraction() {
        let err = QueryError::from(LexError::new("unterminated quote", 0, "\"x"));
        assert_eq!(err.message(), "unterminated quote");
        assert_eq!(err.position(), Some(0));
    }
}
