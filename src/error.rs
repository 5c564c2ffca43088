//! # Error Types
//!
//! This module defines all error types for the ABC parser.
//!
//! Every error is fatal to the parse that produced it: the first problem in
//! source order is reported and no partial tune is returned.
//!
//! ## Error Types
//! - `Lexical` - Malformed note token, with the offending text and its line/column
//! - `Duration` - Malformed duration suffix on an otherwise valid note
//! - `Header` - Malformed `L:`/`M:` value (only with strict headers)
//! - `Config` - Invalid [`ParseOptions`](crate::ParseOptions)
//! - `Internal` - A lexer/parser contract violation; never caused by user input
//!
//! ## Usage
//! ```rust
//! use abc::{parse, AbcError};
//!
//! match parse("^_A") {
//!     Ok(tune) => println!("{} notes", tune.notes.len()),
//!     Err(AbcError::Lexical { line, column, context, kind }) => {
//!         eprintln!("{}:{}: bad token {:?}: {}", line, column, context, kind);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AbcError {
    /// Lexical error produced by the tokenizer.
    ///
    /// `context` is the text consumed for the failing token so far.
    ///
    /// # Example
    /// ```
    /// # use abc::{AbcError, LexErrorKind};
    /// let err = AbcError::Lexical {
    ///     kind: LexErrorKind::WrongAccidental,
    ///     context: "^_".to_string(),
    ///     line: 1,
    ///     column: 1,
    /// };
    /// assert_eq!(err.to_string(), "at ^_: wrong accidental");
    /// ```
    #[error("at {context}: {kind}")]
    Lexical {
        kind: LexErrorKind,
        context: String,
        line: usize,
        column: usize,
    },

    /// The duration suffix of a note could not be resolved.
    #[error(transparent)]
    Duration(#[from] DurationError),

    /// A recognized header field carries a value that cannot be interpreted.
    #[error("Invalid header field {key}: {message}")]
    Header { key: char, message: String },

    /// Invalid parser configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Contract violation between lexer and parser.
    #[error("Internal inconsistency: {0}")]
    Internal(String),
}

/// Kinds of lexical failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Two different accidental markers in a row, e.g. `^_`.
    #[error("wrong accidental")]
    WrongAccidental,

    /// An accidental at the very end of the input.
    #[error("unfinished note")]
    UnfinishedNote,

    /// Something other than `A-G`, `a-g` or `z` where a note letter belongs.
    #[error("not a note")]
    NotANote,
}

/// Duration suffix failures. Each variant carries the raw suffix.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("wrong duration {0}")]
    Format(String),

    #[error("wrong duration numerator {0}")]
    Numerator(String),

    #[error("wrong duration denominator {0}")]
    Denominator(String),

    #[error("duration {0} out of range")]
    Overflow(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexical_display_uses_context_prefix() {
        let err = AbcError::Lexical {
            kind: LexErrorKind::NotANote,
            context: "x".to_string(),
            line: 2,
            column: 4,
        };
        assert_eq!(err.to_string(), "at x: not a note");
    }

    #[test]
    fn test_duration_display_is_transparent() {
        let err: AbcError = DurationError::Format("1/2/3".to_string()).into();
        assert_eq!(err.to_string(), "wrong duration 1/2/3");

        let err: AbcError = DurationError::Denominator("/x".to_string()).into();
        assert_eq!(err.to_string(), "wrong duration denominator /x");
    }

    #[test]
    fn test_header_display() {
        let err = AbcError::Header {
            key: 'L',
            message: "expected 1/N, got 3/8".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid header field L: expected 1/N, got 3/8");
    }
}
