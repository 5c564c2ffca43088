//! # Public API
//!
//! Entry points for parsing ABC text.
//!
//! - [`parse()`] - Parse with default options (unit length 1/8, lenient headers)
//! - [`parse_with_options()`] - Parse with a custom [`ParseOptions`]
//!
//! ## Typical Usage
//!
//! ```rust
//! use abc::parse;
//!
//! let tune = parse("T:My song\nC2 _EG c2")?;
//! assert_eq!(tune.title, "My song");
//! assert_eq!(tune.notes.len(), 4);
//! assert_eq!(tune.notes[1].to_string(), "bE3[8]");
//! # Ok::<(), abc::AbcError>(())
//! ```

use crate::{AbcError, ParseOptions, Parser, Tune};

/// Parse an ABC tune.
///
/// # Pipeline
/// 1. Tokenize header fields and note tokens with the lexer
/// 2. Apply header fields to the tune
/// 3. Resolve each note's octave, accidental and duration
///
/// Parsing is all-or-nothing: the first error is returned and no partial
/// tune is kept.
///
/// # Errors
/// Returns [`AbcError`] on the first lexical or duration error.
pub fn parse(source: &str) -> Result<Tune, AbcError> {
    Parser::new(source, &ParseOptions::default()).parse()
}

/// Parse with custom options.
///
/// # Example
/// ```rust
/// use abc::{parse_with_options, ParseOptions};
///
/// let options = ParseOptions { unit_denominator: 4, ..ParseOptions::default() };
/// let tune = parse_with_options("C", &options)?;
/// assert_eq!(tune.notes[0].duration, 16);
/// # Ok::<(), abc::AbcError>(())
/// ```
///
/// # Errors
/// Returns [`AbcError::Config`] if the options are invalid, otherwise as [`parse()`].
pub fn parse_with_options(source: &str, options: &ParseOptions) -> Result<Tune, AbcError> {
    options.validate()?;
    Parser::new(source, options).parse()
}
