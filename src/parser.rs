//! # Parser
//!
//! Drives the [`Lexer`] to exhaustion and builds a [`Tune`].
//!
//! Header fields update the tune as they arrive; each note token is resolved
//! against the tune's current unit denominator. The first error, lexical or
//! semantic, aborts the whole parse and cancels the lexer.

use crate::ast::*;
use crate::error::{AbcError, DurationError};
use crate::lexer::{line_column, LexItem, Lexer, NoteToken};
use crate::options::ParseOptions;

/// Parser for ABC source text
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    tune: Tune,
    strict_headers: bool,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, options: &ParseOptions) -> Self {
        Self {
            lexer: Lexer::new(input),
            tune: Tune {
                unit_denominator: options.unit_denominator,
                ..Tune::default()
            },
            strict_headers: options.strict_headers,
        }
    }

    /// Consume all items and return the finished tune.
    pub fn parse(mut self) -> Result<Tune, AbcError> {
        while let Some(item) = self.lexer.next() {
            if let Err(e) = self.handle(item) {
                self.lexer.stop();
                log::debug!("parse failed: {}", e);
                return Err(e);
            }
        }

        log::debug!(
            "parsed tune {:?}: {} notes",
            self.tune.title,
            self.tune.notes.len()
        );
        Ok(self.tune)
    }

    fn handle(&mut self, item: LexItem<'a>) -> Result<(), AbcError> {
        match item {
            LexItem::Error {
                kind,
                context,
                offset,
            } => {
                let (line, column) = line_column(self.lexer.input(), offset);
                Err(AbcError::Lexical {
                    kind,
                    context: context.to_string(),
                    line,
                    column,
                })
            }
            LexItem::Field { key, value } => self.header_field(key, value),
            LexItem::Note(token) => {
                let note = resolve_note(&token, self.tune.unit_denominator)?;
                self.tune.notes.push(note);
                Ok(())
            }
        }
    }

    fn header_field(&mut self, key: char, value: &str) -> Result<(), AbcError> {
        log::debug!("header field {}:{}", key, value);
        match key {
            'T' => self.tune.title = value.to_string(),
            'K' => self.tune.key = value.to_string(),
            'L' => match parse_unit_length(value) {
                Ok(denominator) => self.tune.unit_denominator = denominator,
                Err(message) => self.reject_header(key, message)?,
            },
            'M' => match Meter::parse(value) {
                Ok(meter) => self.tune.meter = meter,
                Err(message) => self.reject_header(key, message)?,
            },
            _ => log::debug!("ignoring header field {}", key),
        }
        Ok(())
    }

    fn reject_header(&self, key: char, message: String) -> Result<(), AbcError> {
        if self.strict_headers {
            return Err(AbcError::Header { key, message });
        }
        log::warn!("ignoring header field {}: {}", key, message);
        Ok(())
    }
}

/// Parse an `L:` value. Only `1/N` is meaningful, since durations are
/// measured against a denominator alone.
fn parse_unit_length(value: &str) -> Result<u16, String> {
    let trimmed = value.trim();
    let parts: Vec<&str> = trimmed.split('/').collect();
    if parts.len() != 2 || parts[0].trim() != "1" {
        return Err(format!("expected 1/N, got {}", trimmed));
    }

    match parts[1].trim().parse::<u16>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Invalid unit length denominator: {}", trimmed)),
    }
}

/// Resolve a raw note token into a [`Note`].
///
/// Octave starts at 3; lowercase letters add one, then each `'` adds one and
/// each `,` removes one. Durations use `unit_denominator` unless the token
/// carries its own denominator.
pub fn resolve_note(token: &NoteToken<'_>, unit_denominator: u16) -> Result<Note, AbcError> {
    let mut octave = BASE_OCTAVE;
    let letter = if token.letter.is_ascii_lowercase() && token.letter != 'z' {
        octave += 1;
        token.letter.to_ascii_uppercase()
    } else {
        token.letter
    };
    let name = NoteName::from_char(letter).ok_or_else(|| {
        AbcError::Internal(format!("unexpected note letter {:?}", token.letter))
    })?;

    for marker in token.octave.chars() {
        match marker {
            '\'' => octave = octave.saturating_add(1),
            ',' => octave = octave.saturating_sub(1),
            other => {
                return Err(AbcError::Internal(format!(
                    "unexpected octave marker {:?}",
                    other
                )))
            }
        }
    }

    Ok(Note {
        octave,
        name,
        accidental: parse_accidental(token.accidental)?,
        duration: parse_duration(token.duration, unit_denominator)?,
    })
}

/// Map a raw accidental to its level. A missing accidental is 0; the key
/// signature is not consulted.
pub fn parse_accidental(raw: &str) -> Result<i8, AbcError> {
    match raw {
        "__" => Ok(-2),
        "_" => Ok(-1),
        "=" | "" => Ok(0),
        "^" => Ok(1),
        "^^" => Ok(2),
        other => Err(AbcError::Internal(format!(
            "unexpected accidental {:?}",
            other
        ))),
    }
}

/// Compute a duration in 1/64ths: `64 * numerator / denominator`, rounded down.
///
/// `raw` is `[numerator][/[denominator]]`. A missing numerator is 1 and a
/// missing denominator is `unit_denominator`.
pub fn parse_duration(raw: &str, unit_denominator: u16) -> Result<u16, DurationError> {
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() > 2 {
        return Err(DurationError::Format(raw.to_string()));
    }

    let numerator = match parts[0] {
        "" => 1,
        term => parse_term(term, raw, DurationError::Numerator)?,
    };
    let denominator = match parts.get(1) {
        Some(term) if !term.is_empty() => parse_term(term, raw, DurationError::Denominator)?,
        _ => u64::from(unit_denominator),
    };
    if denominator == 0 {
        return Err(DurationError::Denominator(raw.to_string()));
    }

    let length = numerator
        .checked_mul(64)
        .map(|n| n / denominator)
        .ok_or_else(|| DurationError::Overflow(raw.to_string()))?;
    u16::try_from(length).map_err(|_| DurationError::Overflow(raw.to_string()))
}

fn parse_term(
    term: &str,
    raw: &str,
    invalid: fn(String) -> DurationError,
) -> Result<u64, DurationError> {
    if !term.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(raw.to_string()));
    }
    match term.parse::<u64>() {
        Ok(0) => Err(invalid(raw.to_string())),
        Ok(n) => Ok(n),
        Err(_) => Err(DurationError::Overflow(raw.to_string())),
    }
}
