//! # Lexer
//!
//! Streaming tokenizer for ABC text. The lexer is an [`Iterator`] over
//! [`LexItem`]s driven by the parser one item at a time.
//!
//! It runs as a two-mode state machine:
//! - **Header**: `K:value` lines, each emitted as [`LexItem::Field`]. The first
//!   position whose second character is not `:` switches to body mode for good.
//! - **Body**: note tokens `[accidental] letter [octave markers] [duration]`,
//!   emitted as raw [`NoteToken`] slices. Whitespace, `[` and `]` are skipped.
//!
//! A [`LexItem::Error`] ends the sequence. Tokens are slices of the input, so
//! nothing is copied until the parser resolves them.

use crate::error::LexErrorKind;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An unresolved note token, as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteToken<'a> {
    /// `""`, `^`, `^^`, `_`, `__` or `=`
    pub accidental: &'a str,
    /// `A-G`, `a-g`, or `z` for a rest
    pub letter: char,
    /// Run of `'` and `,`
    pub octave: &'a str,
    /// Run of digits, `/`, `<` and `>`; not validated here
    pub duration: &'a str,
}

impl<'a> NoteToken<'a> {
    pub fn new(letter: char) -> Self {
        Self {
            accidental: "",
            letter,
            octave: "",
            duration: "",
        }
    }
}

impl fmt::Display for NoteToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.accidental, self.letter, self.octave, self.duration
        )
    }
}

/// Items produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexItem<'a> {
    /// Header line `key:value`; the value excludes the line terminator.
    Field { key: char, value: &'a str },
    Note(NoteToken<'a>),
    /// Terminal: no item follows an error.
    Error {
        kind: LexErrorKind,
        /// Text consumed for the failing token
        context: &'a str,
        /// Byte offset of `context` in the input
        offset: usize,
    },
}

/// Shared cancellation signal for a [`Lexer`].
///
/// Cloning yields another handle to the same signal. Once cancelled, the
/// lexer emits nothing more.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Header,
    Body,
    Done,
}

/// Lexer for tokenizing ABC source text
pub struct Lexer<'a> {
    input: &'a str,
    start: usize,
    pos: usize,
    mode: Mode,
    cancel: CancelHandle,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            start: 0,
            pos: 0,
            mode: Mode::Header,
            cancel: CancelHandle::default(),
        }
    }

    /// Handle that can stop this lexer, possibly from another thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Stop producing items.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        self.mode = Mode::Done;
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.input[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn back(&mut self, c: char) {
        self.pos -= c.len_utf8();
    }

    fn current(&self) -> &'a str {
        &self.input[self.start..self.pos]
    }

    fn advance(&mut self) {
        self.start = self.pos;
    }

    /// Consume the rest of the line, returning it without `\n` or `\r\n`.
    fn to_eol(&mut self) -> &'a str {
        let rest = &self.input[self.pos..];
        let line = match rest.find('\n') {
            Some(r) => {
                self.pos += r + 1;
                &rest[..r]
            }
            None => {
                self.pos = self.input.len();
                rest
            }
        };
        line.strip_suffix('\r').unwrap_or(line)
    }

    fn error(&mut self, kind: LexErrorKind) -> LexItem<'a> {
        self.mode = Mode::Done;
        LexItem::Error {
            kind,
            context: self.current(),
            offset: self.start,
        }
    }

    fn emit(&mut self, item: LexItem<'a>) -> Option<LexItem<'a>> {
        if self.cancel.is_cancelled() {
            log::trace!("lexer cancelled at offset {}", self.start);
            self.mode = Mode::Done;
            return None;
        }
        log::trace!("lex {:?}", item);
        Some(item)
    }

    fn enter_body(&mut self) {
        log::trace!("lexer: header ends at offset {}", self.pos);
        self.mode = Mode::Body;
    }

    fn lex_header(&mut self) -> Option<LexItem<'a>> {
        self.advance();
        let Some(key) = self.next_char() else {
            self.mode = Mode::Done;
            return None;
        };

        match self.next_char() {
            Some(':') => {}
            Some(other) => {
                self.back(other);
                self.back(key);
                self.enter_body();
                return None;
            }
            None => {
                self.back(key);
                self.enter_body();
                return None;
            }
        }

        let value = self.to_eol();
        Some(LexItem::Field { key, value })
    }

    fn lex_body(&mut self) -> Option<LexItem<'a>> {
        while let Some(c) = self.peek() {
            if !is_ignored(c) {
                break;
            }
            self.next_char();
        }
        self.advance();

        let Some(mut c) = self.next_char() else {
            self.mode = Mode::Done;
            return None;
        };

        let mut accidental = "";
        if is_accidental(c) {
            match self.peek() {
                Some(n) if n == c => {
                    self.next_char();
                }
                Some(n) if is_accidental(n) => {
                    self.next_char();
                    return Some(self.error(LexErrorKind::WrongAccidental));
                }
                _ => {}
            }
            if self.peek().is_none() {
                return Some(self.error(LexErrorKind::UnfinishedNote));
            }
            accidental = self.current();
            self.advance();
            c = self.next_char()?;
        }

        if !is_note(c) {
            return Some(self.error(LexErrorKind::NotANote));
        }
        self.advance();

        while let Some('\'' | ',') = self.peek() {
            self.next_char();
        }
        let octave = self.current();
        self.advance();

        while self.peek().is_some_and(is_rhythm) {
            self.next_char();
        }
        let duration = self.current();
        self.advance();

        Some(LexItem::Note(NoteToken {
            accidental,
            letter: c,
            octave,
            duration,
        }))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = LexItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cancel.is_cancelled() {
            self.mode = Mode::Done;
        }

        while self.mode != Mode::Done {
            let item = match self.mode {
                Mode::Header => self.lex_header(),
                Mode::Body => self.lex_body(),
                Mode::Done => None,
            };
            if let Some(item) = item {
                return self.emit(item);
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

/// 1-based line and column (in characters) of a byte offset.
pub fn line_column(input: &str, offset: usize) -> (usize, usize) {
    let before = &input[..offset.min(input.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

fn is_accidental(c: char) -> bool {
    matches!(c, '^' | '_' | '=')
}

fn is_note(c: char) -> bool {
    matches!(c, 'A'..='G' | 'a'..='g' | 'z')
}

fn is_rhythm(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '/' | '<' | '>')
}

fn is_ignored(c: char) -> bool {
    c.is_whitespace() || c == '[' || c == ']'
}
