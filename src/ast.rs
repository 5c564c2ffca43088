//! # Tune Types
//!
//! This module defines the structures the parser builds from ABC text.
//!
//! ## Type Hierarchy
//! ```text
//! Tune
//!   ├── title: String          (T:)
//!   ├── key: String            (K:, raw)
//!   ├── meter: Option<Meter>   (M:)
//!   ├── unit_denominator: u16  (L:1/N, default 8)
//!   └── Vec<Note>
//!         ├── octave: i32      (3 = octave of unmarked uppercase letters)
//!         ├── name: NoteName   (A-G or Rest)
//!         ├── accidental: i8   (-2 ..= 2)
//!         └── duration: u16    (1/64ths of the reference unit)
//! ```
//!
//! ## Key Concepts
//!
//! ### Octaves
//! - `C D E F G A B` are octave 3, `c d e f g a b` octave 4
//! - Each `'` raises by one octave, each `,` lowers by one
//! - Example: `a'` is octave 5, `A,,` is octave 1
//!
//! ### Accidentals
//! - `__` = -2, `_` = -1, `=` = 0, `^` = 1, `^^` = 2
//! - A note without an accidental also gets 0; the key signature is NOT applied
//!
//! ### Duration
//! - `64 * numerator / denominator`, where the denominator defaults to the
//!   tune's unit denominator
//! - Example: with the default unit 1/8, `C` is 8, `C2` is 16, `C/2` is 32

use serde::Serialize;
use std::fmt;

/// Default reference subdivision: an unmarked note is 1/8.
pub const DEFAULT_UNIT_DENOMINATOR: u16 = 8;

/// Octave of an uppercase letter with no octave markers.
pub const BASE_OCTAVE: i32 = 3;

/// A parsed tune
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tune {
    pub title: String,
    /// Raw `K:` value, stored verbatim
    pub key: String,
    pub meter: Option<Meter>,
    /// Denominator applied to durations without an explicit one
    pub unit_denominator: u16,
    pub notes: Vec<Note>,
}

impl Default for Tune {
    fn default() -> Self {
        Self {
            title: String::new(),
            key: String::new(),
            meter: None,
            unit_denominator: DEFAULT_UNIT_DENOMINATOR,
            notes: Vec::new(),
        }
    }
}

impl Tune {
    /// Interpret the raw `K:` value. This is informational only: note
    /// accidentals are never derived from it.
    pub fn key_signature(&self) -> Option<KeySignature> {
        KeySignature::from_str(&self.key)
    }

    /// Render the tune as YAML
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Meter from an `M:` field (e.g., 4/4, 3/4, 6/8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Meter {
    pub beats: u8,
    pub beat_type: u8,
}

impl Meter {
    /// Parse `n/d`, `C` (common time) or `C|` (cut time).
    /// `none` and the empty string mean "no meter" and yield `Ok(None)`.
    pub fn parse(s: &str) -> Result<Option<Self>, String> {
        let trimmed = s.trim();
        match trimmed {
            "" | "none" => return Ok(None),
            "C" => return Ok(Some(Self { beats: 4, beat_type: 4 })),
            "C|" => return Ok(Some(Self { beats: 2, beat_type: 2 })),
            _ => {}
        }

        let parts: Vec<&str> = trimmed.split('/').collect();
        if parts.len() != 2 {
            return Err(format!("Invalid meter: {}", trimmed));
        }

        let beats = parts[0]
            .trim()
            .parse()
            .map_err(|_| format!("Invalid meter beats: {}", trimmed))?;
        let beat_type = parts[1]
            .trim()
            .parse()
            .map_err(|_| format!("Invalid meter beat type: {}", trimmed))?;
        if beats == 0 || beat_type == 0 {
            return Err(format!("Invalid meter: {}", trimmed));
        }

        Ok(Some(Self { beats, beat_type }))
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.beats, self.beat_type)
    }
}

/// Note names A through G, or a rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoteName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
    Rest,
}

impl NoteName {
    /// Map an uppercase letter or `z`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(NoteName::C),
            'D' => Some(NoteName::D),
            'E' => Some(NoteName::E),
            'F' => Some(NoteName::F),
            'G' => Some(NoteName::G),
            'A' => Some(NoteName::A),
            'B' => Some(NoteName::B),
            'z' => Some(NoteName::Rest),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            NoteName::C => 'C',
            NoteName::D => 'D',
            NoteName::E => 'E',
            NoteName::F => 'F',
            NoteName::G => 'G',
            NoteName::A => 'A',
            NoteName::B => 'B',
            NoteName::Rest => 'z',
        }
    }
}

/// A resolved note or rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Note {
    pub octave: i32,
    pub name: NoteName,
    pub accidental: i8,
    pub duration: u16,
}

impl Note {
    pub fn is_rest(&self) -> bool {
        self.name == NoteName::Rest
    }
}

/// Printed form of an accidental level: ß (double flat), b, "", #, x (double sharp)
pub fn accidental_symbol(level: i8) -> &'static str {
    match level {
        -2 => "ß",
        -1 => "b",
        1 => "#",
        2 => "x",
        _ => "",
    }
}

impl fmt::Display for Note {
    /// `bE3[8]`: accidental, name, octave, then duration in brackets
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}[{}]",
            accidental_symbol(self.accidental),
            self.name.as_char(),
            self.octave,
            self.duration
        )
    }
}

/// Mode for key signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Mode {
    #[default]
    Major,
    Minor,
}

/// Key signature (number of sharps/flats)
/// Positive = sharps, Negative = flats, Zero = C major / A minor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct KeySignature {
    pub fifths: i8, // -7 to +7 (flats to sharps)
    pub mode: Mode,
}

impl KeySignature {
    /// Parse an ABC key like "G", "Bb", "F#m", "Dmin" or "Ebmaj".
    /// Anything after the first whitespace (clef, transposition) is ignored.
    pub fn from_str(s: &str) -> Option<Self> {
        let key = s.split_whitespace().next()?;

        let mut chars = key.chars();
        let mut split = chars.next()?.len_utf8();
        if let Some(c @ ('#' | 'b')) = chars.next() {
            split += c.len_utf8();
        }
        let (tonic, mode_str) = key.split_at(split);

        let mode = match mode_str.to_ascii_lowercase().as_str() {
            "" | "maj" | "major" => Mode::Major,
            "m" | "min" | "minor" => Mode::Minor,
            _ => return None,
        };

        let fifths = match (mode, tonic) {
            (Mode::Major, "C") | (Mode::Minor, "A") => 0,
            (Mode::Major, "G") | (Mode::Minor, "E") => 1,
            (Mode::Major, "D") | (Mode::Minor, "B") => 2,
            (Mode::Major, "A") | (Mode::Minor, "F#") => 3,
            (Mode::Major, "E") | (Mode::Minor, "C#") => 4,
            (Mode::Major, "B") | (Mode::Minor, "G#") => 5,
            (Mode::Major, "F#") | (Mode::Minor, "D#") => 6,
            (Mode::Major, "C#") | (Mode::Minor, "A#") => 7,
            (Mode::Major, "F") | (Mode::Minor, "D") => -1,
            (Mode::Major, "Bb") | (Mode::Minor, "G") => -2,
            (Mode::Major, "Eb") | (Mode::Minor, "C") => -3,
            (Mode::Major, "Ab") | (Mode::Minor, "F") => -4,
            (Mode::Major, "Db") | (Mode::Minor, "Bb") => -5,
            (Mode::Major, "Gb") | (Mode::Minor, "Eb") => -6,
            (Mode::Major, "Cb") | (Mode::Minor, "Ab") => -7,
            _ => return None,
        };

        Some(Self { fifths, mode })
    }
}
