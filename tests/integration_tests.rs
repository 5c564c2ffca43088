//! Integration tests for the ABC parser
//!
//! Tests the full pipeline from ABC text to a resolved tune through the public API.

use abc::{
    parse, parse_with_options, AbcError, DurationError, KeySignature, LexErrorKind, LexItem,
    Lexer, Meter, Mode, NoteName, ParseOptions,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_parse_simple_tune() {
    init_logging();
    let tune = parse("T:My song\nC2 _EG c2").unwrap();
    assert_eq!(tune.title, "My song");

    let rendered: Vec<String> = tune.notes.iter().map(|n| n.to_string()).collect();
    assert_eq!(rendered, vec!["C3[16]", "bE3[8]", "G3[8]", "C4[16]"]);
}

#[test]
fn test_parse_empty_source() {
    let tune = parse("").unwrap();
    assert!(tune.title.is_empty());
    assert!(tune.key.is_empty());
    assert!(tune.notes.is_empty());
}

#[test]
fn test_parse_full_header() {
    init_logging();
    let source = "X:1\nT:Speed the Plough\nM:4/4\nL:1/8\nR:reel\nK:G\nGABc dedB|";
    // `|` is not part of the recognized body syntax
    let err = parse(source).unwrap_err();
    assert!(matches!(
        err,
        AbcError::Lexical { kind: LexErrorKind::NotANote, ref context, line: 7, column: 10 } if context == "|"
    ));

    let tune = parse("X:1\nT:Speed the Plough\nM:4/4\nL:1/8\nR:reel\nK:G\nGABc dedB").unwrap();
    assert_eq!(tune.title, "Speed the Plough");
    assert_eq!(tune.meter, Some(Meter { beats: 4, beat_type: 4 }));
    assert_eq!(tune.notes.len(), 8);
    assert_eq!(
        tune.key_signature(),
        Some(KeySignature { fifths: 1, mode: Mode::Major })
    );
    // the key signature is informational only
    assert!(tune.notes.iter().all(|n| n.accidental == 0));
}

#[test]
fn test_parse_chords_as_flat_sequence() {
    let tune = parse("z/8 [c'/4a/4f/4e/4] z/8 [f/8D,/2] z/8").unwrap();
    let names: Vec<NoteName> = tune.notes.iter().map(|n| n.name).collect();
    assert_eq!(
        names,
        vec![
            NoteName::Rest,
            NoteName::C,
            NoteName::A,
            NoteName::F,
            NoteName::E,
            NoteName::Rest,
            NoteName::F,
            NoteName::D,
            NoteName::Rest,
        ]
    );
    assert_eq!(tune.notes[1].octave, 5);
    assert_eq!(tune.notes[1].duration, 16);
    assert_eq!(tune.notes[7].octave, 2);
    assert_eq!(tune.notes[7].duration, 32);
}

#[test]
fn test_first_error_wins() {
    let err = parse("C1/2/3 ^_A").unwrap_err();
    assert_eq!(err, AbcError::Duration(DurationError::Format("1/2/3".to_string())));
}

#[test]
fn test_unfinished_note_error() {
    let err = parse("C D _").unwrap_err();
    assert_eq!(err.to_string(), "at _: unfinished note");
}

#[test]
fn test_options_from_yaml() {
    let options = ParseOptions::from_yaml("unit-denominator: 4\nstrict-headers: true").unwrap();
    let tune = parse_with_options("C", &options).unwrap();
    assert_eq!(tune.notes[0].duration, 16);

    let err = parse_with_options("M:sometimes\nC", &options).unwrap_err();
    assert!(matches!(err, AbcError::Header { key: 'M', .. }));
}

#[test]
fn test_invalid_options_rejected() {
    let options = ParseOptions {
        unit_denominator: 0,
        ..ParseOptions::default()
    };
    assert!(matches!(
        parse_with_options("C", &options),
        Err(AbcError::Config(_))
    ));
}

#[test]
fn test_abandoned_lexer_stops_within_one_token() {
    let source = "C D E F ".repeat(1000);
    let mut lexer = Lexer::new(&source);
    let handle = lexer.cancel_handle();

    let mut seen = 0;
    for item in lexer.by_ref() {
        assert!(matches!(item, LexItem::Note(_)));
        seen += 1;
        if seen == 3 {
            handle.cancel();
        }
    }
    assert_eq!(seen, 3);
    assert_eq!(lexer.next(), None);
}

#[test]
fn test_tune_serializes_to_yaml() {
    let tune = parse("T:Air\nK:D\nd2").unwrap();
    let yaml = tune.to_yaml().unwrap();
    assert!(yaml.contains("title: Air"));
    assert!(yaml.contains("key: D"));
    assert!(yaml.contains("name: D"));
    assert!(yaml.contains("duration: 16"));
}
