//! Integration tests for Roman numeral transposition and analysis
//!
//! Common progressions must survive a transpose-then-analyze round trip in
//! every key.

use chordhound::progression::{analyze_progression, parse_progression, transpose_progression};
use chordhound::{Key, Mode, PitchClass, ProgressionChord};
use pretty_assertions::assert_eq;

fn round_trip(key: Key, pattern: &str) -> Vec<String> {
    let steps = parse_progression(pattern).unwrap();
    let chords = transpose_progression(key, &steps).unwrap();
    analyze_progression(&chords, key)
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn words(pattern: &str) -> Vec<String> {
    pattern.split_whitespace().map(str::to_string).collect()
}

#[test]
fn test_major_progressions_round_trip_in_every_key() {
    let patterns = ["I IV V", "I V vi IV", "I vi IV V", "ii V I"];
    for root in PitchClass::all() {
        let key = Key::new(root, Mode::Major);
        for pattern in patterns {
            assert_eq!(round_trip(key, pattern), words(pattern), "{} in {}", pattern, key);
        }
    }
}

#[test]
fn test_minor_progressions_round_trip_in_every_key() {
    for root in PitchClass::all() {
        let key = Key::new(root, Mode::Minor);
        assert_eq!(round_trip(key, "i iv v"), words("i iv v"), "in {}", key);
        assert_eq!(round_trip(key, "i VI III VII"), words("i VI III VII"), "in {}", key);
    }
}

#[test]
fn test_g_major_one_four_five() {
    let chords = chordhound::transpose("G", "major", &["I", "IV", "V"]).unwrap();
    let expected = vec![
        ProgressionChord::new("G".parse().unwrap(), chordhound::ChordQuality::Major),
        ProgressionChord::new("C".parse().unwrap(), chordhound::ChordQuality::Major),
        ProgressionChord::new("D".parse().unwrap(), chordhound::ChordQuality::Major),
    ];
    assert_eq!(chords, expected);
}

#[test]
fn test_numeral_case_is_cosmetic_for_diatonic_chords() {
    let key: Key = "C".parse().unwrap();
    let shouted = transpose_progression(key, &parse_progression("I II III").unwrap()).unwrap();
    let quiet = transpose_progression(key, &parse_progression("i ii iii").unwrap()).unwrap();
    assert_eq!(shouted, quiet);
    let names: Vec<String> = shouted.iter().map(ToString::to_string).collect();
    assert_eq!(names, vec!["C", "Dm", "Em"]);
}

#[test]
fn test_separators_are_interchangeable() {
    let key: Key = "D".parse().unwrap();
    let dashed = transpose_progression(key, &parse_progression("I-V-vi-IV").unwrap()).unwrap();
    let barred = transpose_progression(key, &parse_progression("I | V | vi | IV").unwrap()).unwrap();
    let commas = transpose_progression(key, &parse_progression("I, V, vi, IV").unwrap()).unwrap();
    assert_eq!(dashed, barred);
    assert_eq!(dashed, commas);
}

#[test]
fn test_borrowed_chords_are_approximated_not_rejected() {
    let key: Key = "C".parse().unwrap();
    let chords = vec![
        ProgressionChord::new("C".parse().unwrap(), chordhound::ChordQuality::Major),
        ProgressionChord::new("F".parse().unwrap(), chordhound::ChordQuality::Minor),
        ProgressionChord::new("Bb".parse().unwrap(), chordhound::ChordQuality::Major),
        ProgressionChord::new("C".parse().unwrap(), chordhound::ChordQuality::Major),
    ];
    let numerals: Vec<String> = analyze_progression(&chords, key)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(numerals, vec!["I", "iv", "bVII", "I"]);
}

#[test]
fn test_out_of_key_triads_keep_the_degree_numeral() {
    let numerals = chordhound::analyze("C", "major", &["E", "Ddim", "Fm", "Aaug"]).unwrap();
    assert_eq!(numerals, vec!["III", "ii", "iv", "VI"]);
}

#[test]
fn test_string_level_analysis() {
    let numerals = chordhound::analyze("C", "major", &["Dm", "G7", "C"]).unwrap();
    assert_eq!(numerals, vec!["ii", "V7", "I"]);
}

#[test]
fn test_unknown_numeral_is_invalid() {
    assert!(matches!(
        parse_progression("I IIX V"),
        Err(chordhound::ChordError::InvalidChordSpec(_))
    ));
}
