//! # Roman Numeral Progressions
//!
//! Converts scale-degree progressions (`I IV V`, `ii V7 I`, `i bVII bVI`) into
//! concrete chords in a key, and analyzes concrete chords back into numerals.
//!
//! ## Diatonic Triads
//! | Degree | 1 | 2 | 3 | 4 | 5 | 6 | 7 |
//! |---|---|---|---|---|---|---|---|
//! | major | I | ii | iii | IV | V | vi | vii° |
//! | natural minor | i | ii° | III | iv | v | VI | VII |
//!
//! ## Numeral Grammar
//! `[b|#]<I..VII in any case>[suffix]`
//!
//! - The case of a diatonic numeral is cosmetic: `iv` and `IV` in C major are both F major.
//! - An altered numeral (`bVII`, `#iv`) has no table entry, so its case picks the
//!   triad: uppercase major, lowercase minor.
//! - A suffix overrides the quality: `°`, `+`, `m`, `maj`, `maj7`, `m7`, `dom7`, `ø7`, `°7`.
//!   A bare `7` adds the seventh that fits the triad (major -> dominant 7th,
//!   minor -> minor 7th, diminished -> half-diminished 7th).
//!
//! ## Analysis
//! Each chord's root is measured against the key. Roots off the scale get an
//! accidental: flat of the degree above in major (`bVII`), sharp of the degree
//! below in minor (`#vii`); one semitone above the tonic is `bII` in both modes.
//! Triads come back as the bare degree numeral, uppercase when the third is
//! major: E major in C is `III` and D diminished is `ii`, so out-of-key
//! qualities are approximated rather than rejected. Seventh chords keep the
//! shortest suffix that reads back as the same quality (`V7`, `IVmaj7`).
//!
//! ## Example
//! ```rust
//! use chordhound::progression::{analyze_progression, parse_progression, transpose_progression, Key};
//!
//! let key: Key = "G major".parse()?;
//! let steps = parse_progression("I-IV-V")?;
//! let chords = transpose_progression(key, &steps)?;
//! let names: Vec<String> = chords.iter().map(|c| c.to_string()).collect();
//! assert_eq!(names, vec!["G", "C", "D"]);
//!
//! let numerals: Vec<String> = analyze_progression(&chords, key).iter().map(|s| s.to_string()).collect();
//! assert_eq!(numerals, vec!["I", "IV", "V"]);
//! # Ok::<(), chordhound::ChordError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chord::ChordQuality;
use crate::error::ChordError;
use crate::pitch::{PitchClass, Spelling};

const MAJOR_SCALE: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];
const MINOR_SCALE: [i32; 7] = [0, 2, 3, 5, 7, 8, 10];

const MAJOR_TRIADS: [ChordQuality; 7] = [
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Minor,
    ChordQuality::Major,
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Diminished,
];

const MINOR_TRIADS: [ChordQuality; 7] = [
    ChordQuality::Minor,
    ChordQuality::Diminished,
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Minor,
    ChordQuality::Major,
    ChordQuality::Major,
];

const NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// Major or natural minor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Major,
    Minor,
}

impl Mode {
    /// Semitone offset of each scale degree from the tonic
    pub fn scale(self) -> &'static [i32; 7] {
        match self {
            Mode::Major => &MAJOR_SCALE,
            Mode::Minor => &MINOR_SCALE,
        }
    }

    /// Diatonic triad quality for a degree (1-7)
    pub fn triad_quality(self, degree: u8) -> ChordQuality {
        let table = match self {
            Mode::Major => &MAJOR_TRIADS,
            Mode::Minor => &MINOR_TRIADS,
        };
        table[usize::from(degree.clamp(1, 7) - 1)]
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
        }
    }
}

impl FromStr for Mode {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "major" | "maj" | "ionian" => Ok(Mode::Major),
            "minor" | "min" | "aeolian" => Ok(Mode::Minor),
            other => Err(ChordError::InvalidChordSpec(format!("unknown mode '{}'", other))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tonic plus mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub root: PitchClass,
    pub mode: Mode,
}

impl Key {
    pub fn new(root: PitchClass, mode: Mode) -> Self {
        Self { root, mode }
    }

    /// Build from a root name and a mode name, e.g. `("Bb", "major")`.
    pub fn parse(root: &str, mode: &str) -> Result<Self, ChordError> {
        Ok(Self::new(root.parse()?, mode.parse()?))
    }
}

impl FromStr for Key {
    type Err = ChordError;

    /// Accepts `"G"`, `"Am"`, `"F# minor"`, `"Bb major"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((root, mode)) = s.split_once(char::is_whitespace) {
            return Key::parse(root, mode);
        }
        match s.strip_suffix('m') {
            Some(root) if !root.is_empty() => Ok(Key::new(root.parse()?, Mode::Minor)),
            _ => Ok(Key::new(s.parse()?, Mode::Major)),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.mode)
    }
}

/// Chromatic alteration of a scale degree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alteration {
    Flat,
    Sharp,
}

impl Alteration {
    fn semitones(self) -> i32 {
        match self {
            Alteration::Flat => -1,
            Alteration::Sharp => 1,
        }
    }
}

/// A scale degree written as a Roman numeral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RomanNumeral {
    /// 1 through 7
    pub degree: u8,
    pub alteration: Option<Alteration>,
    pub uppercase: bool,
}

impl RomanNumeral {
    pub fn new(degree: u8, uppercase: bool) -> Result<Self, ChordError> {
        if !(1..=7).contains(&degree) {
            return Err(ChordError::InvalidChordSpec(format!(
                "scale degree {} is outside 1-7",
                degree
            )));
        }
        Ok(Self {
            degree,
            alteration: None,
            uppercase,
        })
    }

    pub fn with_alteration(mut self, alteration: Option<Alteration>) -> Self {
        self.alteration = alteration;
        self
    }

    /// Semitones above the tonic in the given mode
    pub fn semitones(&self, mode: Mode) -> i32 {
        let base = mode.scale()[usize::from(self.degree.clamp(1, 7) - 1)];
        base + self.alteration.map_or(0, Alteration::semitones)
    }

    /// Triad the numeral stands for before any suffix is applied
    pub fn triad(&self, mode: Mode) -> ChordQuality {
        match self.alteration {
            None => mode.triad_quality(self.degree),
            Some(_) if self.uppercase => ChordQuality::Major,
            Some(_) => ChordQuality::Minor,
        }
    }
}

impl fmt::Display for RomanNumeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alteration {
            Some(Alteration::Flat) => f.write_str("b")?,
            Some(Alteration::Sharp) => f.write_str("#")?,
            None => {}
        }
        let numeral = NUMERALS[usize::from(self.degree.clamp(1, 7) - 1)];
        if self.uppercase {
            f.write_str(numeral)
        } else {
            f.write_str(&numeral.to_ascii_lowercase())
        }
    }
}

/// Quality marker written after a numeral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suffix {
    /// `7`: the seventh that fits the numeral's triad
    Seventh,
    /// An explicit quality
    Quality(ChordQuality),
}

impl Suffix {
    fn parse(s: &str) -> Option<Suffix> {
        let suffix = match s {
            "7" => Suffix::Seventh,
            "°" | "o" | "dim" => Suffix::Quality(ChordQuality::Diminished),
            "+" | "aug" => Suffix::Quality(ChordQuality::Augmented),
            "maj" | "M" => Suffix::Quality(ChordQuality::Major),
            "m" | "min" => Suffix::Quality(ChordQuality::Minor),
            "maj7" | "M7" => Suffix::Quality(ChordQuality::Major7),
            "m7" | "min7" => Suffix::Quality(ChordQuality::Minor7),
            "dom7" => Suffix::Quality(ChordQuality::Dominant7),
            "ø" | "ø7" | "m7b5" => Suffix::Quality(ChordQuality::HalfDiminished7),
            "°7" | "o7" | "dim7" => Suffix::Quality(ChordQuality::Diminished7),
            _ => return None,
        };
        Some(suffix)
    }

    fn symbol(self) -> &'static str {
        match self {
            Suffix::Seventh => "7",
            Suffix::Quality(quality) => match quality {
                ChordQuality::Major => "maj",
                ChordQuality::Minor => "m",
                ChordQuality::Diminished => "°",
                ChordQuality::Augmented => "+",
                ChordQuality::Major7 => "maj7",
                ChordQuality::Minor7 => "m7",
                ChordQuality::Dominant7 => "dom7",
                ChordQuality::HalfDiminished7 => "ø7",
                ChordQuality::Diminished7 => "°7",
            },
        }
    }
}

/// One chord of a progression: a numeral and an optional quality override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgressionStep {
    pub numeral: RomanNumeral,
    pub suffix: Option<Suffix>,
}

impl ProgressionStep {
    pub fn new(numeral: RomanNumeral) -> Self {
        Self {
            numeral,
            suffix: None,
        }
    }

    pub fn with_quality(mut self, quality: ChordQuality) -> Self {
        self.suffix = Some(Suffix::Quality(quality));
        self
    }

    /// Chord quality this step stands for in `mode`
    pub fn quality(&self, mode: Mode) -> Result<ChordQuality, ChordError> {
        let triad = self.numeral.triad(mode);
        match self.suffix {
            None => Ok(triad),
            Some(Suffix::Quality(quality)) => Ok(quality),
            Some(Suffix::Seventh) => match triad {
                ChordQuality::Major => Ok(ChordQuality::Dominant7),
                ChordQuality::Minor => Ok(ChordQuality::Minor7),
                ChordQuality::Diminished => Ok(ChordQuality::HalfDiminished7),
                other => Err(ChordError::InvalidChordSpec(format!(
                    "no seventh chord is built on a {} triad",
                    other
                ))),
            },
        }
    }
}

impl FromStr for ProgressionStep {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ChordError::InvalidChordSpec(format!("unknown Roman numeral '{}'", s));
        let input = s.trim();

        let (alteration, rest) = if let Some(rest) = input.strip_prefix('b') {
            (Some(Alteration::Flat), rest)
        } else if let Some(rest) = input.strip_prefix('#') {
            (Some(Alteration::Sharp), rest)
        } else {
            (None, input)
        };

        let split = rest
            .find(|c: char| !matches!(c, 'I' | 'V' | 'i' | 'v'))
            .unwrap_or(rest.len());
        let (letters, suffix) = rest.split_at(split);

        let upper = letters.to_ascii_uppercase();
        let degree = NUMERALS
            .iter()
            .position(|n| *n == upper)
            .ok_or_else(invalid)?;
        let uppercase = letters.starts_with(|c: char| c.is_ascii_uppercase());

        let suffix = match suffix {
            "" => None,
            other => Some(Suffix::parse(other).ok_or_else(invalid)?),
        };

        Ok(ProgressionStep {
            numeral: RomanNumeral::new(degree as u8 + 1, uppercase)?.with_alteration(alteration),
            suffix,
        })
    }
}

impl fmt::Display for ProgressionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.numeral)?;
        if let Some(suffix) = self.suffix {
            f.write_str(suffix.symbol())?;
        }
        Ok(())
    }
}

impl Serialize for ProgressionStep {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A concrete chord produced by transposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgressionChord {
    pub root: PitchClass,
    pub quality: ChordQuality,
}

impl ProgressionChord {
    pub fn new(root: PitchClass, quality: ChordQuality) -> Self {
        Self { root, quality }
    }

    /// Chord symbol with the root spelled as requested (`"Bbm"`)
    pub fn symbol(&self, spelling: Spelling) -> String {
        format!("{}{}", self.root.spelled(spelling), self.quality.symbol())
    }
}

impl fmt::Display for ProgressionChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol(Spelling::Sharp))
    }
}

/// Split `"I-V-vi-IV"`, `"ii V7 I"` or `"I, IV, V"` into steps.
pub fn parse_progression(pattern: &str) -> Result<Vec<ProgressionStep>, ChordError> {
    let steps = pattern
        .split(|c: char| c == '-' || c == ',' || c == '|' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect::<Result<Vec<_>, _>>()?;
    if steps.is_empty() {
        return Err(ChordError::InvalidChordSpec("empty progression".to_string()));
    }
    Ok(steps)
}

/// Turn numerals into concrete chords in `key`.
pub fn transpose_progression(
    key: Key,
    steps: &[ProgressionStep],
) -> Result<Vec<ProgressionChord>, ChordError> {
    steps
        .iter()
        .map(|step| {
            Ok(ProgressionChord::new(
                key.root.transpose(step.numeral.semitones(key.mode)),
                step.quality(key.mode)?,
            ))
        })
        .collect()
}

/// Scale degree and alteration for a root `interval` semitones above the tonic
fn degree_for_interval(interval: i32, mode: Mode) -> (u8, Option<Alteration>) {
    let scale = mode.scale();
    let find = |target: i32| {
        scale
            .iter()
            .position(|&s| s == target.rem_euclid(12))
            .map(|i| i as u8 + 1)
    };

    if let Some(degree) = find(interval) {
        return (degree, None);
    }
    if interval == 1 {
        return (2, Some(Alteration::Flat));
    }
    let altered = match mode {
        Mode::Major => find(interval + 1).map(|d| (d, Some(Alteration::Flat))),
        Mode::Minor => find(interval - 1).map(|d| (d, Some(Alteration::Sharp))),
    };
    // Every chromatic interval has a scale neighbour on the chosen side
    altered.unwrap_or((1, None))
}

/// Label each chord with its Roman numeral in `key`.
///
/// Never fails: chords outside the key are approximated with an altered
/// numeral and an explicit quality suffix rather than rejected.
pub fn analyze_progression(chords: &[ProgressionChord], key: Key) -> Vec<ProgressionStep> {
    chords.iter().map(|chord| analyze_chord(chord, key)).collect()
}

/// Roman numeral for one chord in `key`
pub fn analyze_chord(chord: &ProgressionChord, key: Key) -> ProgressionStep {
    let interval = i32::from(key.root.interval_to(chord.root));
    let (degree, alteration) = degree_for_interval(interval, key.mode);
    let uppercase = chord.quality.has_major_third();
    let numeral = RomanNumeral {
        degree,
        alteration,
        uppercase,
    };

    // Triads are the bare degree numeral, cased by quality
    if chord.quality.is_triad() {
        return ProgressionStep::new(numeral);
    }

    // Sevenths: shortest spelling that reads back as the same quality
    let candidates = [None, Some(Suffix::Seventh), Some(Suffix::Quality(chord.quality))];
    let suffix = candidates
        .into_iter()
        .find(|&suffix| {
            ProgressionStep { numeral, suffix }
                .quality(key.mode)
                .map_or(false, |q| q == chord.quality)
        })
        .flatten();

    ProgressionStep { numeral, suffix }
}
