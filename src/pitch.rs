//! # Pitches and Pitch Classes
//!
//! A [`PitchClass`] is one of the twelve semitones, stored as an index from C
//! (0 = C, 1 = C#, ... 11 = B). A [`Pitch`] is a pitch class placed in an octave.
//!
//! ## String Format
//! `<PitchClass><Octave>` where the pitch class is a letter `A`-`G` optionally
//! followed by `#` or `b`, and the octave is a non-negative integer:
//! `"C4"`, `"F#3"`, `"Bb3"`.
//!
//! Flats are accepted on input and normalized to the sharp index for arithmetic.
//! The spelling that was read is remembered, so a parsed pitch displays the way
//! it was written. Computed pitches are always spelled with sharps.
//!
//! Octave numbers follow scientific pitch notation: `Cb4` is the B just below
//! C4, so it parses to B3. `B#3` parses to C4.
//!
//! ## Example
//! ```rust
//! use chordhound::Pitch;
//!
//! let pitch: Pitch = "Bb3".parse()?;
//! assert_eq!(pitch.class().name(), "A#");
//! assert_eq!(pitch.to_string(), "Bb3");
//! assert_eq!(pitch.midi_number(), 58);
//! # Ok::<(), chordhound::ChordError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ChordError;

/// Canonical sharp spellings, indexed by semitone from C
const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Flat spellings, indexed by semitone from C
const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Which accidental a black key is spelled with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spelling {
    #[default]
    Sharp,
    Flat,
}

/// One of the twelve pitch classes, as a semitone index from C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);

    /// Build from any semitone count; wraps into 0..12.
    pub fn from_semitone(semitone: i32) -> Self {
        PitchClass(semitone.rem_euclid(12) as u8)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self::from_semitone(i32::from(self.0) + semitones)
    }

    /// Ascending interval from `self` up to `other`, in 0..12.
    pub fn interval_to(self, other: PitchClass) -> u8 {
        (i32::from(other.0) - i32::from(self.0)).rem_euclid(12) as u8
    }

    /// Canonical (sharp) name
    pub fn name(self) -> &'static str {
        SHARP_NAMES[self.0 as usize]
    }

    pub fn spelled(self, spelling: Spelling) -> &'static str {
        match spelling {
            Spelling::Sharp => SHARP_NAMES[self.0 as usize],
            Spelling::Flat => FLAT_NAMES[self.0 as usize],
        }
    }

    /// All twelve pitch classes from C upwards
    pub fn all() -> impl Iterator<Item = PitchClass> {
        (0..12).map(PitchClass)
    }

    /// Parse a bare note name and report how it was spelled.
    ///
    /// The third element is the octave carry for enharmonics that cross C
    /// (`Cb` is -1, `B#` is +1).
    pub fn parse_spelled(input: &str) -> Result<(PitchClass, Spelling, i8), ChordError> {
        let invalid = || ChordError::InvalidPitchFormat(input.to_string());
        let mut chars = input.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let base: i32 = match letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(invalid()),
        };
        let rest = chars.as_str();
        let (offset, spelling) = match rest {
            "" => (0, Spelling::Sharp),
            "#" => (1, Spelling::Sharp),
            "b" => (-1, Spelling::Flat),
            _ => return Err(invalid()),
        };

        let semitone = base + offset;
        let class = PitchClass::from_semitone(semitone);
        // Cb and Fb land on naturals, which have only one spelling
        let spelling = if class.spelled(Spelling::Flat) == class.spelled(Spelling::Sharp) {
            Spelling::Sharp
        } else {
            spelling
        };
        let carry = if semitone < 0 {
            -1
        } else if semitone >= 12 {
            1
        } else {
            0
        };
        Ok((class, spelling, carry))
    }
}

impl FromStr for PitchClass {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PitchClass::parse_spelled(s.trim()).map(|(class, _, _)| class)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for PitchClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for PitchClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// A pitch class in a specific octave (C4 = middle C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    class: PitchClass,
    octave: i8,
    spelling: Spelling,
}

impl Pitch {
    pub fn new(class: PitchClass, octave: i8) -> Self {
        Self {
            class,
            octave,
            spelling: Spelling::Sharp,
        }
    }

    /// Pitch for an absolute semitone number (`octave * 12 + class`).
    ///
    /// Octaves outside the `i8` range saturate.
    pub fn from_semitone(semitone: i32) -> Self {
        let octave = semitone
            .div_euclid(12)
            .clamp(i32::from(i8::MIN), i32::from(i8::MAX));
        Self::new(PitchClass::from_semitone(semitone), octave as i8)
    }

    pub fn with_spelling(mut self, spelling: Spelling) -> Self {
        self.spelling = spelling;
        self
    }

    pub fn class(&self) -> PitchClass {
        self.class
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    pub fn spelling(&self) -> Spelling {
        self.spelling
    }

    /// Absolute semitone number: `octave * 12 + class`. C0 = 0.
    pub fn semitone(&self) -> i32 {
        i32::from(self.octave) * 12 + i32::from(self.class.index())
    }

    /// MIDI note number (C4 = 60)
    pub fn midi_number(&self) -> i32 {
        self.semitone() + 12
    }

    /// Absolute distance in semitones
    pub fn distance(&self, other: &Pitch) -> u32 {
        (self.semitone() - other.semitone()).unsigned_abs()
    }

    /// Same pitch class and spelling, octave forced into `min..=max`.
    pub fn clamp_octave(self, min: i8, max: i8) -> Self {
        Self {
            octave: self.octave.clamp(min, max),
            ..self
        }
    }
}

impl FromStr for Pitch {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ChordError::InvalidPitchFormat(s.to_string());
        let trimmed = s.trim();

        let split = trimmed
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (name, digits) = trimmed.split_at(split);
        if name.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let (class, spelling, carry) = PitchClass::parse_spelled(name).map_err(|_| invalid())?;
        let written: i8 = digits.parse().map_err(|_| invalid())?;
        let octave = written.checked_add(carry).ok_or_else(invalid)?;

        Ok(Pitch {
            class,
            octave,
            spelling,
        })
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class.spelled(self.spelling), self.octave)
    }
}

impl Serialize for Pitch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pitch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
