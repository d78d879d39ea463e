//! # Chord Types
//!
//! Qualities, inversions, and the input/output shapes of a chord calculation.
//!
//! ## Quality Table
//! | Quality | Offsets from root |
//! |---|---|
//! | major | 0, 4, 7 |
//! | minor | 0, 3, 7 |
//! | diminished | 0, 3, 6 |
//! | augmented | 0, 4, 8 |
//! | maj7 | 0, 4, 7, 11 |
//! | m7 | 0, 3, 7, 10 |
//! | 7 | 0, 4, 7, 10 |
//! | m7b5 | 0, 3, 6, 10 |
//! | dim7 | 0, 3, 6, 9 |
//!
//! ## Inversions
//! An inversion rotates the offset list left. Members rotated off the front
//! come back an octave higher, so the list stays ascending:
//! major first inversion is `[4, 7, 12]`, second is `[7, 12, 16]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChordError;
use crate::pitch::{Pitch, PitchClass, Spelling};

/// Chord quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Major7,
    Minor7,
    Dominant7,
    HalfDiminished7,
    Diminished7,
}

impl ChordQuality {
    pub const TRIADS: [ChordQuality; 4] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
        ChordQuality::Augmented,
    ];

    pub const ALL: [ChordQuality; 9] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
        ChordQuality::Augmented,
        ChordQuality::Major7,
        ChordQuality::Minor7,
        ChordQuality::Dominant7,
        ChordQuality::HalfDiminished7,
        ChordQuality::Diminished7,
    ];

    /// Semitone offsets from the root, ascending
    pub fn offsets(self) -> &'static [i32] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::Major7 => &[0, 4, 7, 11],
            ChordQuality::Minor7 => &[0, 3, 7, 10],
            ChordQuality::Dominant7 => &[0, 4, 7, 10],
            ChordQuality::HalfDiminished7 => &[0, 3, 6, 10],
            ChordQuality::Diminished7 => &[0, 3, 6, 9],
        }
    }

    pub fn voice_count(self) -> usize {
        self.offsets().len()
    }

    pub fn is_triad(self) -> bool {
        self.voice_count() == 3
    }

    /// Whether the chord's third is major.
    ///
    /// Drives the case of Roman numerals: major-third chords are written uppercase.
    pub fn has_major_third(self) -> bool {
        self.offsets()[1] == 4
    }

    /// The triad this quality is built on (7ths drop their 7th).
    pub fn base_triad(self) -> ChordQuality {
        match self {
            ChordQuality::Major7 | ChordQuality::Dominant7 => ChordQuality::Major,
            ChordQuality::Minor7 => ChordQuality::Minor,
            ChordQuality::HalfDiminished7 | ChordQuality::Diminished7 => ChordQuality::Diminished,
            triad => triad,
        }
    }

    /// Inversions this quality can take, in tie-break order.
    pub fn inversions(self) -> &'static [Inversion] {
        if self.is_triad() {
            TRIAD_INVERSIONS
        } else {
            &Inversion::ALL
        }
    }

    /// Short symbol, as written after a chord root (`""`, `"m"`, `"dim"`, ...)
    pub fn symbol(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::Dominant7 => "7",
            ChordQuality::HalfDiminished7 => "m7b5",
            ChordQuality::Diminished7 => "dim7",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
            ChordQuality::Diminished => "diminished",
            ChordQuality::Augmented => "augmented",
            ChordQuality::Major7 => "major7",
            ChordQuality::Minor7 => "minor7",
            ChordQuality::Dominant7 => "dominant7",
            ChordQuality::HalfDiminished7 => "half-diminished7",
            ChordQuality::Diminished7 => "diminished7",
        }
    }
}

impl FromStr for ChordQuality {
    type Err = ChordError;

    /// Accepts full names and the usual chord-symbol spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let quality = match s.trim() {
            "" | "major" | "maj" | "M" => ChordQuality::Major,
            "minor" | "min" | "m" | "-" => ChordQuality::Minor,
            "diminished" | "dim" | "°" | "o" => ChordQuality::Diminished,
            "augmented" | "aug" | "+" => ChordQuality::Augmented,
            "major7" | "maj7" | "M7" => ChordQuality::Major7,
            "minor7" | "m7" | "min7" | "-7" => ChordQuality::Minor7,
            "dominant7" | "7" => ChordQuality::Dominant7,
            "half-diminished7" | "half-diminished" | "m7b5" | "ø" | "ø7" => {
                ChordQuality::HalfDiminished7
            }
            "diminished7" | "dim7" | "°7" | "o7" => ChordQuality::Diminished7,
            other => {
                return Err(ChordError::InvalidChordSpec(format!(
                    "unknown chord quality '{}'",
                    other
                )))
            }
        };
        Ok(quality)
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const TRIAD_INVERSIONS: &[Inversion] = &[Inversion::Root, Inversion::First, Inversion::Second];

/// Which chord member sounds lowest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inversion {
    #[default]
    Root,
    First,
    Second,
    Third,
}

impl Inversion {
    pub const ALL: [Inversion; 4] = [
        Inversion::Root,
        Inversion::First,
        Inversion::Second,
        Inversion::Third,
    ];

    /// 0 = root position, 1 = first inversion, ...
    pub fn from_index(index: u8) -> Result<Self, ChordError> {
        Inversion::ALL
            .get(index as usize)
            .copied()
            .ok_or_else(|| ChordError::InvalidChordSpec(format!("unknown inversion {}", index)))
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Inversion::Root => "root",
            Inversion::First => "first",
            Inversion::Second => "second",
            Inversion::Third => "third",
        }
    }

    /// Rotate `offsets` left by this inversion, lifting rotated members an octave.
    ///
    /// Fails when the chord doesn't have enough members for the inversion.
    pub fn rotate(self, offsets: &[i32]) -> Result<Vec<i32>, ChordError> {
        let shift = self.index();
        if shift >= offsets.len() {
            return Err(ChordError::InvalidChordSpec(format!(
                "{} inversion needs at least {} chord members, got {}",
                self.name(),
                shift + 1,
                offsets.len()
            )));
        }
        Ok(offsets[shift..]
            .iter()
            .copied()
            .chain(offsets[..shift].iter().map(|o| o + 12))
            .collect())
    }
}

impl FromStr for Inversion {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "root" | "0" => Ok(Inversion::Root),
            "first" | "1" => Ok(Inversion::First),
            "second" | "2" => Ok(Inversion::Second),
            "third" | "3" => Ok(Inversion::Third),
            other => Err(ChordError::InvalidChordSpec(format!(
                "unknown inversion '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Inversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything needed for one chord calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordSpec {
    pub root: PitchClass,
    pub quality: ChordQuality,
    pub inversion: Inversion,
    /// Pitch the voicing is placed around. Ignored by the table engine.
    pub reference: Pitch,
    /// How the caller spelled the root, for engines asked to echo it back.
    pub root_spelling: Spelling,
}

impl ChordSpec {
    /// Root-position chord referenced at C4.
    pub fn new(root: PitchClass, quality: ChordQuality) -> Self {
        Self {
            root,
            quality,
            inversion: Inversion::Root,
            reference: Pitch::new(PitchClass::C, 4),
            root_spelling: Spelling::Sharp,
        }
    }

    pub fn with_inversion(mut self, inversion: Inversion) -> Self {
        self.inversion = inversion;
        self
    }

    pub fn with_reference(mut self, reference: Pitch) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_root_spelling(mut self, spelling: Spelling) -> Self {
        self.root_spelling = spelling;
        self
    }

    /// Build from the string forms callers pass around.
    ///
    /// # Example
    /// ```rust
    /// use chordhound::{ChordSpec, Inversion};
    ///
    /// let spec = ChordSpec::parse("Bb", "minor", "first", Some("D4"))?;
    /// assert_eq!(spec.root.name(), "A#");
    /// assert_eq!(spec.inversion, Inversion::First);
    /// # Ok::<(), chordhound::ChordError>(())
    /// ```
    pub fn parse(
        root: &str,
        quality: &str,
        inversion: &str,
        reference: Option<&str>,
    ) -> Result<Self, ChordError> {
        let (root, spelling, _) = PitchClass::parse_spelled(root.trim())?;
        let mut spec = ChordSpec::new(root, quality.parse()?)
            .with_inversion(inversion.parse()?)
            .with_root_spelling(spelling);
        if let Some(reference) = reference {
            spec.reference = reference.parse()?;
        }
        Ok(spec)
    }

    /// Parse a chord symbol such as `"C"`, `"F#m"`, `"Bbmaj7"` or `"Bdim"`.
    pub fn from_symbol(symbol: &str) -> Result<Self, ChordError> {
        let symbol = symbol.trim();
        let root_len = match symbol.as_bytes().get(1) {
            Some(b'#') | Some(b'b') => 2,
            _ => 1,
        };
        if symbol.len() < root_len || !symbol.is_char_boundary(root_len) {
            return Err(ChordError::InvalidChordSpec(format!(
                "unknown chord symbol '{}'",
                symbol
            )));
        }
        let (root, quality) = symbol.split_at(root_len);
        let (root, spelling, _) = PitchClass::parse_spelled(root)?;
        Ok(ChordSpec::new(root, quality.parse()?).with_root_spelling(spelling))
    }

    /// Pitch classes in voicing order (inversion applied), no octave information.
    pub fn pitch_classes(&self) -> Result<Vec<PitchClass>, ChordError> {
        Ok(self
            .inversion
            .rotate(self.quality.offsets())?
            .into_iter()
            .map(|offset| self.root.transpose(offset))
            .collect())
    }
}

/// Output of a chord calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoicedChord {
    pub root: PitchClass,
    pub quality: ChordQuality,
    pub inversion: Inversion,
    /// Bass note an octave below the root, when the engine produces one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bass: Option<Pitch>,
    /// Chord tones, lowest voice first
    pub notes: Vec<Pitch>,
}

impl VoicedChord {
    /// Full sounding sequence: bass first (if any), then the chord tones.
    pub fn pitches(&self) -> Vec<Pitch> {
        self.bass.iter().chain(self.notes.iter()).copied().collect()
    }

    /// Same chord with the bass note removed
    pub fn without_bass(&self) -> VoicedChord {
        VoicedChord {
            bass: None,
            ..self.clone()
        }
    }

    /// Lowest-sounding chord tone, bass excluded
    pub fn lowest_note(&self) -> Option<Pitch> {
        self.notes.iter().copied().min_by_key(Pitch::semitone)
    }

    pub fn note_names(&self) -> Vec<String> {
        self.pitches().iter().map(Pitch::to_string).collect()
    }
}

impl fmt::Display for VoicedChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.note_names().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quality_aliases() {
        assert_eq!("".parse::<ChordQuality>().unwrap(), ChordQuality::Major);
        assert_eq!("m".parse::<ChordQuality>().unwrap(), ChordQuality::Minor);
        assert_eq!("°".parse::<ChordQuality>().unwrap(), ChordQuality::Diminished);
        assert_eq!("+".parse::<ChordQuality>().unwrap(), ChordQuality::Augmented);
        assert_eq!("7".parse::<ChordQuality>().unwrap(), ChordQuality::Dominant7);
        assert_eq!("ø7".parse::<ChordQuality>().unwrap(), ChordQuality::HalfDiminished7);
    }

    #[test]
    fn test_quality_names_parse_back() {
        for quality in ChordQuality::ALL {
            assert_eq!(quality.name().parse::<ChordQuality>().unwrap(), quality);
            assert_eq!(quality.symbol().parse::<ChordQuality>().unwrap(), quality);
        }
    }

    #[test]
    fn test_unknown_quality_is_invalid_spec() {
        let err = "sus13".parse::<ChordQuality>().unwrap_err();
        assert!(matches!(err, ChordError::InvalidChordSpec(_)));
    }

    #[test]
    fn test_rotation() {
        let major = ChordQuality::Major.offsets();
        assert_eq!(Inversion::Root.rotate(major).unwrap(), vec![0, 4, 7]);
        assert_eq!(Inversion::First.rotate(major).unwrap(), vec![4, 7, 12]);
        assert_eq!(Inversion::Second.rotate(major).unwrap(), vec![7, 12, 16]);
        assert!(Inversion::Third.rotate(major).is_err());

        let dom7 = ChordQuality::Dominant7.offsets();
        assert_eq!(Inversion::Third.rotate(dom7).unwrap(), vec![10, 12, 16, 19]);
    }

    #[test]
    fn test_inversion_parsing() {
        assert_eq!("first".parse::<Inversion>().unwrap(), Inversion::First);
        assert_eq!("2".parse::<Inversion>().unwrap(), Inversion::Second);
        assert_eq!(Inversion::from_index(1).unwrap(), Inversion::First);
        assert!(Inversion::from_index(4).is_err());
        assert!(matches!(
            "fourth".parse::<Inversion>(),
            Err(ChordError::InvalidChordSpec(_))
        ));
    }

    #[test]
    fn test_chord_symbols() {
        let spec = ChordSpec::from_symbol("F#m").unwrap();
        assert_eq!(spec.root.name(), "F#");
        assert_eq!(spec.quality, ChordQuality::Minor);

        let spec = ChordSpec::from_symbol("Bbmaj7").unwrap();
        assert_eq!(spec.root.name(), "A#");
        assert_eq!(spec.root_spelling, Spelling::Flat);
        assert_eq!(spec.quality, ChordQuality::Major7);

        let spec = ChordSpec::from_symbol("Bdim").unwrap();
        assert_eq!(spec.root.name(), "B");
        assert_eq!(spec.quality, ChordQuality::Diminished);

        assert!(ChordSpec::from_symbol("Hm").is_err());
        assert!(ChordSpec::from_symbol("").is_err());
    }

    #[test]
    fn test_pitch_classes_follow_inversion() {
        let spec = ChordSpec::from_symbol("C").unwrap().with_inversion(Inversion::First);
        let names: Vec<_> = spec.pitch_classes().unwrap().iter().map(|pc| pc.name()).collect();
        assert_eq!(names, vec!["E", "G", "C"]);
    }

    #[test]
    fn test_voiced_chord_helpers() {
        let chord = VoicedChord {
            root: PitchClass::C,
            quality: ChordQuality::Major,
            inversion: Inversion::Root,
            bass: Some("C3".parse().unwrap()),
            notes: vec!["C4".parse().unwrap(), "E4".parse().unwrap(), "G4".parse().unwrap()],
        };
        assert_eq!(chord.note_names(), vec!["C3", "C4", "E4", "G4"]);
        assert_eq!(chord.lowest_note().unwrap().to_string(), "C4");
        assert_eq!(chord.without_bass().to_string(), "C4 E4 G4");
    }
}
