//! Table-driven ("legacy") chord calculator.
//!
//! Looks up three semitone offsets per quality and a fixed voicing per
//! inversion. Every chord is built from octave 4; there is no reference pitch
//! and no bass note.

use tracing::trace;

use super::ChordCalculator;
use crate::chord::{ChordQuality, ChordSpec, Inversion, VoicedChord};
use crate::config::EngineKind;
use crate::error::ChordError;
use crate::pitch::Pitch;

const BASE_OCTAVE: i32 = 4;

/// Triad offsets from the root
fn triad_offsets(quality: ChordQuality) -> Option<[i32; 3]> {
    match quality {
        ChordQuality::Major => Some([0, 4, 7]),
        ChordQuality::Minor => Some([0, 3, 7]),
        ChordQuality::Diminished => Some([0, 3, 6]),
        ChordQuality::Augmented => Some([0, 4, 8]),
        _ => None,
    }
}

/// (chord member, octave bump) for each voice, lowest voice first
fn voicing(inversion: Inversion) -> Option<[(usize, i32); 3]> {
    match inversion {
        Inversion::Root => Some([(0, 0), (1, 0), (2, 0)]),
        Inversion::First => Some([(1, 0), (2, 0), (0, 1)]),
        Inversion::Second => Some([(2, 0), (0, 1), (1, 1)]),
        Inversion::Third => None,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableEngine;

impl ChordCalculator for TableEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Legacy
    }

    fn calculate(&self, spec: &ChordSpec) -> Result<VoicedChord, ChordError> {
        let offsets = triad_offsets(spec.quality).ok_or_else(|| {
            ChordError::InvalidChordSpec(format!(
                "the table engine has no entry for {} chords",
                spec.quality
            ))
        })?;
        let voicing = voicing(spec.inversion).ok_or_else(|| {
            ChordError::InvalidChordSpec(format!(
                "the table engine has no {} inversion",
                spec.inversion
            ))
        })?;

        let base = BASE_OCTAVE * 12 + i32::from(spec.root.index());
        let notes: Vec<Pitch> = voicing
            .iter()
            .map(|&(member, bump)| Pitch::from_semitone(base + offsets[member] + bump * 12))
            .collect();

        trace!(root = %spec.root, quality = %spec.quality, inversion = %spec.inversion, "table voicing");

        Ok(VoicedChord {
            root: spec.root,
            quality: spec.quality,
            inversion: spec.inversion,
            bass: None,
            notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::PitchClass;
    use pretty_assertions::assert_eq;

    fn names(root: &str, quality: &str, inversion: &str) -> Vec<String> {
        let spec = ChordSpec::parse(root, quality, inversion, None).unwrap();
        TableEngine.calculate(&spec).unwrap().note_names()
    }

    #[test]
    fn test_c_major_inversions() {
        assert_eq!(names("C", "major", "root"), vec!["C4", "E4", "G4"]);
        assert_eq!(names("C", "major", "first"), vec!["E4", "G4", "C5"]);
        assert_eq!(names("C", "major", "second"), vec!["G4", "C5", "E5"]);
    }

    #[test]
    fn test_chords_crossing_the_octave() {
        assert_eq!(names("A", "minor", "root"), vec!["A4", "C5", "E5"]);
        assert_eq!(names("B", "diminished", "root"), vec!["B4", "D5", "F5"]);
    }

    #[test]
    fn test_reference_is_ignored() {
        let spec = ChordSpec::new(PitchClass::C, ChordQuality::Major);
        let high = spec.with_reference("G6".parse().unwrap());
        assert_eq!(
            TableEngine.calculate(&spec).unwrap(),
            TableEngine.calculate(&high).unwrap()
        );
    }

    #[test]
    fn test_sevenths_and_third_inversion_are_rejected() {
        let seventh = ChordSpec::new(PitchClass::C, ChordQuality::Dominant7);
        assert!(matches!(
            TableEngine.calculate(&seventh),
            Err(ChordError::InvalidChordSpec(_))
        ));

        let third = ChordSpec::new(PitchClass::C, ChordQuality::Major).with_inversion(Inversion::Third);
        assert!(matches!(
            TableEngine.calculate(&third),
            Err(ChordError::InvalidChordSpec(_))
        ));
    }

    #[test]
    fn test_always_three_notes_without_bass() {
        for root in PitchClass::all() {
            for quality in ChordQuality::TRIADS {
                let chord = TableEngine.calculate(&ChordSpec::new(root, quality)).unwrap();
                assert_eq!(chord.notes.len(), 3);
                assert!(chord.bass.is_none());
            }
        }
    }
}
