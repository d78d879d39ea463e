//! Algorithmic chord calculator.
//!
//! ## Algorithm
//! 1. Rotate the quality's offsets for the inversion (`[0, 4, 7]` first inversion -> `[4, 7, 12]`).
//! 2. Place the lowest voice in the octave closest to the reference pitch.
//! 3. Stack the remaining voices above it by their offset differences, so each
//!    voice is the nearest pitch at or above the one below it.
//! 4. Clamp every octave into the playable range.
//! 5. Prepend the bass: the root one octave below the reference octave.
//!
//! Step 4 wins over step 3: near the top of the range a clamped voice can land
//! below the voice under it (`G major` around `F6` gives `G6 B6 D6`).
//!
//! When the lowest voice's pitch class sits a tritone from the reference, both
//! candidates are 6 semitones away and the lower one is taken.

use tracing::trace;

use super::{ChordCalculator, MAX_OCTAVE, MIN_OCTAVE};
use crate::chord::{ChordSpec, VoicedChord};
use crate::config::EngineKind;
use crate::error::ChordError;
use crate::pitch::{Pitch, PitchClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathematicalEngine {
    generate_bass_notes: bool,
    echo_root_spelling: bool,
}

impl Default for MathematicalEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MathematicalEngine {
    /// Engine that emits a bass note and spells everything with sharps.
    pub fn new() -> Self {
        Self {
            generate_bass_notes: true,
            echo_root_spelling: false,
        }
    }

    /// Without a bass note the output has the table engine's shape.
    pub fn with_bass_notes(mut self, enabled: bool) -> Self {
        self.generate_bass_notes = enabled;
        self
    }

    /// Spell the bass and root tones the way the caller spelled the root.
    pub fn with_root_spelling_echo(mut self, enabled: bool) -> Self {
        self.echo_root_spelling = enabled;
        self
    }

    pub fn generates_bass_notes(&self) -> bool {
        self.generate_bass_notes
    }

    fn finish(&self, spec: &ChordSpec, pitch: Pitch) -> Pitch {
        let pitch = pitch.clamp_octave(MIN_OCTAVE, MAX_OCTAVE);
        if self.echo_root_spelling && pitch.class() == spec.root {
            pitch.with_spelling(spec.root_spelling)
        } else {
            pitch
        }
    }
}

/// Semitone number of `class` nearest to `reference`; a tritone tie goes down.
fn closest_semitone(class: PitchClass, reference: &Pitch) -> i32 {
    let up = i32::from(reference.class().interval_to(class));
    let step = if up >= 6 { up - 12 } else { up };
    reference.semitone() + step
}

impl ChordCalculator for MathematicalEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Mathematical
    }

    fn calculate(&self, spec: &ChordSpec) -> Result<VoicedChord, ChordError> {
        let rotated = spec.inversion.rotate(spec.quality.offsets())?;
        let lowest = rotated[0];
        let anchor = closest_semitone(spec.root.transpose(lowest), &spec.reference);

        let notes: Vec<Pitch> = rotated
            .iter()
            .map(|offset| self.finish(spec, Pitch::from_semitone(anchor + offset - lowest)))
            .collect();

        let bass = self.generate_bass_notes.then(|| {
            // Tied to the reference octave, not the voicing: a root placed below
            // the reference doubles the bass in unison
            let octave = spec.reference.octave().saturating_sub(1);
            self.finish(spec, Pitch::new(spec.root, octave))
        });

        trace!(
            root = %spec.root,
            quality = %spec.quality,
            inversion = %spec.inversion,
            reference = %spec.reference,
            "mathematical voicing"
        );

        Ok(VoicedChord {
            root: spec.root,
            quality: spec.quality,
            inversion: spec.inversion,
            bass,
            notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::{ChordQuality, Inversion};
    use crate::pitch::Spelling;
    use pretty_assertions::assert_eq;

    fn names(root: &str, quality: &str, reference: &str, inversion: &str) -> Vec<String> {
        let spec = ChordSpec::parse(root, quality, inversion, Some(reference)).unwrap();
        MathematicalEngine::new().calculate(&spec).unwrap().note_names()
    }

    #[test]
    fn test_root_position_at_reference() {
        assert_eq!(names("C", "major", "C4", "root"), vec!["C3", "C4", "E4", "G4"]);
        assert_eq!(names("B", "diminished", "B3", "root"), vec!["B2", "B3", "D4", "F4"]);
    }

    #[test]
    fn test_first_inversion_puts_root_on_top() {
        assert_eq!(names("C", "major", "E4", "first"), vec!["C3", "E4", "G4", "C5"]);
    }

    #[test]
    fn test_second_inversion() {
        assert_eq!(names("C", "major", "G4", "second"), vec!["C3", "G4", "C5", "E5"]);
    }

    #[test]
    fn test_lowest_voice_goes_to_nearest_octave() {
        // G is 5 below C4 and 7 above it
        assert_eq!(names("G", "major", "C4", "root"), vec!["G3", "G3", "B3", "D4"]);
        // A is 3 below C4
        assert_eq!(names("A", "minor", "C4", "root"), vec!["A3", "A3", "C4", "E4"]);
    }

    #[test]
    fn test_bass_follows_reference_octave() {
        let spec = ChordSpec::parse("G", "major", "root", Some("C4")).unwrap();
        let chord = MathematicalEngine::new().calculate(&spec).unwrap();
        assert_eq!(chord.bass, chord.lowest_note());
        assert_eq!(chord.bass.unwrap().to_string(), "G3");
    }

    #[test]
    fn test_tritone_tie_goes_down() {
        assert_eq!(names("F#", "major", "C4", "root"), vec!["F#3", "F#3", "A#3", "C#4"]);
    }

    #[test]
    fn test_clamping_beats_ascending_order() {
        // D7 would be above the ceiling, so it folds back under B6
        assert_eq!(names("G", "major", "F6", "root"), vec!["G5", "G6", "B6", "D6"]);
    }

    #[test]
    fn test_clamping_at_the_floor() {
        assert_eq!(names("C", "major", "C1", "root"), vec!["C1", "C1", "E1", "G1"]);
        assert_eq!(names("A", "major", "C0", "root"), vec!["A1", "A1", "C#1", "E1"]);
    }

    #[test]
    fn test_extreme_reference_clamps_to_the_ceiling() {
        assert_eq!(names("C", "major", "B127", "root"), vec!["C6", "C6", "E6", "G6"]);
        assert_eq!(names("E", "minor", "C0", "root"), vec!["E1", "E1", "G1", "B1"]);
    }

    #[test]
    fn test_flat_roots_are_spelled_with_sharps() {
        assert_eq!(names("Bb", "major", "Bb3", "root"), vec!["A#2", "A#3", "D4", "F4"]);
    }

    #[test]
    fn test_root_spelling_echo() {
        let spec = ChordSpec::parse("Bb", "major", "root", Some("Bb3")).unwrap();
        let engine = MathematicalEngine::new().with_root_spelling_echo(true);
        let chord = engine.calculate(&spec).unwrap();
        assert_eq!(chord.note_names(), vec!["Bb2", "Bb3", "D4", "F4"]);
        assert_eq!(chord.bass.unwrap().spelling(), Spelling::Flat);
    }

    #[test]
    fn test_without_bass_notes() {
        let engine = MathematicalEngine::new().with_bass_notes(false);
        let spec = ChordSpec::parse("C", "major", "root", Some("C4")).unwrap();
        let chord = engine.calculate(&spec).unwrap();
        assert_eq!(chord.note_names(), vec!["C4", "E4", "G4"]);
    }

    #[test]
    fn test_seventh_chords() {
        assert_eq!(names("G", "7", "G3", "root"), vec!["G2", "G3", "B3", "D4", "F4"]);
        assert_eq!(names("G", "7", "F3", "third"), vec!["G2", "F3", "G3", "B3", "D4"]);
    }

    #[test]
    fn test_third_inversion_of_triad_is_invalid() {
        let spec = ChordSpec::new(PitchClass::C, ChordQuality::Major).with_inversion(Inversion::Third);
        assert!(matches!(
            MathematicalEngine::new().calculate(&spec),
            Err(ChordError::InvalidChordSpec(_))
        ));
    }

    #[test]
    fn test_voices_ascend_inside_the_range() {
        for root in PitchClass::all() {
            for quality in ChordQuality::ALL {
                for &inversion in quality.inversions() {
                    let spec = ChordSpec::new(root, quality).with_inversion(inversion);
                    let chord = MathematicalEngine::new().calculate(&spec).unwrap();
                    let semitones: Vec<i32> = chord.notes.iter().map(Pitch::semitone).collect();
                    assert!(semitones.windows(2).all(|w| w[0] <= w[1]), "{:?}", chord.notes);
                }
            }
        }
    }
}
