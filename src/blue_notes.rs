//! Blue-note overlays.
//!
//! The blue notes of a key are the flattened third, fifth and seventh above
//! its tonic. Callers use the overlay to highlight those notes when they turn
//! up inside a voiced chord.

use serde::Serialize;

use crate::chord::VoicedChord;
use crate::pitch::{Pitch, PitchClass};
use crate::progression::Key;

/// Semitones above the tonic: b3, b5, b7
const BLUE_INTERVALS: [i32; 3] = [3, 6, 10];

/// Blue-note pitch classes of `key`, low to high
pub fn blue_notes(key: Key) -> [PitchClass; 3] {
    BLUE_INTERVALS.map(|interval| key.root.transpose(interval))
}

/// One chord tone and whether it should be highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayNote {
    pub pitch: Pitch,
    pub is_blue: bool,
}

/// Mark each chord tone (bass excluded) that is a blue note of `key`.
pub fn blue_note_overlay(key: Key, chord: &VoicedChord) -> Vec<OverlayNote> {
    let blues = blue_notes(key);
    chord
        .notes
        .iter()
        .map(|&pitch| OverlayNote {
            pitch,
            is_blue: blues.contains(&pitch.class()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::{ChordQuality, ChordSpec};
    use crate::engine::{ChordCalculator, MathematicalEngine};

    #[test]
    fn test_blue_notes_of_c() {
        let names: Vec<_> = blue_notes("C".parse().unwrap()).iter().map(|pc| pc.name()).collect();
        assert_eq!(names, vec!["D#", "F#", "A#"]);
    }

    #[test]
    fn test_mode_does_not_change_blue_notes() {
        assert_eq!(
            blue_notes("A".parse().unwrap()),
            blue_notes("Am".parse().unwrap())
        );
    }

    #[test]
    fn test_overlay_marks_flat_seventh_of_c7() {
        let spec = ChordSpec::new(PitchClass::C, ChordQuality::Dominant7);
        let chord = MathematicalEngine::new().calculate(&spec).unwrap();
        let overlay = blue_note_overlay("C".parse().unwrap(), &chord);

        let flags: Vec<(String, bool)> = overlay
            .iter()
            .map(|n| (n.pitch.to_string(), n.is_blue))
            .collect();
        assert_eq!(
            flags,
            vec![
                ("C4".to_string(), false),
                ("E4".to_string(), false),
                ("G4".to_string(), false),
                ("A#4".to_string(), true),
            ]
        );
    }
}
