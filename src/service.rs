//! # Chord Service
//!
//! The facade callers talk to. It owns the engine chosen at construction and
//! exposes note calculation, progression transposition and analysis, and
//! voice-leading inversion selection.
//!
//! ## Engine Selection
//! The engine comes from [`ChordConfig::engine`] once, in [`ChordService::new`].
//! A service never switches engines; build a new one to pick up a changed
//! configuration.
//!
//! ## Example
//! ```rust
//! use chordhound::{ChordConfig, ChordQuality, ChordService, EngineKind, Inversion, PitchClass};
//!
//! let service = ChordService::new(ChordConfig {
//!     engine: EngineKind::Mathematical,
//!     ..ChordConfig::default()
//! });
//! let notes = service.chord_notes_for_display(PitchClass::C, ChordQuality::Major, Inversion::Root)?;
//! let names: Vec<String> = notes.iter().map(|p| p.to_string()).collect();
//! assert_eq!(names, vec!["C4", "E4", "G4"]);
//! # Ok::<(), chordhound::ChordError>(())
//! ```

use tracing::debug;

use crate::blue_notes::{self, OverlayNote};
use crate::chord::{ChordQuality, ChordSpec, Inversion, VoicedChord};
use crate::config::{ChordConfig, EngineKind};
use crate::engine::{Calculator, ChordCalculator};
use crate::error::ChordError;
use crate::pitch::{Pitch, PitchClass};
use crate::progression::{self, Key, ProgressionChord, ProgressionStep};
use crate::voice_leading;

#[derive(Debug, Clone)]
pub struct ChordService {
    calculator: Calculator,
    config: ChordConfig,
}

impl Default for ChordService {
    fn default() -> Self {
        Self::new(ChordConfig::default())
    }
}

impl ChordService {
    pub fn new(config: ChordConfig) -> Self {
        let calculator = Calculator::from_config(&config);
        debug!(
            engine = calculator.kind().name(),
            auto_voice_leading = config.auto_voice_leading,
            generate_bass_notes = config.generate_bass_notes,
            "chord service ready"
        );
        Self { calculator, config }
    }

    /// Service for a raw engine setting; unrecognized names give the legacy engine.
    pub fn from_setting(value: &str) -> Self {
        Self::new(ChordConfig::with_engine_setting(value))
    }

    pub fn engine(&self) -> EngineKind {
        self.calculator.kind()
    }

    pub fn config(&self) -> &ChordConfig {
        &self.config
    }

    /// Pitch classes of a chord in voicing order, without octaves.
    ///
    /// Doesn't touch the engine, so the answer is the same whichever one is selected.
    pub fn chord_notes(
        &self,
        root: PitchClass,
        quality: ChordQuality,
        inversion: Inversion,
    ) -> Result<Vec<PitchClass>, ChordError> {
        ChordSpec::new(root, quality)
            .with_inversion(inversion)
            .pitch_classes()
    }

    /// Octave-qualified chord tones from the selected engine, bass removed.
    ///
    /// The mathematical engine is referenced at C4.
    pub fn chord_notes_for_display(
        &self,
        root: PitchClass,
        quality: ChordQuality,
        inversion: Inversion,
    ) -> Result<Vec<Pitch>, ChordError> {
        let spec = ChordSpec::new(root, quality).with_inversion(inversion);
        Ok(self.calculate(&spec)?.notes)
    }

    /// Full voicing from the selected engine, bass included when it makes one.
    pub fn calculate(&self, spec: &ChordSpec) -> Result<VoicedChord, ChordError> {
        self.calculator.calculate(spec)
    }

    pub fn transpose_progression(
        &self,
        key: Key,
        steps: &[ProgressionStep],
    ) -> Result<Vec<ProgressionChord>, ChordError> {
        progression::transpose_progression(key, steps)
    }

    pub fn analyze_progression(&self, chords: &[ProgressionChord], key: Key) -> Vec<ProgressionStep> {
        progression::analyze_progression(chords, key)
    }

    /// Inversion of the next chord that moves least from `current`.
    ///
    /// Candidates are voiced by this service's engine.
    pub fn calculate_optimal_inversion(
        &self,
        current: &VoicedChord,
        next_root: PitchClass,
        next_quality: ChordQuality,
    ) -> Result<Inversion, ChordError> {
        voice_leading::optimal_inversion_with(&self.calculator, current, next_root, next_quality)
            .map(|c| c.inversion)
    }

    /// Transpose a progression and voice every chord.
    ///
    /// The first chord is root position around `reference`. With
    /// `auto_voice_leading` on, each later chord takes the inversion that moves
    /// least from the chord before it, voiced by this service's engine around
    /// that chord's lowest note; chords with different voice counts then fail with
    /// [`ChordError::IncompatibleVoicing`]. With it off, every chord is root
    /// position around `reference`.
    pub fn voice_progression(
        &self,
        key: Key,
        steps: &[ProgressionStep],
        reference: Pitch,
    ) -> Result<Vec<VoicedChord>, ChordError> {
        let chords = self.transpose_progression(key, steps)?;
        let mut voiced: Vec<VoicedChord> = Vec::with_capacity(chords.len());

        for chord in chords {
            let next = match voiced.last().filter(|_| self.config.auto_voice_leading) {
                Some(previous) => {
                    voice_leading::optimal_inversion_with(
                        &self.calculator,
                        previous,
                        chord.root,
                        chord.quality,
                    )?
                    .voicing
                }
                None => self.calculate(
                    &ChordSpec::new(chord.root, chord.quality).with_reference(reference),
                )?,
            };
            voiced.push(next);
        }

        Ok(voiced)
    }

    pub fn blue_note_overlay(&self, key: Key, chord: &VoicedChord) -> Vec<OverlayNote> {
        blue_notes::blue_note_overlay(key, chord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn service(engine: EngineKind) -> ChordService {
        ChordService::new(ChordConfig {
            engine,
            ..ChordConfig::default()
        })
    }

    #[test]
    fn test_engine_is_fixed_at_construction() {
        let mut config = ChordConfig::with_engine_setting("mathematical");
        let service = ChordService::new(config.clone());
        config.engine = EngineKind::Legacy;
        assert_eq!(service.engine(), EngineKind::Mathematical);
        assert_eq!(ChordService::new(config).engine(), EngineKind::Legacy);
    }

    #[test]
    fn test_chord_notes_ignore_engine() {
        let g = PitchClass::from_semitone(7);
        let legacy = service(EngineKind::Legacy)
            .chord_notes(g, ChordQuality::Major, Inversion::Second)
            .unwrap();
        let math = service(EngineKind::Mathematical)
            .chord_notes(g, ChordQuality::Major, Inversion::Second)
            .unwrap();
        assert_eq!(legacy, math);
        let names: Vec<_> = legacy.iter().map(|pc| pc.name()).collect();
        assert_eq!(names, vec!["D", "G", "B"]);
    }

    #[test]
    fn test_display_notes_strip_bass() {
        let notes = service(EngineKind::Mathematical)
            .chord_notes_for_display(PitchClass::C, ChordQuality::Major, Inversion::Root)
            .unwrap();
        assert_eq!(notes.len(), 3);

        let full = service(EngineKind::Mathematical)
            .calculate(&ChordSpec::new(PitchClass::C, ChordQuality::Major))
            .unwrap();
        assert_eq!(full.pitches().len(), 4);
    }

    #[test]
    fn test_bass_toggle_reaches_engine() {
        let service = ChordService::new(ChordConfig {
            engine: EngineKind::Mathematical,
            generate_bass_notes: false,
            ..ChordConfig::default()
        });
        let chord = service
            .calculate(&ChordSpec::new(PitchClass::C, ChordQuality::Major))
            .unwrap();
        assert_eq!(chord.note_names(), vec!["C4", "E4", "G4"]);
    }

    #[test]
    fn test_optimal_inversion_through_service() {
        let service = service(EngineKind::Mathematical);
        let current = service
            .calculate(&ChordSpec::new(PitchClass::C, ChordQuality::Major))
            .unwrap();
        let inversion = service
            .calculate_optimal_inversion(&current, PitchClass::from_semitone(7), ChordQuality::Major)
            .unwrap();
        assert_eq!(inversion, Inversion::First);
    }

    #[test]
    fn test_voice_progression_with_voice_leading() {
        let service = service(EngineKind::Mathematical);
        let steps = progression::parse_progression("I IV V I").unwrap();
        let voiced = service
            .voice_progression("C".parse().unwrap(), &steps, "C4".parse().unwrap())
            .unwrap();
        let names: Vec<String> = voiced.iter().map(|c| c.without_bass().to_string()).collect();
        assert_eq!(names, vec!["C4 E4 G4", "C4 F4 A4", "B3 D4 G4", "C4 E4 G4"]);
    }

    #[test]
    fn test_legacy_voice_leading_never_moves_more_than_root_position() {
        let leading = service(EngineKind::Legacy);
        let plain = ChordService::new(ChordConfig {
            auto_voice_leading: false,
            ..ChordConfig::default()
        });
        let steps = progression::parse_progression("I V vi IV").unwrap();
        let key: Key = "C".parse().unwrap();
        let reference: Pitch = "C4".parse().unwrap();

        let led = leading.voice_progression(key, &steps, reference).unwrap();
        let root = plain.voice_progression(key, &steps, reference).unwrap();
        assert_eq!(led[1].to_string(), "G4 B4 D5");

        for i in 1..led.len() {
            let moved = voice_leading::voice_leading_distance(&led[i - 1].notes, &led[i].notes).unwrap();
            let naive = voice_leading::voice_leading_distance(&led[i - 1].notes, &root[i].notes).unwrap();
            assert!(moved <= naive, "{} -> {}", led[i - 1], led[i]);
        }
    }

    #[test]
    fn test_voice_progression_without_voice_leading() {
        let service = ChordService::new(ChordConfig {
            engine: EngineKind::Mathematical,
            auto_voice_leading: false,
            ..ChordConfig::default()
        });
        let steps = progression::parse_progression("I IV V").unwrap();
        let voiced = service
            .voice_progression("C".parse().unwrap(), &steps, "C4".parse().unwrap())
            .unwrap();
        assert!(voiced.iter().all(|c| c.inversion == Inversion::Root));
    }
}
