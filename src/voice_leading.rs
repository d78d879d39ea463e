//! # Voice Leading
//!
//! Picks the inversion of the next chord that moves the voices least.
//!
//! ## Distance
//! Both chords' notes (bass excluded) are sorted low to high and paired by
//! position; the distance is the sum of the absolute semitone differences of
//! each pair. Chords with different voice counts can't be paired and fail with
//! [`ChordError::IncompatibleVoicing`].
//!
//! ## Candidates
//! Every inversion the next chord's quality allows is voiced around the
//! current chord's lowest note by a calculator. The `_with` variants take the
//! caller's calculator, so a service ranks exactly the voicings it will emit;
//! the plain variants use the mathematical engine without a bass.
//! The smallest distance wins; on a tie the earlier inversion (root, first,
//! second, third) is kept. Root position is always a candidate, so the chosen
//! inversion never moves more than root position would.

use tracing::debug;

use crate::chord::{ChordQuality, ChordSpec, Inversion, VoicedChord};
use crate::engine::{ChordCalculator, MathematicalEngine};
use crate::error::ChordError;
use crate::pitch::{Pitch, PitchClass};

/// Total semitone movement between two voicings, paired low to high.
pub fn voice_leading_distance(from: &[Pitch], to: &[Pitch]) -> Result<u32, ChordError> {
    if from.len() != to.len() {
        return Err(ChordError::IncompatibleVoicing {
            left: from.len(),
            right: to.len(),
        });
    }

    let mut from: Vec<i32> = from.iter().map(Pitch::semitone).collect();
    let mut to: Vec<i32> = to.iter().map(Pitch::semitone).collect();
    from.sort_unstable();
    to.sort_unstable();

    Ok(from
        .iter()
        .zip(&to)
        .map(|(a, b)| (a - b).unsigned_abs())
        .sum())
}

/// One evaluated inversion of the next chord
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InversionCandidate {
    pub inversion: Inversion,
    pub distance: u32,
    pub voicing: VoicedChord,
}

/// Voice every inversion of the next chord around `current` and measure it.
///
/// Candidates come back in tie-break order.
pub fn rank_inversions(
    current: &VoicedChord,
    next_root: PitchClass,
    next_quality: ChordQuality,
) -> Result<Vec<InversionCandidate>, ChordError> {
    let engine = MathematicalEngine::new().with_bass_notes(false);
    rank_inversions_with(&engine, current, next_root, next_quality)
}

/// [`rank_inversions`] with the candidates voiced by `engine`.
pub fn rank_inversions_with<C: ChordCalculator + ?Sized>(
    engine: &C,
    current: &VoicedChord,
    next_root: PitchClass,
    next_quality: ChordQuality,
) -> Result<Vec<InversionCandidate>, ChordError> {
    let reference = current
        .lowest_note()
        .ok_or(ChordError::IncompatibleVoicing {
            left: 0,
            right: next_quality.voice_count(),
        })?;

    next_quality
        .inversions()
        .iter()
        .map(|&inversion| {
            let spec = ChordSpec::new(next_root, next_quality)
                .with_inversion(inversion)
                .with_reference(reference);
            let voicing = engine.calculate(&spec)?;
            let distance = voice_leading_distance(&current.notes, &voicing.notes)?;
            Ok(InversionCandidate {
                inversion,
                distance,
                voicing,
            })
        })
        .collect()
}

/// Inversion of the next chord with the least total voice movement.
pub fn optimal_inversion(
    current: &VoicedChord,
    next_root: PitchClass,
    next_quality: ChordQuality,
) -> Result<InversionCandidate, ChordError> {
    let engine = MathematicalEngine::new().with_bass_notes(false);
    optimal_inversion_with(&engine, current, next_root, next_quality)
}

/// [`optimal_inversion`] with the candidates voiced by `engine`.
pub fn optimal_inversion_with<C: ChordCalculator + ?Sized>(
    engine: &C,
    current: &VoicedChord,
    next_root: PitchClass,
    next_quality: ChordQuality,
) -> Result<InversionCandidate, ChordError> {
    let candidates = rank_inversions_with(engine, current, next_root, next_quality)?;

    let mut best: Option<InversionCandidate> = None;
    for candidate in candidates {
        // Strictly smaller only, so the earlier inversion keeps a tie
        if best.as_ref().map_or(true, |b| candidate.distance < b.distance) {
            best = Some(candidate);
        }
    }

    let best = best.ok_or_else(|| {
        ChordError::InvalidChordSpec(format!("{} chords have no inversions", next_quality))
    })?;
    debug!(
        from = %current,
        to = %best.voicing,
        inversion = %best.inversion,
        distance = best.distance,
        "chose inversion"
    );
    Ok(best)
}
