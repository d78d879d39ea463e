pub mod blue_notes;
pub mod chord;
pub mod config;
pub mod engine;
pub mod error;
pub mod pitch;
pub mod progression;
pub mod service;
pub mod voice_leading;

pub use chord::{ChordQuality, ChordSpec, Inversion, VoicedChord};
pub use config::{ChordConfig, EngineKind};
pub use engine::{ChordCalculator, MathematicalEngine, TableEngine};
pub use error::*;
pub use pitch::{Pitch, PitchClass, Spelling};
pub use progression::{Key, Mode, ProgressionChord, ProgressionStep};
pub use service::ChordService;

/// Transpose Roman numerals into concrete chords.
/// This is the string-level entry point used by the surrounding application.
///
/// ```rust
/// let chords = chordhound::transpose("G", "major", &["I", "IV", "V"])?;
/// let names: Vec<String> = chords.iter().map(|c| c.to_string()).collect();
/// assert_eq!(names, vec!["G", "C", "D"]);
/// # Ok::<(), chordhound::ChordError>(())
/// ```
pub fn transpose(key: &str, mode: &str, numerals: &[&str]) -> Result<Vec<ProgressionChord>, ChordError> {
    let key = Key::parse(key, mode)?;
    let steps = numerals
        .iter()
        .map(|n| n.parse())
        .collect::<Result<Vec<ProgressionStep>, _>>()?;
    progression::transpose_progression(key, &steps)
}

/// Analyze chord symbols (`"Dm"`, `"G7"`, `"C"`) into Roman numerals.
pub fn analyze(key: &str, mode: &str, symbols: &[&str]) -> Result<Vec<String>, ChordError> {
    let key = Key::parse(key, mode)?;
    let chords = symbols
        .iter()
        .map(|s| ChordSpec::from_symbol(s).map(|spec| ProgressionChord::new(spec.root, spec.quality)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(progression::analyze_progression(&chords, key)
        .iter()
        .map(ToString::to_string)
        .collect())
}
