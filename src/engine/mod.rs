//! # Chord Calculators
//!
//! Two interchangeable engines turn a [`ChordSpec`] into a [`VoicedChord`]:
//!
//! - [`TableEngine`] - fixed lookup tables, triads only, octave 4 baseline, no bass note
//! - [`MathematicalEngine`] - semitone arithmetic around a reference pitch, with a bass note
//!
//! Both are pure: no interior state changes during a calculation, so one
//! instance can be shared across threads freely.
//!
//! ## Playable Range
//! Every pitch the mathematical engine emits has an octave in
//! [`MIN_OCTAVE`]..=[`MAX_OCTAVE`].
//!
//! ## Example
//! ```rust
//! use chordhound::engine::{ChordCalculator, MathematicalEngine};
//! use chordhound::ChordSpec;
//!
//! let spec = ChordSpec::parse("C", "major", "root", Some("C4"))?;
//! let chord = MathematicalEngine::new().calculate(&spec)?;
//! assert_eq!(chord.note_names(), vec!["C3", "C4", "E4", "G4"]);
//! # Ok::<(), chordhound::ChordError>(())
//! ```

mod mathematical;
mod table;

pub use mathematical::MathematicalEngine;
pub use table::TableEngine;

use crate::chord::{ChordSpec, VoicedChord};
use crate::config::{ChordConfig, EngineKind};
use crate::error::ChordError;

/// Lowest octave an engine may emit
pub const MIN_OCTAVE: i8 = 1;
/// Highest octave an engine may emit
pub const MAX_OCTAVE: i8 = 6;

/// Shared contract of both engines
pub trait ChordCalculator: Send + Sync {
    fn kind(&self) -> EngineKind;

    fn calculate(&self, spec: &ChordSpec) -> Result<VoicedChord, ChordError>;
}

/// The engine a service was built with, fixed for the service's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calculator {
    Table(TableEngine),
    Mathematical(MathematicalEngine),
}

impl Calculator {
    pub fn from_config(config: &ChordConfig) -> Self {
        match config.engine {
            EngineKind::Legacy => Calculator::Table(TableEngine),
            EngineKind::Mathematical => Calculator::Mathematical(
                MathematicalEngine::new()
                    .with_bass_notes(config.generate_bass_notes)
                    .with_root_spelling_echo(config.echo_root_spelling),
            ),
        }
    }
}

impl ChordCalculator for Calculator {
    fn kind(&self) -> EngineKind {
        match self {
            Calculator::Table(engine) => engine.kind(),
            Calculator::Mathematical(engine) => engine.kind(),
        }
    }

    fn calculate(&self, spec: &ChordSpec) -> Result<VoicedChord, ChordError> {
        match self {
            Calculator::Table(engine) => engine.calculate(spec),
            Calculator::Mathematical(engine) => engine.calculate(spec),
        }
    }
}
