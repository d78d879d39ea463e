//! # Error Types
//!
//! All failures in the chord engine are deterministic: the same bad input
//! produces the same error on every call. Nothing is retried.
//!
//! ## Error Types
//! - `InvalidChordSpec` - Unknown quality/inversion/numeral, or a combination an engine cannot voice
//! - `InvalidPitchFormat` - A pitch string that doesn't match `<PitchClass><Octave>`
//! - `IncompatibleVoicing` - Voice-leading comparison between chords with different voice counts
//! - `Config` - A configuration document that isn't valid YAML
//!
//! An unrecognized engine name is *not* an error; see [`crate::config::EngineKind::from_setting`].
//!
//! ## Usage
//! ```rust
//! use chordhound::{ChordError, Pitch};
//!
//! match "H4".parse::<Pitch>() {
//!     Ok(pitch) => println!("{}", pitch),
//!     Err(ChordError::InvalidPitchFormat(input)) => eprintln!("bad pitch: {}", input),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChordError {
    /// Unknown chord quality, inversion or Roman numeral, or a chord an engine can't voice.
    ///
    /// # Example
    /// ```
    /// # use chordhound::ChordError;
    /// let err = ChordError::InvalidChordSpec("unknown quality 'sus13'".to_string());
    /// assert_eq!(err.to_string(), "Invalid chord spec: unknown quality 'sus13'");
    /// ```
    #[error("Invalid chord spec: {0}")]
    InvalidChordSpec(String),

    /// Pitch string doesn't match the `<PitchClass><Octave>` grammar.
    ///
    /// # Example
    /// ```
    /// # use chordhound::ChordError;
    /// let err = ChordError::InvalidPitchFormat("C#".to_string());
    /// assert_eq!(err.to_string(), "Invalid pitch format: 'C#'");
    /// ```
    #[error("Invalid pitch format: '{0}'")]
    InvalidPitchFormat(String),

    /// Two chords with different voice counts can't be paired voice by voice.
    #[error("Incompatible voicing: cannot pair {left} voices with {right} voices")]
    IncompatibleVoicing { left: usize, right: usize },

    /// Configuration document could not be read.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
