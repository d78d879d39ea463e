//! # Engine Configuration
//!
//! Callers build a [`ChordConfig`] (by hand or from YAML) and hand it to
//! [`crate::ChordService::new`]. The service copies what it needs at
//! construction, so changing a config afterwards only affects services built
//! from it later.
//!
//! ## YAML Format
//! ```yaml
//! engine: mathematical        # legacy | mathematical
//! auto_voice_leading: true
//! generate_bass_notes: true
//! echo_root_spelling: false
//! ```
//!
//! Every field is optional. An `engine` value that isn't recognized selects
//! the legacy engine, exactly as if the field were missing.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::ChordError;

/// Which chord calculator a service uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Legacy,
    Mathematical,
}

impl EngineKind {
    /// Resolve a configured engine name.
    ///
    /// This is the single place the fallback policy lives: absent, empty or
    /// unrecognized names resolve to [`EngineKind::Legacy`] and never fail.
    ///
    /// # Example
    /// ```
    /// use chordhound::EngineKind;
    ///
    /// assert_eq!(EngineKind::from_setting(Some("Mathematical")), EngineKind::Mathematical);
    /// assert_eq!(EngineKind::from_setting(Some("quantum")), EngineKind::Legacy);
    /// assert_eq!(EngineKind::from_setting(None), EngineKind::Legacy);
    /// ```
    pub fn from_setting(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("mathematical") => EngineKind::Mathematical,
            Some("legacy") => EngineKind::Legacy,
            other => {
                if let Some(name) = other {
                    debug!(engine = name, "unrecognized engine setting, using legacy");
                }
                EngineKind::Legacy
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EngineKind::Legacy => "legacy",
            EngineKind::Mathematical => "mathematical",
        }
    }
}

impl<'de> Deserialize<'de> for EngineKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Non-string values (numbers, lists) are unrecognized names, not errors
        let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
        let setting = match &value {
            None | Some(serde_yaml::Value::Null) => None,
            Some(serde_yaml::Value::String(name)) => Some(name.as_str()),
            Some(_) => Some(""),
        };
        Ok(EngineKind::from_setting(setting))
    }
}

fn default_true() -> bool {
    true
}

/// Settings injected into a [`crate::ChordService`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordConfig {
    #[serde(default)]
    pub engine: EngineKind,
    /// Pick inversions for minimal voice movement when voicing progressions
    #[serde(default = "default_true")]
    pub auto_voice_leading: bool,
    /// Emit the bass note from the mathematical engine
    #[serde(default = "default_true")]
    pub generate_bass_notes: bool,
    /// Spell the bass/root note the way the caller spelled the root
    #[serde(default)]
    pub echo_root_spelling: bool,
}

impl Default for ChordConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Legacy,
            auto_voice_leading: true,
            generate_bass_notes: true,
            echo_root_spelling: false,
        }
    }
}

impl ChordConfig {
    /// Default settings with the engine resolved from a raw setting value.
    pub fn with_engine_setting(value: &str) -> Self {
        Self {
            engine: EngineKind::from_setting(Some(value)),
            ..Self::default()
        }
    }

    /// Parse a YAML document. An empty document gives the defaults.
    pub fn from_yaml(source: &str) -> Result<Self, ChordError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source).map_err(|e| ChordError::Config(e.to_string()))
    }
}
