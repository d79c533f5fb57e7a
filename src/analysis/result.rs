//! Key estimation result types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mode of the detected key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    /// Major mode
    Major,
    /// Minor mode
    Minor,
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Major => write!(f, "major"),
            Scale::Minor => write!(f, "minor"),
        }
    }
}

/// Result of a key estimation
///
/// `strength` is the Pearson correlation of the winning tonal template
/// against the pitch-class profile, in `[-1, 1]`.
/// `first_to_second_relative_strength` measures how far the winner stands
/// above the best template of the opposite scale:
/// `(best - second_best) / best`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyOutput {
    /// Tonic pitch class, spelled `C C# D Eb E F F# G Ab A Bb B`
    pub key: String,

    /// Major or minor
    pub scale: Scale,

    /// Correlation score of the winning template
    pub strength: f64,

    /// Margin over the best template of the opposite scale
    pub first_to_second_relative_strength: f64,
}

/// Pitch-class spellings used for reported keys
///
/// Sharps for C#/F#, flats for Eb/Ab/Bb, matching common DJ and
/// music-notation conventions.
pub const KEY_NAMES: [&str; 12] = [
    "C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
];
