//! Turns a spoken transcript into a partial set update.
//!
//! Reps and weight are matched independently, so "10 reps" alone still
//! produces an update that leaves the weight untouched.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Canonical phrasing suggested when a transcript is not understood.
pub const VOICE_HINT: &str = "10 reps 50 kilos";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VoiceError {
    #[error("didn't catch that: \"{transcript}\". Try saying \"{hint}\"", hint = VOICE_HINT)]
    NotUnderstood { transcript: String },

    #[error("add a set before using voice input")]
    NothingToUpdate,

    #[error("voice input is not supported on this device")]
    Unsupported,
}

/// Partial update for the last set. `None` fields are left as they are.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SetPatch {
    pub reps: Option<u32>,
    pub weight: Option<f64>,
}

impl SetPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reps.is_none() && self.weight.is_none()
    }
}

fn reps_regex() -> Option<&'static Regex> {
    static REPS_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REPS_REGEX
        .get_or_init(|| Regex::new(r"(?i)\b(\d+)\s*reps?\b").ok())
        .as_ref()
}

fn weight_regex() -> Option<&'static Regex> {
    static WEIGHT_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    WEIGHT_REGEX
        .get_or_init(|| {
            Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s+(?:kg|kilos?|pounds?|lbs?)\b").ok()
        })
        .as_ref()
}

fn capture<T: std::str::FromStr>(re: Option<&Regex>, text: &str) -> Option<T> {
    re?.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Parse a transcript such as `"10 reps 50 kilos"`.
///
/// # Errors
///
/// Returns `VoiceError::NotUnderstood` when neither a rep count nor a weight
/// can be found.
pub fn parse_transcript(transcript: &str) -> Result<SetPatch, VoiceError> {
    let text = transcript.trim().to_lowercase();
    let patch = SetPatch {
        reps: capture(reps_regex(), &text),
        weight: capture::<f64>(weight_regex(), &text).filter(|w| w.is_finite()),
    };

    if patch.is_empty() {
        return Err(VoiceError::NotUnderstood {
            transcript: transcript.trim().to_string(),
        });
    }
    Ok(patch)
}
