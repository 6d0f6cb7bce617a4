//! Video request parameters shared by the form, the command parser and the job token.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Longest prompt accepted anywhere in the system, in characters.
pub const MAX_PROMPT_CHARS: usize = 2000;

/// Allowed clip lengths in seconds. Order matters: it breaks snapping ties.
pub const ALLOWED_DURATIONS: [u32; 5] = [88, 60, 180, 300, 600];

pub const DEFAULT_DURATION_SECONDS: u32 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0} seconds is not an allowed clip duration")]
pub struct DurationError(pub u32);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown aspect ratio `{0}`, expected 16:9 or 9:16")]
pub struct AspectError(pub String);

/// A clip length that is always one of [`ALLOWED_DURATIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ClipDuration(u32);

impl ClipDuration {
    /// Nearest allowed duration by absolute difference.
    /// On a tie the value listed first in [`ALLOWED_DURATIONS`] wins.
    pub fn snap(seconds: u64) -> Self {
        Self::snap_f64(seconds as f64)
    }

    /// Same as [`ClipDuration::snap`] for fractional or negative input.
    /// A non-finite value gives the default.
    pub fn snap_f64(seconds: f64) -> Self {
        if !seconds.is_finite() {
            return Self::default();
        }
        let mut best = ALLOWED_DURATIONS[0];
        let mut best_diff = (f64::from(best) - seconds).abs();
        for candidate in ALLOWED_DURATIONS {
            let diff = (f64::from(candidate) - seconds).abs();
            if diff < best_diff {
                best = candidate;
                best_diff = diff;
            }
        }
        Self(best)
    }

    pub fn seconds(self) -> u32 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = ClipDuration> {
        ALLOWED_DURATIONS.into_iter().map(ClipDuration)
    }

    /// Label shown in the duration picker.
    pub fn label(self) -> String {
        match self.0 {
            s if s >= 120 && s % 60 == 0 => format!("{} minutes", s / 60),
            s => format!("{} seconds", s),
        }
    }
}

impl Default for ClipDuration {
    fn default() -> Self {
        Self(DEFAULT_DURATION_SECONDS)
    }
}

impl TryFrom<u32> for ClipDuration {
    type Error = DurationError;

    fn try_from(seconds: u32) -> Result<Self, Self::Error> {
        if ALLOWED_DURATIONS.contains(&seconds) {
            Ok(Self(seconds))
        } else {
            Err(DurationError(seconds))
        }
    }
}

impl From<ClipDuration> for u32 {
    fn from(duration: ClipDuration) -> Self {
        duration.0
    }
}

impl fmt::Display for ClipDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }

    /// Lenient form handling: anything but an exact "9:16" is landscape.
    pub fn from_form(value: Option<&str>) -> Self {
        match value {
            Some("9:16") => AspectRatio::Portrait,
            _ => AspectRatio::Landscape,
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = AspectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" => Ok(AspectRatio::Landscape),
            "9:16" => Ok(AspectRatio::Portrait),
            other => Err(AspectError(other.to_string())),
        }
    }
}

/// Cut `text` down to [`MAX_PROMPT_CHARS`] characters.
pub fn truncate_prompt(text: &str) -> String {
    text.chars().take(MAX_PROMPT_CHARS).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRequest {
    pub prompt: String,
    pub duration_seconds: ClipDuration,
    pub aspect_ratio: AspectRatio,
}

impl VideoRequest {
    pub fn new(prompt: &str, duration_seconds: ClipDuration, aspect_ratio: AspectRatio) -> Self {
        Self {
            prompt: truncate_prompt(prompt),
            duration_seconds,
            aspect_ratio,
        }
    }
}

/// Body of `POST /generate` as sent by callers.
///
/// Every field may be missing or carry the wrong JSON type; none of that is an
/// error, the field just falls back to its default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    #[serde(default)]
    pub prompt: Option<Value>,
    #[serde(default)]
    pub duration_seconds: Option<Value>,
    #[serde(default)]
    pub aspect_ratio: Option<Value>,
}

impl GenerateBody {
    pub fn normalize(&self) -> VideoRequest {
        let duration = self
            .duration_seconds
            .as_ref()
            .and_then(number_of)
            .map(ClipDuration::snap_f64)
            .unwrap_or_default();
        VideoRequest::new(
            &text_of(self.prompt.as_ref()),
            duration,
            AspectRatio::from_form(self.aspect_ratio.as_ref().and_then(Value::as_str)),
        )
    }
}

/// Loose JSON to text: strings as-is, null or missing as empty, anything
/// else in its JSON form.
pub fn text_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// JSON numbers, or strings holding one.
fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
